//! Recipe domain.
//!
//! - [`request`]: Inbound request, validation and the form's option sets
//! - [`prompt`]: System and user prompt construction
//! - [`generator`]: Completion call and response relay
//! - [`model`]: Typed recipe view
//! - [`card`]: Plain-text recipe card rendering

pub mod card;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod request;

pub use generator::RecipeGenerator;
pub use model::{Difficulty, Recipe};
pub use request::RecipeRequest;
