//! recipe-forge: LLM-backed recipe generation.
//!
//! Turns a list of ingredients, a time budget, a meal type and dietary
//! preferences into a structured recipe by prompting an OpenAI-compatible
//! chat completion API for a single JSON object.
//!
//! Exposes a small HTTP API consumed by the recipe form front end.

pub mod cancel;
pub mod config;
pub mod error;
pub mod recipe;
pub mod server;
pub mod upstream;
