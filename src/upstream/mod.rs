//! Client side of the OpenAI-compatible chat completion API.
//!
//! - [`types`]: Request/response wire types
//! - [`client`]: [`CompletionClient`] trait and the `reqwest` implementation

pub mod client;
pub mod types;

pub use client::{CompletionClient, HttpCompletionClient, UpstreamError};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
