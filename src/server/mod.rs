//! HTTP server.
//!
//! - [`api`]: Routes, handlers and middleware
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod metrics;
