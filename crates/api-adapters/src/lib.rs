//! # api-adapters
//!
//! JSON HTTP surface over the showcase workflows. The axum implementation is
//! gated behind the `web-axum` feature.

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extractors;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use router::{build_router, serve_media};
#[cfg(feature = "web-axum")]
pub use state::AppState;
