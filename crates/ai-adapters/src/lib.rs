//! # ai-adapters
//!
//! Implementations of the `Summarizer` and `Tagger` ports.
//!
//! - [`heuristic`]: offline, deterministic, always compiled
//! - `http` (feature `ai-http`): remote prompt flows

pub mod heuristic;
#[cfg(feature = "ai-http")]
pub mod http;

pub use heuristic::{ExcerptSummarizer, KeywordTagger};
#[cfg(feature = "ai-http")]
pub use http::HttpPromptClient;
