//! Implementations of the `MediaStorage` port.

pub mod inline;
#[cfg(feature = "media-local")]
pub mod local;

pub use inline::InlineMediaStorage;
#[cfg(feature = "media-local")]
pub use local::LocalMediaStorage;
