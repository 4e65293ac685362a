//! Error types for Fletch operations.
//!
//! Rendering itself never fails: a renderer that cannot bind stays inert and
//! a connection that cannot be resolved is skipped. [`FletchError`] covers
//! the fallible edges around it: reading files, parsing configuration and
//! layout snapshots.

use std::{io, ops::Range};

use thiserror::Error;

/// The main error type for Fletch operations.
#[derive(Debug, Error)]
pub enum FletchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A TOML document failed to parse or deserialize.
    ///
    /// Carries the source text and the byte span reported by the parser so
    /// callers can point at the offending location.
    #[error("Invalid TOML in {origin}: {message}")]
    Toml {
        origin: String,
        src: String,
        message: String,
        span: Option<Range<usize>>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Surface `{surface}` or container `{container}` is not present in the layout")]
    Unbound { surface: String, container: String },
}

impl FletchError {
    /// Create a new `Toml` error from a deserialization failure.
    pub fn new_toml_error(
        err: &toml::de::Error,
        src: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self::Toml {
            origin: origin.into(),
            src: src.into(),
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}
