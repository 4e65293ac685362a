//! Error adapter for converting FletchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. TOML errors are
//! rendered with a snippet of the offending document.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use fletch::FletchError;

/// Adapter implementing [`MietteDiagnostic`] for a [`FletchError`].
pub struct ErrorAdapter<'a>(pub &'a FletchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            FletchError::Io(_) => "fletch::io",
            FletchError::Toml { .. } => "fletch::toml",
            FletchError::Config(_) => "fletch::config",
            FletchError::Unbound { .. } => "fletch::unbound",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            FletchError::Unbound { .. } => Some(Box::new(
                "list the surface under `surfaces` and give the container an entry in `[elements]`",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            FletchError::Toml { src, .. } => Some(src as &dyn miette::SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let FletchError::Toml {
            origin,
            span: Some(span),
            ..
        } = &self.0
        else {
            return None;
        };

        let span = SourceSpan::from(span.clone());
        let label = LabeledSpan::new_primary_with_span(Some(format!("in {origin}")), span);
        Some(Box::new(std::iter::once(label)))
    }
}
