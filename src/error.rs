//! Error types for the builder layer.
//!
//! Page-scoped failures (`UnknownStep`, `MissingWriter`, `Writer`) abort a
//! single page; `InvariantViolation` aborts the whole run.

use crate::layout::PageKind;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The layout names a step the builder for `page` does not understand.
    #[error("unknown layout step '{step}' in {page} layout while documenting {entity}")]
    UnknownStep {
        page: PageKind,
        entity: String,
        step: String,
    },

    /// The writer factory has no writer for a page kind the configuration enables.
    #[error("no {page} writer available for {entity}")]
    MissingWriter { page: PageKind, entity: String },

    /// A writer operation failed while running `step`.
    #[error("{page} writer failed at step '{step}' for {entity}: {source}")]
    Writer {
        page: PageKind,
        entity: String,
        step: String,
        #[source]
        source: anyhow::Error,
    },

    /// The driver broke the construction contract (builder run twice, finished context reused).
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("invalid entity pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Fatal errors stop the run; everything else fails only the page being built.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}
