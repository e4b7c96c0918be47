//! Error types for selection checking and persistence.

use thiserror::Error;

/// A selection that cannot be applied to a buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection start {start} is after end {end}")]
    Inverted { start: usize, end: usize },

    #[error("selection {start}..{end} is outside a buffer of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
}

/// Failure to read or write the key/value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not a JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}

/// A rule table that cannot be turned into a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("rule `{name}` has an invalid pattern: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("rule `{name}` is out of stage order")]
    OutOfOrder { name: &'static str },
}
