use std::path::PathBuf;

use thiserror::Error;

/// A submitted value that cannot be coerced to its semantic type's
/// expected representation.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Cannot interpret value as currency: {0:?}")]
    Currency(String),
}

/// Failure to produce PDF bytes. Fatal to the current call; the
/// orchestrator never caches a failure and never retries.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Source document not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Cannot format field '{field}' (value {value:?}): {source}")]
    Format {
        field: String,
        value: String,
        #[source]
        source: FormatError,
    },

    #[error("Fill engine failed: {0}")]
    Engine(String),

    #[error("HTML render failed: {0}")]
    Render(#[from] html_engine::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
