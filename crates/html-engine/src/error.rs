use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Render timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
