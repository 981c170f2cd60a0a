use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    /// Transport failure, or the body exceeded the configured limit
    #[error("failed to read request body: {0}")]
    Read(#[from] axum::Error),
}
