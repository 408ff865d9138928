use thiserror::Error;

/// Errors raised before the gateway starts serving. Request-time failures
/// use the per-crate error types (StoreError, ProviderError, PlanError).
#[derive(Debug, Error)]
pub enum SageError {
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SageError>;
