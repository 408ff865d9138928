use async_trait::async_trait;

/// Common interface to a generative-language provider.
///
/// The resolver and plan generator are written against this trait so tests
/// can inject a deterministic fake instead of the real Gemini API.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Send a single prompt to the named model, wait for the full text reply.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError>;

    /// List model identifiers from the provider's catalog endpoint.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),
}
