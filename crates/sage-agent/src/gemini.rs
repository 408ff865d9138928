use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::provider::{GenerativeProvider, ProviderError};

/// Client for Google's Generative Language API.
///
/// Auth is the `?key=` query parameter, matching the REST surface of the
/// v1beta API. `base_url` is overridable so tests can point at a stub.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".to_string()),
        }
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        debug!(model, "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, model, body = %text, "generateContent API error");
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let api_resp: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        extract_text(api_resp)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);

        debug!("fetching model catalog");

        let resp = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "model catalog API error");
            return Err(ProviderError::Api {
                status,
                message: text,
            });
        }

        let catalog: ModelCatalog = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        // Catalog names arrive as "models/gemini-..." — keep just the model id.
        Ok(catalog
            .models
            .into_iter()
            .map(|m| {
                m.name
                    .rsplit('/')
                    .next()
                    .unwrap_or(m.name.as_str())
                    .to_string()
            })
            .collect())
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, ProviderError> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("response contained no candidates".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        return Err(ProviderError::Parse(
            "candidate contained no text parts".to_string(),
        ));
    }
    Ok(text)
}

// Generative Language API response types (private — deserialization only)

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelCatalog {
    #[serde(default)]
    models: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
struct CatalogEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_concatenates_parts() {
        let resp: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"| Date |"},{"text":" table"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(resp).unwrap(), "| Date | table");
    }

    #[test]
    fn extract_text_errors_on_empty_candidates() {
        let resp: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(resp), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn extract_text_errors_when_no_text_parts() {
        let resp: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[]}}]}"#).unwrap();
        assert!(matches!(extract_text(resp), Err(ProviderError::Parse(_))));
    }
}
