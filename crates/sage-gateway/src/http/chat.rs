//! Plan generation endpoint — POST /api/chat
//!
//! Request:  `{"hours": "4", "prompt": "weekends off"}`  (prompt optional)
//! Response: `{"output": "<markdown table>"}`
//! Errors:   400 no subjects, 503 no resolved model, 504 provider too slow,
//!           500 with provider diagnostics otherwise.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use sage_agent::PlanError;

use crate::app::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    /// Optional free-text instructions appended to the prompt.
    pub prompt: Option<String>,
    /// Hours of study per day — opaque text interpolated into the prompt.
    pub hours: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct ChatError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ChatError {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            model: None,
            suggestion: None,
        }
    }
}

/// POST /api/chat — build a prompt from every stored subject and ask the
/// resolved model for a study plan.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatError>)> {
    let Some(planner) = state.planner.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ChatError::plain(
                "no generative model available — model resolution failed at startup",
            )),
        ));
    };

    let subjects = state.store.list().map_err(|e| {
        warn!(error = %e, "POST /api/chat: store read failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ChatError::plain("Server error")),
        )
    })?;

    let timeout = Duration::from_secs(state.config.provider.timeout_secs);
    let generated = tokio::time::timeout(
        timeout,
        planner.generate(&subjects, &req.hours, req.prompt.as_deref()),
    )
    .await;

    match generated {
        Ok(Ok(output)) => Ok(Json(ChatReply { output })),
        Ok(Err(PlanError::NoSubjects)) => Err((
            StatusCode::BAD_REQUEST,
            Json(ChatError::plain(
                "No subjects found in the database. Please add subjects first.",
            )),
        )),
        Ok(Err(PlanError::Provider(e))) => {
            warn!(error = %e, model = %planner.model(), "POST /api/chat: provider failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatError {
                    error: "AI generation failed".to_string(),
                    details: Some(e.to_string()),
                    model: Some(planner.model().to_string()),
                    suggestion: Some(
                        "Please check if the model name is correct and your API key has access to this model."
                            .to_string(),
                    ),
                }),
            ))
        }
        Err(_) => {
            warn!(
                model = %planner.model(),
                timeout_secs = state.config.provider.timeout_secs,
                "POST /api/chat: provider call timed out"
            );
            Err((
                StatusCode::GATEWAY_TIMEOUT,
                Json(ChatError::plain(
                    "Plan generation is taking longer than expected. Please try again.",
                )),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use sage_agent::provider::{GenerativeProvider, ProviderError};
    use sage_agent::PlanGenerator;
    use sage_core::config::SageConfig;
    use sage_core::types::{DifficultyLevel, NewSubject};
    use sage_store::SubjectStore;

    use crate::app::AppState;

    /// Provider that never answers within any handler timeout.
    struct NeverReplies;

    #[async_trait]
    impl GenerativeProvider for NeverReplies {
        fn name(&self) -> &str {
            "never"
        }
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
            tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            Ok("too late".to_string())
        }
        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }
    }

    /// Provider that replies instantly with a canned plan.
    struct InstantReplies;

    #[async_trait]
    impl GenerativeProvider for InstantReplies {
        fn name(&self) -> &str {
            "instant"
        }
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, ProviderError> {
            Ok("| Date | Subject | Topics | Tasks |".to_string())
        }
        async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }
    }

    fn empty_store() -> SubjectStore {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        sage_store::db::init_db(&conn).unwrap();
        SubjectStore::new(conn)
    }

    fn store_with_subject() -> SubjectStore {
        let store = empty_store();
        store
            .create(NewSubject {
                sub: "Math".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                syllabus: "ch1-5".to_string(),
                difficulty: DifficultyLevel::Hard,
                comments: "algebra weak".to_string(),
            })
            .unwrap();
        store
    }

    fn request(hours: &str) -> Json<ChatRequest> {
        Json(ChatRequest {
            prompt: None,
            hours: hours.to_string(),
        })
    }

    #[tokio::test]
    async fn unresolved_model_answers_503() {
        // planner is None when startup model resolution failed
        let state = Arc::new(AppState::new(SageConfig::default(), store_with_subject(), None));

        let (status, body) = chat_handler(State(state), request("4")).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.error.contains("model resolution failed"));
    }

    #[tokio::test]
    async fn slow_provider_answers_504() {
        let mut config = SageConfig::default();
        config.provider.timeout_secs = 0;
        let planner = PlanGenerator::new(Box::new(NeverReplies), "gemini-2.0-flash".to_string());
        let state = Arc::new(AppState::new(config, store_with_subject(), Some(planner)));

        let (status, body) = chat_handler(State(state), request("4")).await.unwrap_err();
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert!(body.error.contains("taking longer than expected"));
    }

    #[tokio::test]
    async fn empty_store_answers_400() {
        let planner = PlanGenerator::new(Box::new(InstantReplies), "gemini-2.0-flash".to_string());
        let state = Arc::new(AppState::new(SageConfig::default(), empty_store(), Some(planner)));

        let (status, _) = chat_handler(State(state), request("4")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generated_plan_is_returned_verbatim() {
        let planner = PlanGenerator::new(Box::new(InstantReplies), "gemini-2.0-flash".to_string());
        let state = Arc::new(AppState::new(
            SageConfig::default(),
            store_with_subject(),
            Some(planner),
        ));

        let Json(reply) = chat_handler(State(state), request("4")).await.unwrap();
        assert_eq!(reply.output, "| Date | Subject | Topics | Tasks |");
    }
}
