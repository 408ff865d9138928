//! Subject CRUD — GET/POST /api/exam, DELETE /api/exam/{id}
//!
//! No business logic here beyond marshalling: typed deserialization already
//! enforces the difficulty enum and a valid calendar date (422 on bad input).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use sage_core::types::{NewSubject, Subject};
use sage_store::StoreError;

use crate::app::AppState;

#[derive(Serialize)]
pub struct CreateReply {
    pub message: String,
    pub data: Subject,
}

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

/// GET /api/exam — all recorded subjects.
pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Subject>>, (StatusCode, Json<ApiError>)> {
    match state.store.list() {
        Ok(subjects) => Ok(Json(subjects)),
        Err(e) => {
            warn!(error = %e, "GET /api/exam failed");
            Err(internal_error())
        }
    }
}

/// POST /api/exam — record a new subject.
pub async fn create_subject(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewSubject>,
) -> Result<Json<CreateReply>, (StatusCode, Json<ApiError>)> {
    match state.store.create(new) {
        Ok(subject) => Ok(Json(CreateReply {
            message: "Subject added successfully".to_string(),
            data: subject,
        })),
        Err(e) => {
            warn!(error = %e, "POST /api/exam failed");
            Err(internal_error())
        }
    }
}

/// DELETE /api/exam/{id} — remove a subject, returning the deleted record.
pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Subject>, (StatusCode, Json<ApiError>)> {
    match state.store.delete(id) {
        Ok(subject) => Ok(Json(subject)),
        Err(StoreError::NotFound { id }) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("subject {id} not found"),
            }),
        )),
        Err(e) => {
            warn!(error = %e, id, "DELETE /api/exam failed");
            Err(internal_error())
        }
    }
}

fn internal_error() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiError {
            error: "Server error".to_string(),
        }),
    )
}
