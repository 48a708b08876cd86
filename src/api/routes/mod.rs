//! Route handlers, grouped per resource, plus the shared error mapping and
//! the copy-on-write mutation helper.

pub mod players;
pub mod results;
pub mod tournament;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::{Tournament as TournamentState, TournamentError};
use crate::storage::StorageError;

use super::state::AppState;

/// JSON error body with the matching status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TournamentError> for ApiError {
    fn from(err: TournamentError) -> Self {
        let status = match err {
            TournamentError::UnknownParticipant(_) => StatusCode::NOT_FOUND,
            TournamentError::RosterFull { .. } | TournamentError::SelfPairing => {
                StatusCode::CONFLICT
            }
        };
        Self { status, message: err.to_string() }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "failed to persist snapshot");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "failed to persist state".to_string(),
        }
    }
}

/// Apply a mutation copy-on-write: clone the snapshot, change the clone,
/// persist it, then swap it in. A failed mutation or save leaves the shared
/// state untouched.
pub(crate) async fn mutate<T, F>(state: &AppState, apply: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut TournamentState) -> Result<T, TournamentError>,
{
    let mut guard = state.tournament.write().await;
    let mut next = guard.clone();
    let output = apply(&mut next)?;
    state.store.save(&next)?;
    *guard = next;
    Ok(output)
}
