//! Roster endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::models::{Participant, ParticipantId, Registration};

use super::super::state::AppState;
use super::{mutate, ApiError};

pub async fn list(State(state): State<AppState>) -> Json<Vec<Participant>> {
    let tournament = state.tournament.read().await;
    Json(tournament.players.clone())
}

#[derive(Debug, Deserialize)]
pub struct NewPlayer {
    pub name: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewPlayer>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let registration = mutate(&state, |t| t.register(&body.name)).await?;
    if registration.duplicate_name {
        tracing::warn!(name = %registration.participant.name, "duplicate participant name");
    }
    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = ParticipantId::from(id);
    mutate(&state, |t| t.remove(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
