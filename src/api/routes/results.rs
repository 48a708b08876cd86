//! Result entry endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::ParticipantId;
use crate::schedule::{generate_schedule, match_numbers};
use crate::standings::is_confirmed;

use super::super::state::AppState;
use super::{mutate, ApiError};

/// Scores arrive from the first path participant's viewpoint; either side
/// may be null while entry is in progress.
#[derive(Debug, Deserialize)]
pub struct ResultBody {
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ResultResponse {
    /// Sequence number of this pairing in the generated schedule.
    pub number: Option<u32>,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
    pub confirmed: bool,
}

pub async fn put(
    State(state): State<AppState>,
    Path((a, b)): Path<(String, String)>,
    Json(body): Json<ResultBody>,
) -> Result<Json<ResultResponse>, ApiError> {
    let (p1, p2) = (ParticipantId::from(a), ParticipantId::from(b));

    // Negative or non-finite numbers normalize to "not entered".
    let normalize = |s: Option<f64>| s.filter(|v| v.is_finite() && *v >= 0.0);
    let (score_a, score_b) = (normalize(body.score_a), normalize(body.score_b));

    mutate(&state, |t| t.record_result(&p1, &p2, score_a, score_b)).await?;

    let tournament = state.tournament.read().await;
    let confirmed = tournament
        .results
        .view(&p1, &p2)
        .map(|view| is_confirmed(&view, tournament.mode, tournament.allow_draw))
        .unwrap_or(false);
    let number = match_numbers(&generate_schedule(&tournament.players))
        .get(&(p1, p2))
        .copied();
    Ok(Json(ResultResponse { number, score_a, score_b, confirmed }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((a, b)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let (p1, p2) = (ParticipantId::from(a), ParticipantId::from(b));
    mutate(&state, |t| t.clear_result(&p1, &p2)).await?;
    Ok(StatusCode::NO_CONTENT)
}
