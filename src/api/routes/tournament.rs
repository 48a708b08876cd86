//! Tournament-level endpoints: settings, phase, and the derived views.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::export;
use crate::models::{Participant, Phase, ScoringMode, Tournament};
use crate::schedule::generate_schedule;
use crate::standings::{compute_standings, is_confirmed, StandingRow};

use super::super::state::AppState;
use super::{mutate, ApiError};

pub async fn show(State(state): State<AppState>) -> Json<Tournament> {
    let tournament = state.tournament.read().await;
    Json(tournament.clone())
}

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    pub title: Option<String>,
    pub mode: Option<ScoringMode>,
    pub allow_draw: Option<bool>,
    pub show_schedule: Option<bool>,
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(body): Json<SettingsBody>,
) -> Result<Json<Tournament>, ApiError> {
    let updated = mutate(&state, |t| {
        if let Some(title) = body.title {
            t.title = title;
        }
        if let Some(mode) = body.mode {
            t.mode = mode;
        }
        if let Some(allow_draw) = body.allow_draw {
            t.allow_draw = allow_draw;
        }
        if let Some(show_schedule) = body.show_schedule {
            t.show_schedule = show_schedule;
        }
        Ok(t.clone())
    })
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct PhaseBody {
    pub phase: Phase,
}

pub async fn update_phase(
    State(state): State<AppState>,
    Json(body): Json<PhaseBody>,
) -> Result<Json<Tournament>, ApiError> {
    let updated = mutate(&state, |t| {
        t.phase = body.phase;
        Ok(t.clone())
    })
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Serialize)]
pub struct StandingsResponse {
    pub mode: ScoringMode,
    pub allow_draw: bool,
    pub rows: Vec<StandingRow>,
}

pub async fn standings(State(state): State<AppState>) -> Json<StandingsResponse> {
    let t = state.tournament.read().await;
    let rows = compute_standings(&t.players, &t.results, t.mode, t.allow_draw, &state.rules);
    Json(StandingsResponse { mode: t.mode, allow_draw: t.allow_draw, rows })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Both scores present and counting toward standings.
    Confirmed,
    /// Something entered, but not (yet) counting.
    Unconfirmed,
    /// Nothing entered.
    None,
}

#[derive(Debug, Serialize)]
pub struct ScheduledMatchView {
    pub number: Option<u32>,
    pub home: Participant,
    pub away: Option<Participant>,
    pub is_bye: bool,
    pub status: MatchStatus,
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RoundView {
    pub round: u32,
    pub matches: Vec<ScheduledMatchView>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub show_schedule: bool,
    pub rounds: Vec<RoundView>,
}

pub async fn schedule(State(state): State<AppState>) -> Json<ScheduleResponse> {
    let t = state.tournament.read().await;
    let rounds = generate_schedule(&t.players)
        .into_iter()
        .map(|round| RoundView {
            round: round.round,
            matches: round
                .matches
                .into_iter()
                .map(|m| scheduled_match_view(&t, m))
                .collect(),
        })
        .collect();
    Json(ScheduleResponse { show_schedule: t.show_schedule, rounds })
}

fn scheduled_match_view(
    tournament: &Tournament,
    m: crate::schedule::ScheduledMatch,
) -> ScheduledMatchView {
    let home = tournament
        .participant(&m.home)
        .cloned()
        .unwrap_or_else(|| Participant { id: m.home.clone(), name: "?".to_string() });
    let away = m
        .away
        .as_ref()
        .map(|id| {
            tournament
                .participant(id)
                .cloned()
                .unwrap_or_else(|| Participant { id: id.clone(), name: "?".to_string() })
        });

    let (status, score_a, score_b) = match &m.away {
        Some(away_id) => match tournament.results.view(&m.home, away_id) {
            Some(view) => {
                let status = if is_confirmed(&view, tournament.mode, tournament.allow_draw) {
                    MatchStatus::Confirmed
                } else {
                    MatchStatus::Unconfirmed
                };
                (status, view.score_a, view.score_b)
            }
            None => (MatchStatus::None, None, None),
        },
        None => (MatchStatus::None, None, None),
    };

    ScheduledMatchView {
        number: m.number,
        is_bye: m.is_bye(),
        home,
        away,
        status,
        score_a,
        score_b,
    }
}

pub async fn export_text(State(state): State<AppState>) -> String {
    let t = state.tournament.read().await;
    let mut text = export::standings_text(&t, &state.rules);
    if t.show_schedule {
        text.push('\n');
        text.push_str(&export::schedule_text(&t));
    }
    text
}
