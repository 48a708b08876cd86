//! # Rondo
//!
//! A local round-robin tournament manager: register a roster, generate a
//! fair schedule, record results, and read live standings.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (participants, results, the snapshot)
//! - **schedule**: Circle-method round generation and match numbering
//! - **standings**: Statistics aggregation and tie-break ranking
//! - **storage**: JSON snapshot persistence with defensive loading
//! - **export**: Plain-text summaries for the clipboard
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod export;
pub mod models;
pub mod schedule;
pub mod standings;
pub mod storage;

pub use models::*;

/// Normalize raw score input. Empty, non-numeric, negative or non-finite
/// input reads as "no score recorded" rather than an error, so bad input
/// never corrupts standings: the match simply stays unconfirmed.
pub fn parse_score(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
