//! Plain-text summaries for the clipboard.
//!
//! Read-only over the computed views; nothing here mutates state.

use crate::models::{ParticipantId, PointRules, ScoringMode, Tournament};
use crate::schedule::generate_schedule;
use crate::standings::{compute_standings, is_confirmed};

fn display_name(tournament: &Tournament, id: &ParticipantId) -> String {
    tournament
        .participant(id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "?".to_string())
}

/// Scores are stored as numbers; show whole values without a trailing `.0`
/// so score mode reads naturally while 0.5 survives in win/loss mode.
fn fmt_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Render the ranked standings table.
pub fn standings_text(tournament: &Tournament, rules: &PointRules) -> String {
    let rows = compute_standings(
        &tournament.players,
        &tournament.results,
        tournament.mode,
        tournament.allow_draw,
        rules,
    );

    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n\n", tournament.title));
    out.push_str(&format!(
        "Mode: {} ({})\n\n",
        tournament.mode.label(),
        if tournament.allow_draw { "draws allowed" } else { "draws decided" }
    ));

    match tournament.mode {
        ScoringMode::Score => {
            out.push_str(&format!(
                "{:>2}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>5} {:>5} {:>5} {:>4}\n",
                "#", "Player", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
            ));
            out.push_str(&"-".repeat(64));
            out.push('\n');
            for (rank, row) in rows.iter().enumerate() {
                out.push_str(&format!(
                    "{:>2}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>5} {:>5} {:>+5} {:>4}\n",
                    rank + 1,
                    row.participant.name,
                    row.played,
                    row.wins,
                    row.draws,
                    row.losses,
                    fmt_score(row.goals_for),
                    fmt_score(row.goals_against),
                    row.goal_diff as i64,
                    row.points,
                ));
            }
        }
        ScoringMode::WinLoss => {
            out.push_str(&format!(
                "{:>2}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4}\n",
                "#", "Player", "P", "W", "D", "L", "Pts"
            ));
            out.push_str(&"-".repeat(46));
            out.push('\n');
            for (rank, row) in rows.iter().enumerate() {
                out.push_str(&format!(
                    "{:>2}  {:<20} {:>3} {:>3} {:>3} {:>3} {:>4}\n",
                    rank + 1,
                    row.participant.name,
                    row.played,
                    row.wins,
                    row.draws,
                    row.losses,
                    row.points,
                ));
            }
        }
    }

    out
}

/// Render the round-by-round schedule with result annotations.
pub fn schedule_text(tournament: &Tournament) -> String {
    let rounds = generate_schedule(&tournament.players);

    let mut out = String::new();
    out.push_str(&format!("=== {} / schedule ===\n", tournament.title));

    if rounds.is_empty() {
        out.push_str("\nNot enough participants to schedule.\n");
        return out;
    }

    for round in &rounds {
        out.push_str(&format!("\nRound {}:\n", round.round));
        for m in &round.matches {
            match &m.away {
                Some(away) => {
                    let status = match tournament.results.view(&m.home, away) {
                        Some(view)
                            if is_confirmed(&view, tournament.mode, tournament.allow_draw) =>
                        {
                            // Confirmed implies both sides present.
                            match (view.score_a, view.score_b) {
                                (Some(a), Some(b)) => {
                                    format!("{}-{}", fmt_score(a), fmt_score(b))
                                }
                                _ => "-".to_string(),
                            }
                        }
                        Some(_) => "unconfirmed".to_string(),
                        None => "-".to_string(),
                    };
                    out.push_str(&format!(
                        "  #{:<3} {} vs {}  [{}]\n",
                        m.number.unwrap_or(0),
                        display_name(tournament, &m.home),
                        display_name(tournament, away),
                        status,
                    ));
                }
                None => {
                    out.push_str(&format!("       bye: {}\n", display_name(tournament, &m.home)));
                }
            }
        }
    }

    out
}
