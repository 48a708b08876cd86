//! Standings computation: aggregation over confirmed results and the
//! multi-level tie-break comparator.

use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{
    MatchView, Participant, ParticipantId, PointRules, ResultsMap, ScoringMode,
};

/// Outcome of a match from one side's viewpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn reversed(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Draw => Outcome::Draw,
            Outcome::Loss => Outcome::Win,
        }
    }

    pub fn points(self, rules: &PointRules) -> u32 {
        match self {
            Outcome::Win => rules.win,
            Outcome::Draw => rules.draw,
            Outcome::Loss => rules.loss,
        }
    }
}

/// Compare two numeric scores from the first side's viewpoint. Win/loss mode
/// stores 1 / 0.5 / 0 per side, so the same comparison applies in both modes
/// and `outcome_for(a, b)` is always the opposite of `outcome_for(b, a)`.
pub fn outcome_for(a: f64, b: f64) -> Outcome {
    match a.total_cmp(&b) {
        Ordering::Greater => Outcome::Win,
        Ordering::Equal => Outcome::Draw,
        Ordering::Less => Outcome::Loss,
    }
}

/// A result counts toward standings only once both scores are present and,
/// when draws are disallowed, the scores do not represent a draw. In win/loss
/// mode the draw sentinel is the stored value 0.5.
pub fn is_confirmed(view: &MatchView, mode: ScoringMode, allow_draw: bool) -> bool {
    let (Some(a), Some(b)) = (view.score_a, view.score_b) else {
        return false;
    };
    if allow_draw {
        return true;
    }
    match mode {
        ScoringMode::Score => a != b,
        ScoringMode::WinLoss => a != 0.5 && b != 0.5,
    }
}

/// Aggregate statistics for one participant. Goal columns stay zero outside
/// score mode.
#[derive(Debug, Clone, Serialize)]
pub struct StandingRow {
    pub participant: Participant,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
    pub goals_for: f64,
    pub goals_against: f64,
    pub goal_diff: f64,
}

impl StandingRow {
    fn empty(participant: &Participant) -> Self {
        Self {
            participant: participant.clone(),
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
            goals_for: 0.0,
            goals_against: 0.0,
            goal_diff: 0.0,
        }
    }

    fn apply(&mut self, outcome: Outcome, rules: &PointRules) {
        self.played += 1;
        self.points += outcome.points(rules);
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }
    }
}

/// Compute ranked standings for the roster. Pure: every call walks all
/// unordered pairs once, accumulates both sides of each confirmed result,
/// then sorts with the tie-break chain.
pub fn compute_standings(
    players: &[Participant],
    results: &ResultsMap,
    mode: ScoringMode,
    allow_draw: bool,
    rules: &PointRules,
) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = players.iter().map(StandingRow::empty).collect();

    for i in 0..players.len() {
        for j in (i + 1)..players.len() {
            let Some(view) = results.view(&players[i].id, &players[j].id) else {
                continue;
            };
            if !is_confirmed(&view, mode, allow_draw) {
                continue;
            }
            let (Some(a), Some(b)) = (view.score_a, view.score_b) else {
                continue;
            };

            let outcome = outcome_for(a, b);
            rows[i].apply(outcome, rules);
            rows[j].apply(outcome.reversed(), rules);

            if mode == ScoringMode::Score {
                rows[i].goals_for += a;
                rows[i].goals_against += b;
                rows[j].goals_for += b;
                rows[j].goals_against += a;
            }
        }
    }

    for row in &mut rows {
        row.goal_diff = row.goals_for - row.goals_against;
    }

    // Pairwise head-to-head can go cyclic across three tied rows (A beat B
    // beat C beat A), which the std sort rejects as a non-total order. An
    // insertion sort over this roster-sized list handles it deterministically.
    for i in 1..rows.len() {
        let mut j = i;
        while j > 0
            && rank_order(&rows[j - 1], &rows[j], results, mode, allow_draw)
                == Ordering::Greater
        {
            rows.swap(j - 1, j);
            j -= 1;
        }
    }
    rows
}

/// Head-to-head between exactly the two compared participants: a confirmed
/// direct win ranks its winner first; a confirmed draw breaks nothing.
fn head_to_head(
    a: &ParticipantId,
    b: &ParticipantId,
    results: &ResultsMap,
    mode: ScoringMode,
    allow_draw: bool,
) -> Option<Ordering> {
    let view = results.view(a, b)?;
    if !is_confirmed(&view, mode, allow_draw) {
        return None;
    }
    match outcome_for(view.score_a?, view.score_b?) {
        Outcome::Win => Some(Ordering::Less),
        Outcome::Loss => Some(Ordering::Greater),
        Outcome::Draw => None,
    }
}

/// The ranking comparator. Each rule applies only when every rule before it
/// ties; the trailing name/id rules make the order total and independent of
/// roster insertion order.
fn rank_order(
    x: &StandingRow,
    y: &StandingRow,
    results: &ResultsMap,
    mode: ScoringMode,
    allow_draw: bool,
) -> Ordering {
    let ord = y.points.cmp(&x.points);
    if ord != Ordering::Equal {
        return ord;
    }

    if mode == ScoringMode::Score {
        let ord = x.losses.cmp(&y.losses);
        if ord != Ordering::Equal {
            return ord;
        }
    }

    if let Some(ord) = head_to_head(
        &x.participant.id,
        &y.participant.id,
        results,
        mode,
        allow_draw,
    ) {
        return ord;
    }

    match mode {
        ScoringMode::Score => {
            let ord = y
                .goal_diff
                .total_cmp(&x.goal_diff)
                .then_with(|| y.goals_for.total_cmp(&x.goals_for))
                .then_with(|| y.wins.cmp(&x.wins));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        ScoringMode::WinLoss => {
            let ord = y.wins.cmp(&x.wins).then_with(|| x.losses.cmp(&y.losses));
            if ord != Ordering::Equal {
                return ord;
            }
        }
    }

    name_order(&x.participant, &y.participant)
}

fn name_order(x: &Participant, y: &Participant) -> Ordering {
    x.name
        .to_lowercase()
        .cmp(&y.name.to_lowercase())
        .then_with(|| x.name.cmp(&y.name))
        .then_with(|| x.id.cmp(&y.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roster(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .map(|name| Participant {
                id: ParticipantId::from(format!("id-{}", name.to_lowercase())),
                name: name.to_string(),
            })
            .collect()
    }

    fn record(results: &mut ResultsMap, players: &[Participant], a: usize, b: usize, sa: f64, sb: f64) {
        results.record(&players[a].id, &players[b].id, Some(sa), Some(sb));
    }

    fn names(rows: &[StandingRow]) -> Vec<&str> {
        rows.iter().map(|r| r.participant.name.as_str()).collect()
    }

    #[test]
    fn test_outcome_is_symmetric() {
        assert_eq!(outcome_for(3.0, 1.0), Outcome::Win);
        assert_eq!(outcome_for(1.0, 3.0), Outcome::Loss);
        assert_eq!(outcome_for(2.0, 2.0), Outcome::Draw);
        assert_eq!(outcome_for(3.0, 1.0).reversed(), outcome_for(1.0, 3.0));
        assert_eq!(outcome_for(1.0, 0.0), Outcome::Win); // win/loss encoding
        assert_eq!(outcome_for(0.5, 0.5), Outcome::Draw);
    }

    #[test]
    fn test_unconfirmed_when_score_missing() {
        let view = MatchView { score_a: Some(2.0), score_b: None };
        assert!(!is_confirmed(&view, ScoringMode::Score, true));
        let view = MatchView { score_a: None, score_b: None };
        assert!(!is_confirmed(&view, ScoringMode::Score, true));
    }

    #[test]
    fn test_disallowed_draw_is_unconfirmed() {
        let draw = MatchView { score_a: Some(2.0), score_b: Some(2.0) };
        assert!(is_confirmed(&draw, ScoringMode::Score, true));
        assert!(!is_confirmed(&draw, ScoringMode::Score, false));

        let sentinel = MatchView { score_a: Some(0.5), score_b: Some(0.5) };
        assert!(is_confirmed(&sentinel, ScoringMode::WinLoss, true));
        assert!(!is_confirmed(&sentinel, ScoringMode::WinLoss, false));
    }

    #[test]
    fn test_worked_score_mode_scenario() {
        // A beats B 3-1, B-C ends 2-2, C never played A.
        let players = roster(&["A", "B", "C"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 3.0, 1.0);
        record(&mut results, &players, 1, 2, 2.0, 2.0);

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        assert_eq!(names(&rows), vec!["A", "C", "B"]);

        let a = &rows[0];
        assert_eq!((a.played, a.wins, a.draws, a.losses), (1, 1, 0, 0));
        assert_eq!(a.points, 3);
        assert_eq!(a.goal_diff, 2.0);

        // B and C both have one draw (1 point), but B also carries a loss.
        let c = &rows[1];
        let b = &rows[2];
        assert_eq!((c.played, c.draws, c.losses), (1, 1, 0));
        assert_eq!((b.played, b.draws, b.losses), (2, 1, 1));
    }

    #[test]
    fn test_disallowed_draw_contributes_nothing() {
        let players = roster(&["A", "B"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 2.0, 2.0);

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            false,
            &PointRules::default(),
        );

        assert!(rows.iter().all(|r| r.played == 0 && r.points == 0));
        // With all-zero stats the name rule orders the pair.
        assert_eq!(names(&rows), vec!["A", "B"]);
    }

    #[test]
    fn test_standings_totals() {
        let players = roster(&["A", "B", "C", "D"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 2.0, 0.0);
        record(&mut results, &players, 0, 2, 1.0, 1.0);
        record(&mut results, &players, 1, 3, 0.0, 3.0);
        record(&mut results, &players, 2, 3, 2.0, 2.0);
        // Partially entered, must not count.
        results.record(&players[0].id, &players[3].id, Some(1.0), None);

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        let played: u32 = rows.iter().map(|r| r.played).sum();
        let wins: u32 = rows.iter().map(|r| r.wins).sum();
        let draws: u32 = rows.iter().map(|r| r.draws).sum();
        assert_eq!(played, 2 * 4); // four confirmed matches
        assert_eq!(wins, 2); // two decisive matches
        assert_eq!(draws, 2 * 2); // two drawn matches
    }

    #[test]
    fn test_head_to_head_breaks_points_and_loss_tie() {
        // A and B end on identical points and losses. A's goal difference is
        // far better, but B won the direct match and must rank first.
        let players = roster(&["A", "B", "C", "D"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 1, 0, 1.0, 0.0); // B beats A narrowly
        record(&mut results, &players, 0, 2, 9.0, 0.0); // A crushes C
        record(&mut results, &players, 3, 1, 1.0, 0.0); // D beats B

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        // D: 3 pts, 0 losses. A and B: 3 pts, 1 loss each; A's GD is +8,
        // B's is 0, yet head-to-head puts B above A.
        assert_eq!(names(&rows), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_drawn_head_to_head_falls_through_to_goal_difference() {
        let players = roster(&["A", "B", "C"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 1.0, 1.0); // A-B drawn
        record(&mut results, &players, 0, 2, 4.0, 0.0); // A beats C
        record(&mut results, &players, 1, 2, 2.0, 0.0); // B beats C

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        // A and B tie on points and losses, drew their duel; A's goal
        // difference (+4) beats B's (+2).
        assert_eq!(names(&rows), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_win_loss_mode_ranking() {
        let players = roster(&["A", "B", "C"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 1.0, 0.0); // A beats B
        record(&mut results, &players, 1, 2, 0.5, 0.5); // B draws C

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::WinLoss,
            true,
            &PointRules::default(),
        );

        assert_eq!(names(&rows), vec!["A", "C", "B"]);
        assert_eq!(rows[0].points, 3);
        // Goal columns never accumulate outside score mode.
        assert!(rows.iter().all(|r| r.goals_for == 0.0 && r.goals_against == 0.0));
    }

    #[test]
    fn test_ranking_is_deterministic_and_insertion_independent() {
        let players = roster(&["Mallory", "Alice", "Bob"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 1.0, 1.0);

        let rules = PointRules::default();
        let first = compute_standings(&players, &results, ScoringMode::Score, true, &rules);
        let second = compute_standings(&players, &results, ScoringMode::Score, true, &rules);
        assert_eq!(names(&first), names(&second));

        // Swapping two equal-ranked participants in the roster changes nothing.
        let mut swapped = players.clone();
        swapped.swap(0, 1);
        let third = compute_standings(&swapped, &results, ScoringMode::Score, true, &rules);
        assert_eq!(names(&first), names(&third));
    }

    #[test]
    fn test_cyclic_head_to_head_still_ranks() {
        // Rock-paper-scissors results: every pairwise comparison has a
        // direct winner, so no total order exists. The sort must still
        // terminate with every row present.
        let players = roster(&["A", "B", "C"]);
        let mut results = ResultsMap::new();
        record(&mut results, &players, 0, 1, 1.0, 0.0); // A beats B
        record(&mut results, &players, 1, 2, 1.0, 0.0); // B beats C
        record(&mut results, &players, 2, 0, 1.0, 0.0); // C beats A

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.points == 3 && r.wins == 1 && r.losses == 1));
    }

    #[test]
    fn test_zero_match_participants_sort_by_name() {
        let players = roster(&["zoe", "Adam", "mia"]);
        let results = ResultsMap::new();
        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );
        assert_eq!(names(&rows), vec!["Adam", "mia", "zoe"]);
    }

    #[test]
    fn test_reverse_stored_result_counts_correctly() {
        // Result stored under (B, A); standings walk pairs as (A, B) and must
        // see the swapped view.
        let players = roster(&["A", "B"]);
        let mut results = ResultsMap::new();
        results.record(&players[1].id, &players[0].id, Some(0.0), Some(4.0));

        let rows = compute_standings(
            &players,
            &results,
            ScoringMode::Score,
            true,
            &PointRules::default(),
        );

        assert_eq!(rows[0].participant.name, "A");
        assert_eq!(rows[0].wins, 1);
        assert_eq!(rows[0].goals_for, 4.0);
        assert_eq!(rows[1].losses, 1);
    }
}
