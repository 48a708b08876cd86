//! Round-robin schedule generation (circle method).
//!
//! A pure function of the roster: the anchor participant stays fixed while
//! the rest rotate one slot per round, which pairs every participant with
//! every other exactly once. Odd rosters get a synthetic bye slot.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Participant, ParticipantId};

/// A single pairing. `away: None` is a bye round for `home`; byes never get
/// a sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledMatch {
    pub number: Option<u32>,
    pub home: ParticipantId,
    pub away: Option<ParticipantId>,
}

impl ScheduledMatch {
    pub fn is_bye(&self) -> bool {
        self.away.is_none()
    }
}

/// One round of pairings, 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSchedule {
    pub round: u32,
    pub matches: Vec<ScheduledMatch>,
}

fn pair_up(
    x: Option<ParticipantId>,
    y: Option<ParticipantId>,
    next_number: &mut u32,
) -> Option<ScheduledMatch> {
    match (x, y) {
        (Some(home), Some(away)) => {
            let number = *next_number;
            *next_number += 1;
            Some(ScheduledMatch { number: Some(number), home, away: Some(away) })
        }
        // The real participant always takes the first slot of a bye pairing.
        (Some(home), None) | (None, Some(home)) => {
            Some(ScheduledMatch { number: None, home, away: None })
        }
        // A single bye slot exists at most, so two empty slots never pair.
        (None, None) => None,
    }
}

/// Generate the full round-robin schedule for the roster, in roster order.
///
/// Sequence numbers cover real matches only and run contiguously from 1 in
/// round-major generation order. Rosters smaller than 2 yield no rounds.
pub fn generate_schedule(players: &[Participant]) -> Vec<RoundSchedule> {
    if players.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Option<ParticipantId>> =
        players.iter().map(|p| Some(p.id.clone())).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    let half = n / 2;

    let anchor = slots[0].clone();
    let mut rotating: Vec<Option<ParticipantId>> = slots[1..].to_vec();

    let mut next_number = 1u32;
    let mut rounds = Vec::with_capacity(n - 1);

    for round in 1..=(n as u32 - 1) {
        let rot_len = rotating.len();
        let mut matches: Vec<ScheduledMatch> = Vec::with_capacity(half);

        matches.extend(pair_up(
            anchor.clone(),
            rotating[rot_len - 1].clone(),
            &mut next_number,
        ));
        for i in 0..half - 1 {
            matches.extend(pair_up(
                rotating[i].clone(),
                rotating[rot_len - 2 - i].clone(),
                &mut next_number,
            ));
        }

        // Display order only: real matches first, byes last. Numbers were
        // already assigned in generation order above.
        matches.sort_by_key(ScheduledMatch::is_bye);

        if let Some(tail) = rotating.pop() {
            rotating.insert(0, tail);
        }

        rounds.push(RoundSchedule { round, matches });
    }

    rounds
}

/// Pair -> sequence number lookup, registered under both id orders so the
/// result grid can annotate either viewpoint.
pub fn match_numbers(rounds: &[RoundSchedule]) -> HashMap<(ParticipantId, ParticipantId), u32> {
    let mut map = HashMap::new();
    for round in rounds {
        for m in &round.matches {
            if let (Some(number), Some(away)) = (m.number, &m.away) {
                map.insert((m.home.clone(), away.clone()), number);
                map.insert((away.clone(), m.home.clone()), number);
            }
        }
    }
    map
}
