//! Core data structures: participants, match results, and the tournament snapshot.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum roster size.
pub const MAX_PLAYERS: usize = 10;

/// Opaque unique identifier for a participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ParticipantId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for ParticipantId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered participant. The roster keeps insertion order: it defines the
/// result-grid order and the starting arrangement for scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

/// How match results are entered and ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    /// Numeric scores per side (goals, frames, legs...).
    Score,
    /// Categorical outcome per side: 1 win, 0.5 draw, 0 loss.
    WinLoss,
}

impl ScoringMode {
    pub fn label(self) -> &'static str {
        match self {
            ScoringMode::Score => "score",
            ScoringMode::WinLoss => "win-loss",
        }
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "score" => Ok(ScoringMode::Score),
            "win-loss" | "winloss" | "win_loss" => Ok(ScoringMode::WinLoss),
            other => Err(format!("unknown mode: {} (expected 'score' or 'win-loss')", other)),
        }
    }
}

/// UI phase tag carried through the snapshot. The core does not gate any
/// operation on it; transitions belong to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Settings,
    Register,
    Match,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Settings => "settings",
            Phase::Register => "register",
            Phase::Match => "match",
        }
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "settings" => Ok(Phase::Settings),
            "register" => Ok(Phase::Register),
            "match" => Ok(Phase::Match),
            other => Err(format!(
                "unknown phase: {} (expected 'settings', 'register' or 'match')",
                other
            )),
        }
    }
}

/// Point values awarded per outcome when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRules {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointRules {
    fn default() -> Self {
        Self { win: 3, draw: 1, loss: 0 }
    }
}

/// A stored result. `score_a` belongs to the first id of the stored key,
/// `score_b` to the second. A `None` side has not been entered yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

/// A result normalized to the caller's viewpoint: `score_a` is the first
/// queried participant's score regardless of which direction is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchView {
    pub score_a: Option<f64>,
    pub score_b: Option<f64>,
}

fn pair_key(p1: &ParticipantId, p2: &ParticipantId) -> String {
    format!("{}:{}", p1.as_str(), p2.as_str())
}

/// Sparse map of recorded results, keyed by a directed participant pair.
///
/// Invariant: for any unordered pair at most one of the two possible keys
/// holds data. `view` is the single lookup path; every statistic, tie-break
/// and schedule annotation goes through it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultsMap {
    entries: HashMap<String, MatchRecord>,
}

impl ResultsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the result for `(p1, p2)` from `p1`'s viewpoint. Checks the
    /// stored direction first and swaps the reverse direction if that is the
    /// one that exists.
    pub fn view(&self, p1: &ParticipantId, p2: &ParticipantId) -> Option<MatchView> {
        if let Some(rec) = self.entries.get(&pair_key(p1, p2)) {
            return Some(MatchView { score_a: rec.score_a, score_b: rec.score_b });
        }
        self.entries.get(&pair_key(p2, p1)).map(|rec| MatchView {
            score_a: rec.score_b,
            score_b: rec.score_a,
        })
    }

    /// Store scores for `(p1, p2)` as seen from `p1`. Writes into whichever
    /// direction already holds the pair, so a pair is never present under
    /// both keys. Clearing both sides removes the entry.
    pub fn record(
        &mut self,
        p1: &ParticipantId,
        p2: &ParticipantId,
        score_a: Option<f64>,
        score_b: Option<f64>,
    ) {
        let forward = pair_key(p1, p2);
        let reverse = pair_key(p2, p1);
        if score_a.is_none() && score_b.is_none() {
            self.entries.remove(&forward);
            self.entries.remove(&reverse);
            return;
        }
        if self.entries.contains_key(&reverse) {
            self.entries.insert(reverse, MatchRecord { score_a: score_b, score_b: score_a });
        } else {
            self.entries.insert(forward, MatchRecord { score_a, score_b });
        }
    }

    /// Remove whichever direction holds the pair, if any.
    pub fn clear(&mut self, p1: &ParticipantId, p2: &ParticipantId) {
        self.entries.remove(&pair_key(p1, p2));
        self.entries.remove(&pair_key(p2, p1));
    }

    /// Drop every entry that mentions `id`.
    pub fn remove_participant(&mut self, id: &ParticipantId) {
        self.entries.retain(|key, _| {
            key.split_once(':')
                .map(|(a, b)| a != id.as_str() && b != id.as_str())
                .unwrap_or(false)
        });
    }
}

/// Errors from roster and result mutations. The pure computations (schedule,
/// standings, lookup) never fail; these cover the state-changing edges only.
#[derive(Debug, thiserror::Error)]
pub enum TournamentError {
    #[error("roster is full ({max} participants max)")]
    RosterFull { max: usize },

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("a participant cannot play against themselves")]
    SelfPairing,
}

/// Outcome of a registration. Duplicate names are allowed but flagged so the
/// caller can warn; the id is the uniqueness key throughout.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub participant: Participant,
    pub duplicate_name: bool,
}

/// The single in-memory snapshot everything is computed from. Owners replace
/// it wholesale on change; schedule and standings are derived views.
#[derive(Debug, Clone, Serialize)]
pub struct Tournament {
    pub title: String,
    pub mode: ScoringMode,
    pub allow_draw: bool,
    pub show_schedule: bool,
    pub phase: Phase,
    pub players: Vec<Participant>,
    pub results: ResultsMap,
}

impl Tournament {
    pub fn new(title: &str, mode: ScoringMode, allow_draw: bool, show_schedule: bool) -> Self {
        Self {
            title: title.to_string(),
            mode,
            allow_draw,
            show_schedule,
            phase: Phase::Settings,
            players: Vec::new(),
            results: ResultsMap::new(),
        }
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Case-insensitive name lookup; `None` when absent or ambiguous.
    pub fn find_by_name(&self, name: &str) -> Option<&Participant> {
        let mut hits = self
            .players
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name.trim()));
        match (hits.next(), hits.next()) {
            (Some(p), None) => Some(p),
            _ => None,
        }
    }

    pub fn register(&mut self, name: &str) -> Result<Registration, TournamentError> {
        if self.players.len() >= MAX_PLAYERS {
            return Err(TournamentError::RosterFull { max: MAX_PLAYERS });
        }
        let name = name.trim();
        let duplicate_name = self.players.iter().any(|p| p.name == name);
        let participant = Participant { id: ParticipantId::new(), name: name.to_string() };
        self.players.push(participant.clone());
        tracing::debug!(name = %participant.name, id = %participant.id, "registered participant");
        Ok(Registration { participant, duplicate_name })
    }

    /// Remove a participant and all results they took part in.
    pub fn remove(&mut self, id: &ParticipantId) -> Result<Participant, TournamentError> {
        let idx = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| TournamentError::UnknownParticipant(id.to_string()))?;
        let removed = self.players.remove(idx);
        self.results.remove_participant(id);
        tracing::debug!(name = %removed.name, "removed participant");
        Ok(removed)
    }

    pub fn record_result(
        &mut self,
        p1: &ParticipantId,
        p2: &ParticipantId,
        score_a: Option<f64>,
        score_b: Option<f64>,
    ) -> Result<(), TournamentError> {
        self.check_pair(p1, p2)?;
        self.results.record(p1, p2, score_a, score_b);
        Ok(())
    }

    pub fn clear_result(
        &mut self,
        p1: &ParticipantId,
        p2: &ParticipantId,
    ) -> Result<(), TournamentError> {
        self.check_pair(p1, p2)?;
        self.results.clear(p1, p2);
        Ok(())
    }

    fn check_pair(&self, p1: &ParticipantId, p2: &ParticipantId) -> Result<(), TournamentError> {
        if p1 == p2 {
            return Err(TournamentError::SelfPairing);
        }
        for id in [p1, p2] {
            if self.participant(id).is_none() {
                return Err(TournamentError::UnknownParticipant(id.to_string()));
            }
        }
        Ok(())
    }
}
