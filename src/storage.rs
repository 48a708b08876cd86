//! Snapshot persistence.
//!
//! One JSON file holds the whole tournament. Loading is defensive: every
//! field is validated independently and falls back to the caller's defaults
//! instead of failing the load, so a corrupted file degrades gracefully.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::{
    MatchRecord, Participant, ParticipantId, Phase, ScoringMode, Tournament, MAX_PLAYERS,
};

const SNAPSHOT_FILE: &str = "tournament.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Snapshot<'a> {
    title: &'a str,
    mode: ScoringMode,
    allow_draw: bool,
    show_schedule: bool,
    phase: Phase,
    players: &'a [Participant],
    matches: &'a crate::models::ResultsMap,
    saved_at: DateTime<Utc>,
}

/// Filesystem store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE)
    }

    /// Persist the current state. Called after every completed change.
    pub fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;
        let snapshot = Snapshot {
            title: &tournament.title,
            mode: tournament.mode,
            allow_draw: tournament.allow_draw,
            show_schedule: tournament.show_schedule,
            phase: tournament.phase,
            players: &tournament.players,
            matches: &tournament.results,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(self.snapshot_path(), json)?;
        debug!(path = %self.snapshot_path().display(), "snapshot saved");
        Ok(())
    }

    /// Load the snapshot, falling back to `defaults` wholesale when the file
    /// is missing or unreadable, and per field when it is malformed.
    pub fn load(&self, defaults: &Tournament) -> Tournament {
        let path = self.snapshot_path();
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no snapshot yet, starting fresh");
                return defaults.clone();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, starting fresh");
                return defaults.clone();
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => decode_snapshot(&value, defaults),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot is not valid JSON, starting fresh");
                defaults.clone()
            }
        }
    }
}

fn decode_snapshot(value: &Value, defaults: &Tournament) -> Tournament {
    let mut tournament = Tournament {
        title: string_field(value, "title", &defaults.title),
        mode: mode_field(value, defaults.mode),
        allow_draw: bool_field(value, "allow_draw", defaults.allow_draw),
        show_schedule: bool_field(value, "show_schedule", defaults.show_schedule),
        phase: phase_field(value, defaults.phase),
        players: decode_players(value),
        results: Default::default(),
    };
    decode_matches(value, &mut tournament);
    tournament
}

fn string_field(value: &Value, key: &str, default: &str) -> String {
    match value.get(key).and_then(Value::as_str) {
        Some(s) => s.to_string(),
        None => {
            warn!(key, "snapshot field missing or malformed, using default");
            default.to_string()
        }
    }
}

fn bool_field(value: &Value, key: &str, default: bool) -> bool {
    match value.get(key).and_then(Value::as_bool) {
        Some(b) => b,
        None => {
            warn!(key, "snapshot field missing or malformed, using default");
            default
        }
    }
}

fn mode_field(value: &Value, default: ScoringMode) -> ScoringMode {
    value
        .get("mode")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            warn!("snapshot mode missing or malformed, using default");
            default
        })
}

fn phase_field(value: &Value, default: Phase) -> Phase {
    value
        .get("phase")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            warn!("snapshot phase missing or malformed, using default");
            default
        })
}

fn decode_players(value: &Value) -> Vec<Participant> {
    let Some(entries) = value.get("players").and_then(Value::as_array) else {
        warn!("snapshot roster missing or malformed, starting empty");
        return Vec::new();
    };

    let mut players = Vec::new();
    let mut seen = HashSet::new();
    for entry in entries {
        let id = entry.get("id").and_then(Value::as_str).unwrap_or_default();
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            warn!("skipping malformed roster entry");
            continue;
        };
        if id.is_empty() {
            warn!(name, "skipping roster entry without an id");
            continue;
        }
        if !seen.insert(id.to_string()) {
            warn!(id, "skipping roster entry with duplicate id");
            continue;
        }
        players.push(Participant { id: ParticipantId::from(id), name: name.to_string() });
        if players.len() == MAX_PLAYERS {
            break;
        }
    }
    players
}

fn score_value(entry: &Value, key: &str) -> Option<f64> {
    // Anything that is not a non-negative number reads as "not entered".
    entry
        .get(key)
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite() && *s >= 0.0)
}

fn decode_matches(value: &Value, tournament: &mut Tournament) {
    let Some(entries) = value.get("matches").and_then(Value::as_object) else {
        warn!("snapshot matches missing or malformed, starting empty");
        return;
    };

    let known: HashSet<&str> = tournament.players.iter().map(|p| p.id.as_str()).collect();

    // serde_json objects iterate in key order, so duplicate-direction
    // resolution is deterministic: the first key of the pair wins.
    for (key, entry) in entries {
        let Some((a, b)) = key.split_once(':') else {
            warn!(key = %key, "skipping match entry with malformed key");
            continue;
        };
        if a == b || !known.contains(a) || !known.contains(b) {
            warn!(key = %key, "skipping match entry with unknown or self pairing");
            continue;
        }
        let (p1, p2) = (ParticipantId::from(a), ParticipantId::from(b));
        if tournament.results.view(&p1, &p2).is_some() {
            warn!(key = %key, "skipping reverse duplicate of an already loaded pair");
            continue;
        }
        let record = MatchRecord {
            score_a: score_value(entry, "score_a"),
            score_b: score_value(entry, "score_b"),
        };
        if record.score_a.is_none() && record.score_b.is_none() {
            continue;
        }
        tournament.results.record(&p1, &p2, record.score_a, record.score_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringMode;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn defaults() -> Tournament {
        Tournament::new("Club Night", ScoringMode::Score, true, true)
    }

    fn store() -> (TempDir, SnapshotStore) {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (_dir, store) = store();
        let loaded = store.load(&defaults());
        assert_eq!(loaded.title, "Club Night");
        assert!(loaded.players.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, store) = store();
        let mut t = defaults();
        let a = t.register("Alice").unwrap().participant;
        let b = t.register("Bob").unwrap().participant;
        t.record_result(&a.id, &b.id, Some(3.0), Some(1.0)).unwrap();
        t.phase = Phase::Match;
        store.save(&t).unwrap();

        let loaded = store.load(&defaults());
        assert_eq!(loaded.title, t.title);
        assert_eq!(loaded.phase, Phase::Match);
        assert_eq!(loaded.players, t.players);
        let view = loaded.results.view(&a.id, &b.id).unwrap();
        assert_eq!((view.score_a, view.score_b), (Some(3.0), Some(1.0)));
    }

    #[test]
    fn test_malformed_fields_fall_back_individually() {
        let (dir, store) = store();
        let raw = r#"{
            "title": 42,
            "mode": "swiss",
            "allow_draw": "yes",
            "show_schedule": false,
            "phase": "playoffs",
            "players": [
                {"id": "a", "name": "Alice"},
                {"id": "", "name": "NoId"},
                {"name": "AlsoNoId"},
                {"id": "b", "name": 7},
                {"id": "a", "name": "DupId"},
                {"id": "c", "name": "Carol"}
            ],
            "matches": {
                "a:c": {"score_a": 2, "score_b": 0},
                "a:ghost": {"score_a": 1, "score_b": 0},
                "mangled": {"score_a": 1, "score_b": 0},
                "c:c": {"score_a": 1, "score_b": 0},
                "c:a": {"score_a": 9, "score_b": 9}
            }
        }"#;
        std::fs::write(dir.path().join("tournament.json"), raw).unwrap();

        let loaded = store.load(&defaults());
        assert_eq!(loaded.title, "Club Night"); // wrong type
        assert_eq!(loaded.mode, ScoringMode::Score); // unknown tag
        assert!(loaded.allow_draw); // wrong type
        assert!(!loaded.show_schedule); // valid field kept
        assert_eq!(loaded.phase, Phase::Settings); // unknown tag

        let names: Vec<&str> = loaded.players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);

        // Only the well-formed first-direction entry survives.
        assert_eq!(loaded.results.len(), 1);
        let view = loaded
            .results
            .view(&ParticipantId::from("a"), &ParticipantId::from("c"))
            .unwrap();
        assert_eq!((view.score_a, view.score_b), (Some(2.0), Some(0.0)));
    }

    #[test]
    fn test_invalid_scores_normalize_to_unentered() {
        let (dir, store) = store();
        let raw = r#"{
            "title": "T", "mode": "score", "allow_draw": true,
            "show_schedule": true, "phase": "match",
            "players": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
            "matches": {"a:b": {"score_a": -3, "score_b": "two"}}
        }"#;
        std::fs::write(dir.path().join("tournament.json"), raw).unwrap();

        let loaded = store.load(&defaults());
        // Both sides normalize to None, so the entry is dropped entirely.
        assert!(loaded.results.is_empty());
    }

    #[test]
    fn test_roster_truncated_to_cap() {
        let (dir, store) = store();
        let players: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"id": "p{}", "name": "P{}"}}"#, i, i))
            .collect();
        let raw = format!(
            r#"{{"title": "T", "mode": "score", "allow_draw": true,
                "show_schedule": true, "phase": "register",
                "players": [{}], "matches": {{}}}}"#,
            players.join(",")
        );
        std::fs::write(dir.path().join("tournament.json"), raw).unwrap();

        let loaded = store.load(&defaults());
        assert_eq!(loaded.players.len(), MAX_PLAYERS);
    }

    #[test]
    fn test_garbage_file_yields_defaults() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("tournament.json"), "not json at all").unwrap();
        let loaded = store.load(&defaults());
        assert_eq!(loaded.title, "Club Night");
    }
}
