//! Shared application state.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{PointRules, Tournament};
use crate::storage::SnapshotStore;

/// One logical owner of the snapshot. Handlers read under the lock and
/// replace the whole value on mutation; nothing is edited in place.
#[derive(Clone)]
pub struct AppState {
    pub tournament: Arc<RwLock<Tournament>>,
    pub store: Arc<SnapshotStore>,
    pub rules: PointRules,
}

impl AppState {
    pub fn new(tournament: Tournament, store: SnapshotStore, rules: PointRules) -> Self {
        Self {
            tournament: Arc::new(RwLock::new(tournament)),
            store: Arc::new(store),
            rules,
        }
    }
}
