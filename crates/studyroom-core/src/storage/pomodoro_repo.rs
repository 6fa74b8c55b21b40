//! Pomodoro snapshot persistence.
//!
//! Repositories never fail outward. Storage and decoding problems are logged
//! and turn into `None` or a no-op, so a broken store only costs the user
//! their saved countdown.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

use super::database::Database;
use crate::timer::{now_ms, PomodoroSnapshot};

/// Snapshots older than one hour are discarded on load.
pub const STALE_AFTER_MS: u64 = 60 * 60 * 1000;

/// Key of the snapshot in the kv table.
pub const POMODORO_STATE_KEY: &str = "pomodoro-state";

pub trait PomodoroRepository {
    /// Persist `snapshot` with its timestamp replaced by the current time.
    fn save(&self, snapshot: &PomodoroSnapshot) {
        self.save_at(snapshot, now_ms());
    }

    /// Persist `snapshot` as of `timestamp` (ms since the epoch).
    fn save_at(&self, snapshot: &PomodoroSnapshot, timestamp: u64);

    /// The saved snapshot, unless there is none, it is stale or it does not
    /// parse. A stale snapshot is also cleared.
    fn load(&self) -> Option<PomodoroSnapshot>;

    fn clear(&self);
}

fn encode(snapshot: &PomodoroSnapshot, timestamp: u64) -> Option<String> {
    let stamped = PomodoroSnapshot {
        timestamp,
        ..snapshot.clone()
    };
    match serde_json::to_string(&stamped) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "failed to encode pomodoro snapshot");
            None
        }
    }
}

enum Decoded {
    Fresh(PomodoroSnapshot),
    Stale,
    Malformed,
}

fn decode(raw: &str) -> Decoded {
    match serde_json::from_str::<PomodoroSnapshot>(raw) {
        Ok(snapshot) if now_ms().saturating_sub(snapshot.timestamp) > STALE_AFTER_MS => {
            Decoded::Stale
        }
        Ok(snapshot) => Decoded::Fresh(snapshot),
        Err(e) => {
            warn!(error = %e, "failed to load pomodoro snapshot");
            Decoded::Malformed
        }
    }
}

// ── In memory ────────────────────────────────────────────────────────

/// Keeps the encoded snapshot in memory. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPomodoroRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryPomodoroRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text as if it had been saved.
    pub fn put_raw(&self, raw: impl Into<String>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.into());
    }

    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PomodoroRepository for InMemoryPomodoroRepository {
    fn save_at(&self, snapshot: &PomodoroSnapshot, timestamp: u64) {
        if let Some(json) = encode(snapshot, timestamp) {
            self.put_raw(json);
        }
    }

    fn load(&self) -> Option<PomodoroSnapshot> {
        let raw = self.raw()?;
        match decode(&raw) {
            Decoded::Fresh(snapshot) => Some(snapshot),
            Decoded::Stale => {
                self.clear();
                None
            }
            Decoded::Malformed => None,
        }
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// ── SQLite ───────────────────────────────────────────────────────────

pub struct SqlitePomodoroRepository {
    db: Database,
}

impl SqlitePomodoroRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl PomodoroRepository for SqlitePomodoroRepository {
    fn save_at(&self, snapshot: &PomodoroSnapshot, timestamp: u64) {
        let Some(json) = encode(snapshot, timestamp) else {
            return;
        };
        if let Err(e) = self.db.kv_set(POMODORO_STATE_KEY, &json) {
            warn!(error = %e, "failed to save pomodoro snapshot");
        }
    }

    fn load(&self) -> Option<PomodoroSnapshot> {
        let raw = match self.db.kv_get(POMODORO_STATE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read pomodoro snapshot");
                return None;
            }
        };
        match decode(&raw) {
            Decoded::Fresh(snapshot) => Some(snapshot),
            Decoded::Stale => {
                self.clear();
                None
            }
            Decoded::Malformed => None,
        }
    }

    fn clear(&self) {
        if let Err(e) = self.db.kv_delete(POMODORO_STATE_KEY) {
            warn!(error = %e, "failed to clear pomodoro snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::PomodoroPhase;

    fn snapshot(timestamp: u64) -> PomodoroSnapshot {
        PomodoroSnapshot {
            phase: PomodoroPhase::ShortBreak,
            remaining_time: 300,
            completed_sessions: 2,
            state: "PAUSED".to_string(),
            timestamp,
        }
    }

    #[test]
    fn save_stamps_current_time() {
        let repo = InMemoryPomodoroRepository::new();
        repo.save(&snapshot(0));
        let loaded = repo.load().unwrap();
        assert!(loaded.timestamp > 0);
        assert_eq!(loaded.remaining_time, 300);
        assert_eq!(loaded.state, "PAUSED");
    }

    #[test]
    fn save_at_keeps_the_given_time() {
        let repo = InMemoryPomodoroRepository::new();
        let earlier = now_ms() - 1_750;
        repo.save_at(&snapshot(0), earlier);
        assert_eq!(repo.load().unwrap().timestamp, earlier);
    }

    #[test]
    fn stale_snapshot_is_cleared() {
        let repo = InMemoryPomodoroRepository::new();
        let old = snapshot(now_ms() - 2 * STALE_AFTER_MS);
        repo.put_raw(serde_json::to_string(&old).unwrap());

        assert!(repo.load().is_none());
        assert!(repo.raw().is_none());
    }

    #[test]
    fn malformed_data_loads_as_none_and_is_kept() {
        let repo = InMemoryPomodoroRepository::new();
        repo.put_raw("invalid-json");
        assert!(repo.load().is_none());
        assert_eq!(repo.raw().as_deref(), Some("invalid-json"));
    }

    #[test]
    fn sqlite_round_trip_under_fixed_key() {
        let repo = SqlitePomodoroRepository::new(Database::open_memory().unwrap());
        assert!(repo.load().is_none());

        repo.save(&snapshot(0));
        assert!(repo
            .database()
            .kv_get(POMODORO_STATE_KEY)
            .unwrap()
            .is_some());
        assert_eq!(repo.load().unwrap().completed_sessions, 2);

        repo.clear();
        assert!(repo.load().is_none());
    }
}
