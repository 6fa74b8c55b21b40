//! Observer registry for the pomodoro engine.
//!
//! Subscribers are notified in subscription order. Every notification pass
//! iterates a snapshot of the list, so a subscriber may drop its own
//! [`Subscription`] from inside a callback.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::phase::PomodoroPhase;

/// Receives engine notifications.
pub trait PomodoroObserver: Send + Sync {
    /// Called after every state-affecting change.
    fn on_state_change(&self, state: &str, phase: PomodoroPhase, remaining_time: u64);

    /// Called with the phase that just ended.
    fn on_phase_complete(&self, _phase: PomodoroPhase) {}

    /// Called with the new completed-session count.
    fn on_session_complete(&self, _sessions_completed: u32) {}
}

#[derive(Default)]
struct Entries {
    next_id: u64,
    list: Vec<(u64, Arc<dyn PomodoroObserver>)>,
}

#[derive(Clone, Default)]
pub struct ObserverRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn PomodoroObserver>) -> Subscription {
        let mut entries = self.lock();
        let id = entries.next_id;
        entries.next_id += 1;
        entries.list.push((id, observer));
        Subscription {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stable copy of the current subscribers, in order.
    pub fn snapshot(&self) -> Vec<Arc<dyn PomodoroObserver>> {
        self.lock()
            .list
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    /// Run `f` for each subscriber present when the pass began.
    pub fn for_each(&self, mut f: impl FnMut(&dyn PomodoroObserver)) {
        for observer in self.snapshot() {
            f(observer.as_ref());
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    entries: Weak<Mutex<Entries>>,
}

impl Subscription {
    /// Remove exactly the observer this handle was issued for. A no-op once
    /// the registry itself is gone.
    pub fn unsubscribe(self) {
        if let Some(entries) = self.entries.upgrade() {
            let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
            entries.list.retain(|(id, _)| *id != self.id);
        }
    }
}
