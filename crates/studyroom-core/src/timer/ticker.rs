//! Periodic tick source for a shared engine.
//!
//! The engine never spawns anything itself. A [`Clock`] schedules a pulse;
//! the [`Ticker`] turns each pulse into one `tick()` on the engine and owns
//! the cancellation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::engine::{lock_engine, SharedEngine};

/// Callback fired once per period.
pub type Pulse = Box<dyn FnMut() + Send + 'static>;

/// Anything that can invoke a callback periodically and be cancelled.
pub trait Clock: Send + Sync {
    fn schedule(&self, period: Duration, pulse: Pulse) -> Box<dyn PulseHandle>;
}

pub trait PulseHandle: Send {
    /// Stop firing. Idempotent.
    fn cancel(&mut self);
}

// ── Tokio clock ──────────────────────────────────────────────────────

/// Fires pulses from a tokio interval task.
#[derive(Debug, Clone)]
pub struct TokioClock {
    handle: Handle,
}

impl TokioClock {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running in.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

struct TokioPulse {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PulseHandle for TokioPulse {
    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.task.abort();
    }
}

impl Clock for TokioClock {
    fn schedule(&self, period: Duration, mut pulse: Pulse) -> Box<dyn PulseHandle> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let task = self.handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if flag.load(Ordering::Acquire) {
                    break;
                }
                pulse();
            }
        });
        Box::new(TokioPulse { cancelled, task })
    }
}

// ── Manual clock ─────────────────────────────────────────────────────

type Registered = Vec<(u64, Arc<Mutex<Pulse>>)>;

/// A clock that only fires when told to. Handy for tests and for replaying
/// elapsed time.
#[derive(Clone, Default)]
pub struct ManualClock {
    pulses: Arc<Mutex<Registered>>,
    next_id: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live pulse `periods` times.
    pub fn advance(&self, periods: usize) {
        for _ in 0..periods {
            let live: Vec<_> = self
                .pulses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(|(_, pulse)| Arc::clone(pulse))
                .collect();
            for pulse in live {
                let mut guard = pulse.lock().unwrap_or_else(PoisonError::into_inner);
                let fire = &mut *guard;
                fire();
            }
        }
    }

    /// Number of scheduled, uncancelled pulses.
    pub fn active_pulses(&self) -> usize {
        self.pulses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

struct ManualPulse {
    id: u64,
    pulses: Weak<Mutex<Registered>>,
}

impl PulseHandle for ManualPulse {
    fn cancel(&mut self) {
        if let Some(pulses) = self.pulses.upgrade() {
            pulses
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl Clock for ManualClock {
    fn schedule(&self, _period: Duration, pulse: Pulse) -> Box<dyn PulseHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.pulses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(Mutex::new(pulse))));
        Box::new(ManualPulse {
            id,
            pulses: Arc::downgrade(&self.pulses),
        })
    }
}

// ── Ticker ───────────────────────────────────────────────────────────

struct ActivePulse {
    live: Arc<AtomicBool>,
    handle: Box<dyn PulseHandle>,
}

/// Drives `tick()` on a shared engine once per second.
///
/// At most one pulse is live at a time. Each pulse checks its own liveness
/// flag while holding the engine lock, so once `stop()` returns no further
/// tick reaches the engine.
#[derive(Default)]
pub struct Ticker {
    active: Option<ActivePulse>,
}

impl Ticker {
    pub const PERIOD: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self::default()
    }

    /// Begin ticking `engine`. Any previous pulse is cancelled first.
    pub fn start(&mut self, engine: &SharedEngine, clock: &dyn Clock) {
        self.stop();
        let live = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&live);
        let engine = Arc::clone(engine);
        let handle = clock.schedule(
            Self::PERIOD,
            Box::new(move || {
                let mut engine = lock_engine(&engine);
                if flag.load(Ordering::Acquire) {
                    engine.tick();
                }
            }),
        );
        self.active = Some(ActivePulse { live, handle });
        debug!("ticker started");
    }

    /// Stop ticking. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.live.store(false, Ordering::Release);
            active.handle.cancel();
            debug!("ticker stopped");
        }
    }

    pub fn is_ticking(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
