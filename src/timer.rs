use std::time::{Duration, Instant};

/// Shortest interval a cadence accepts; zero would make it due forever
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// A recurring task owned by a session.
///
/// The cadence never fires on its own; the owner asks whether it is due on
/// each runtime tick. Dropping or cancelling it stops it for good.
#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    /// `None` when the first firing lies beyond what `Instant` can represent
    next_due: Option<Instant>,
    cancelled: bool,
}

impl Cadence {
    pub fn start(interval: Duration, now: Instant) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next_due: now.checked_add(interval),
            cancelled: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Returns true once per elapsed interval; missed intervals collapse into one firing.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if self.cancelled || now < due {
            return false;
        }
        // stay on the original grid: next due is the first slot after `now`
        let behind = now.duration_since(due).as_nanos() % self.interval.as_nanos();
        let into_slot = Duration::from_nanos(u64::try_from(behind).unwrap_or(0));
        self.next_due = now.checked_add(self.interval - into_slot);
        true
    }
}
