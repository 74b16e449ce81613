use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::game_config::GameConfig;
use crate::timer::Cadence;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub click_debounce: Duration,
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            click_debounce: Duration::from_millis(300),
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Per-session data; a fresh one is built for every play-through
#[derive(Debug, Clone)]
pub struct SessionState {
    pub config: GameConfig,
    pub started_at: Instant,
    pub found: BTreeSet<usize>,
    pub elapsed_seconds: u64,
    pub last_click_at: Option<Instant>,
    pub cadence: Option<Cadence>,
}

impl SessionState {
    pub fn new(config: GameConfig, started_at: Instant, tick_interval: Duration) -> Self {
        Self {
            config,
            started_at,
            found: BTreeSet::new(),
            elapsed_seconds: 0,
            last_click_at: None,
            cadence: Some(Cadence::start(tick_interval, started_at)),
        }
    }

    pub fn total(&self) -> usize {
        self.config.regions.len()
    }

    pub fn all_found(&self) -> bool {
        self.found.len() == self.total()
    }

    pub fn is_found(&self, index: usize) -> bool {
        self.found.contains(&index)
    }

    pub fn refresh_elapsed(&mut self, now: Instant) {
        self.elapsed_seconds = now.saturating_duration_since(self.started_at).as_secs();
    }

    pub fn cancel_cadence(&mut self) {
        if let Some(mut cadence) = self.cadence.take() {
            cadence.cancel();
        }
    }
}
