use std::time::Instant;

use log::{debug, info, warn};

use crate::error::{Result, SpotError};
use crate::game_config::GameConfig;
use crate::region::{Point, RenderedBox};
use crate::session::{SessionConfig, SessionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Complete,
}

/// Events for the presentation layer; the game never renders anything itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    RegionFound(usize),
    Miss,
    AllFound { elapsed_seconds: u64 },
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Not playing, already complete, outside the image or debounced
    Ignored,
    Found(Vec<usize>),
    Miss,
}

/// The player-facing state machine: idle, loading, playing, complete
#[derive(Debug)]
pub struct Game {
    phase: Phase,
    session: Option<SessionState>,
    settings: SessionConfig,
    feedback: Vec<Feedback>,
    last_error: Option<String>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Game {
    pub fn new(settings: SessionConfig) -> Self {
        Self {
            phase: Phase::Idle,
            session: None,
            settings,
            feedback: Vec::new(),
            last_error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn config(&self) -> Option<&GameConfig> {
        self.session.as_ref().map(|s| &s.config)
    }

    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn found_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.found.len())
    }

    pub fn total(&self) -> usize {
        self.session.as_ref().map_or(0, SessionState::total)
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.elapsed_seconds)
    }

    pub fn is_found(&self, index: usize) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_found(index))
    }

    /// Whether the elapsed-time cadence is still scheduled
    pub fn cadence_active(&self) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.cadence.as_ref())
            .is_some_and(|c| !c.is_cancelled())
    }

    /// Drain the queued feedback events, oldest first
    pub fn take_feedback(&mut self) -> Vec<Feedback> {
        std::mem::take(&mut self.feedback)
    }

    pub fn begin_loading(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        debug!("game: idle -> loading");
        self.phase = Phase::Loading;
        self.last_error = None;
        true
    }

    pub fn finish_loading(&mut self, result: Result<GameConfig>) {
        self.finish_loading_at(result, Instant::now());
    }

    pub fn finish_loading_at(&mut self, result: Result<GameConfig>, now: Instant) {
        if self.phase != Phase::Loading {
            debug!("game: dropping load result outside of loading phase");
            return;
        }
        let outcome = result.and_then(|config| self.start_session_at(config, now));
        if let Err(e) = outcome {
            warn!("game: failed to load config: {e}");
            self.phase = Phase::Idle;
            self.last_error = Some(e.to_string());
            self.feedback.push(Feedback::LoadFailed(e.to_string()));
        }
    }

    pub fn start_session(&mut self, config: GameConfig) -> Result<()> {
        self.start_session_at(config, Instant::now())
    }

    pub fn start_session_at(&mut self, config: GameConfig, now: Instant) -> Result<()> {
        if config.regions.is_empty() {
            return Err(SpotError::NoRegions);
        }
        if let Some(old) = self.session.as_mut() {
            old.cancel_cadence();
        }
        info!(
            "game: starting '{}' with {} differences",
            config.title,
            config.regions.len()
        );
        self.session = Some(SessionState::new(config, now, self.settings.tick_interval));
        self.phase = Phase::Playing;
        self.last_error = None;
        self.feedback.clear();
        Ok(())
    }

    /// Register a click made on a rendered image
    pub fn register_click(&mut self, pointer: Point, rendered: &RenderedBox) -> ClickOutcome {
        self.register_click_at(pointer, rendered, Instant::now())
    }

    pub fn register_click_at(
        &mut self,
        pointer: Point,
        rendered: &RenderedBox,
        now: Instant,
    ) -> ClickOutcome {
        match rendered.normalize(pointer) {
            Some(logical) => self.register_logical_click_at(logical, now),
            None => ClickOutcome::Ignored,
        }
    }

    pub fn register_logical_click(&mut self, point: Point) -> ClickOutcome {
        self.register_logical_click_at(point, Instant::now())
    }

    /// Marks every unfound region containing `point`; overlapping regions are found together.
    pub fn register_logical_click_at(&mut self, point: Point, now: Instant) -> ClickOutcome {
        if self.phase != Phase::Playing {
            return ClickOutcome::Ignored;
        }
        let debounce = self.settings.click_debounce;
        let Some(session) = self.session.as_mut() else {
            return ClickOutcome::Ignored;
        };
        if session.all_found() {
            return ClickOutcome::Ignored;
        }
        if let Some(last) = session.last_click_at {
            if now.saturating_duration_since(last) < debounce {
                return ClickOutcome::Ignored;
            }
        }
        session.last_click_at = Some(now);

        let newly_found: Vec<usize> = session
            .config
            .regions
            .iter()
            .enumerate()
            .filter(|(i, r)| !session.found.contains(i) && r.contains(point))
            .map(|(i, _)| i)
            .collect();

        if newly_found.is_empty() {
            debug!("game: miss at ({:.1}, {:.1})", point.x, point.y);
            self.feedback.push(Feedback::Miss);
            return ClickOutcome::Miss;
        }

        for &i in &newly_found {
            session.found.insert(i);
            self.feedback.push(Feedback::RegionFound(i));
        }
        debug!(
            "game: found {:?}, {}/{}",
            newly_found,
            session.found.len(),
            session.total()
        );
        if session.all_found() {
            self.complete(now);
        }
        ClickOutcome::Found(newly_found)
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Advance the elapsed-time cadence. Returns true when visible state changed.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.all_found() {
            self.complete(now);
            return true;
        }
        let due = session.cadence.as_mut().is_some_and(|c| c.poll(now));
        if due {
            session.refresh_elapsed(now);
        }
        due
    }

    fn complete(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.refresh_elapsed(now);
        session.cancel_cadence();
        self.phase = Phase::Complete;
        info!(
            "game: all {} differences in '{}' found in {}s",
            session.total(),
            session.config.title,
            session.elapsed_seconds
        );
        self.feedback.push(Feedback::AllFound {
            elapsed_seconds: session.elapsed_seconds,
        });
    }

    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_cadence();
        }
        debug!("game: {} -> idle", self.phase);
        self.session = None;
        self.phase = Phase::Idle;
        self.feedback.clear();
        self.last_error = None;
    }
}
