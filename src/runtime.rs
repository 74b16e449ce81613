use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent, MouseEventKind};

/// Everything the game loop reacts to: input, a resized terminal, or the passage of time
#[derive(Clone, Debug)]
pub enum SpotEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

/// Where input comes from; a real terminal in the binary, a channel in tests
pub trait SpotEventSource: Send + 'static {
    /// Wait at most `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread. Bare pointer motion is dropped;
/// only presses, drags and releases matter to the game and the editor.
pub struct CrosstermEventSource {
    rx: Receiver<SpotEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let Ok(raw) = event::read() else {
                break;
            };
            let Some(ev) = translate(raw) else {
                continue;
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

fn translate(raw: CtEvent) -> Option<SpotEvent> {
    match raw {
        CtEvent::Key(key) => Some(SpotEvent::Key(key)),
        CtEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => None,
        CtEvent::Mouse(mouse) => Some(SpotEvent::Mouse(mouse)),
        CtEvent::Resize(_, _) => Some(SpotEvent::Resize),
        _ => None,
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// How long the loop waits for input before it ticks
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Events pushed through a channel by a test
pub struct TestEventSource {
    rx: Receiver<SpotEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<SpotEvent>) -> Self {
        Self { rx }
    }
}

impl SpotEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SpotEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Turns an event source and a ticker into a single stream of `SpotEvent`s
pub struct Runner<E: SpotEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: SpotEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// The next input, or `Tick` once the interval passes quietly (or the source is gone)
    pub fn step(&self) -> SpotEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => SpotEvent::Tick,
        }
    }
}
