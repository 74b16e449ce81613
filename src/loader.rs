//! Background retrieval of game configs so the event loop never blocks on I/O.

use std::sync::mpsc::{channel, Receiver, TryRecvError};

use crate::error::{Result, SpotError};
use crate::game_config::GameConfig;
use crate::samples::ConfigSource;

pub struct ConfigLoader {
    reference: String,
    rx: Option<Receiver<Result<GameConfig>>>,
}

impl ConfigLoader {
    /// Fetch `reference` from `source` on a background thread
    pub fn spawn<S>(source: S, reference: impl Into<String>) -> Self
    where
        S: ConfigSource + Send + 'static,
    {
        let reference = reference.into();
        let (tx, rx) = channel();
        let thread_ref = reference.clone();

        std::thread::spawn(move || {
            let result = source.fetch(&thread_ref);
            let _ = tx.send(result);
        });

        Self {
            reference,
            rx: Some(rx),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn is_loading(&self) -> bool {
        self.rx.is_some()
    }

    /// Non-blocking: `None` while the fetch is still running, the result once it is done.
    pub fn poll(&mut self) -> Option<Result<GameConfig>> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.rx = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                Some(Err(SpotError::Io(std::io::Error::other(
                    "config loader thread disconnected",
                ))))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::BundledSamples;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn wait(loader: &mut ConfigLoader) -> Result<GameConfig> {
        for _ in 0..200 {
            if let Some(result) = loader.poll() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("loader never finished");
    }

    #[test]
    fn loads_bundled_sample() {
        let mut loader = ConfigLoader::spawn(BundledSamples, "kitchen");
        assert_eq!(loader.reference(), "kitchen");
        let cfg = wait(&mut loader).unwrap();
        assert_eq!(cfg.title, "Busy Kitchen");
        assert!(!loader.is_loading());
        assert!(loader.poll().is_none());
    }

    #[test]
    fn reports_fetch_failure() {
        let mut loader = ConfigLoader::spawn(BundledSamples, "nowhere");
        assert_matches!(wait(&mut loader), Err(SpotError::UnknownSample(_)));
    }

    struct Panicking;

    impl ConfigSource for Panicking {
        fn fetch(&self, _reference: &str) -> Result<GameConfig> {
            panic!("source blew up");
        }
    }

    #[test]
    fn dead_worker_surfaces_as_error() {
        let mut loader = ConfigLoader::spawn(Panicking, "x");
        assert_matches!(wait(&mut loader), Err(SpotError::Io(_)));
    }
}
