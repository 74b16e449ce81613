use chrono::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::Result;

/// One finished game, as written to the results log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub date: String,
    pub title: String,
    pub differences: usize,
    pub elapsed_secs: u64,
}

impl ResultRecord {
    pub fn now(title: &str, differences: usize, elapsed_secs: u64) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            title: title.to_string(),
            differences,
            elapsed_secs,
        }
    }
}

/// Append-only CSV of completed games
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::results_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, record: &ResultRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        debug!("results: logged {}s for '{}'", record.elapsed_secs, record.title);
        Ok(())
    }

    pub fn records(&self) -> Result<Vec<ResultRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<ResultRecord>, _>>()?;
        Ok(records)
    }

    /// Fastest recorded completion for a game title
    pub fn best_time(&self, title: &str) -> Result<Option<u64>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.title == title)
            .map(|r| r.elapsed_secs)
            .min())
    }
}
