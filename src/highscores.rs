//! High score
//!
//! A single best score persisted as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    /// Best score so far
    pub best: u64,
    /// Session time (ms) when it was set
    pub achieved_at_ms: u64,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record `score` if it is a new best. Returns true when it was.
    pub fn submit(&mut self, score: u64, now_ms: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.achieved_at_ms = now_ms;
        true
    }

    /// Load the high score; a missing file is an empty record
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No high score found, starting fresh");
            return Ok(Self::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading high score from {}", path.display()))?;
        let score: HighScore = serde_json::from_str(&json)
            .with_context(|| format!("parsing high score in {}", path.display()))?;
        log::info!("Loaded high score {}", score.best);
        Ok(score)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self).context("serializing high score")?;
        fs::write(path, json)
            .with_context(|| format!("writing high score to {}", path.display()))?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}
