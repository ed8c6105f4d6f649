//! Game settings and tuning
//!
//! Persisted as JSON next to the binary; every field falls back to its
//! default so partial files are fine.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;
use crate::sim::player::PlayerConfig;
use crate::sim::rope::RopeConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Tuning ===
    /// Player motion
    pub player: PlayerConfig,
    /// Rope solver and grab rules
    pub rope: RopeConfig,

    // === Session ===
    pub starting_lives: u8,
    /// Run seed for reproducibility
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            rope: RopeConfig::default(),
            starting_lives: STARTING_LIVES,
            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("invalid settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.rope.points > 0, "rope.points must be at least 1");
        ensure!(
            self.rope.segment_length > 0.0,
            "rope.segment_length must be positive, got {}",
            self.rope.segment_length
        );
        Ok(())
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Load from `path`, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err:#}");
                Self::default()
            }
        }
    }
}
