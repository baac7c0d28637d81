// In: src/config.rs

//! The single source of truth for all svdpress compression configuration.
//!
//! `CompressionConfig` is created once at the application boundary (the CLI, a
//! JSON file, or `Default`) and passed by reference into the orchestrator. All
//! fields have serde defaults, so a partial JSON document is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SvdPressError};

/// Quality reported for lossless outputs, where no search runs.
pub const LOSSLESS_QUALITY: u8 = 100;

//==================================================================================
// I. Quality Search Settings
//==================================================================================

/// How the adaptive quality search walks the quality ladder.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// **Default:** step down one rung at a time from `start` until the encode is
    /// smaller than the original or `floor` is reached.
    #[default]
    Linear,

    /// Binary search over the same ladder. Assumes encoded size shrinks as quality
    /// drops, and needs about log2(rungs) encodes instead of up to `rungs`.
    Bisect,
}

/// Settings for the lossy-codec quality search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct QualitySearchConfig {
    /// First quality tried.
    #[serde(default = "default_start_quality")]
    pub start: u8,

    /// Amount subtracted from the quality after each unsuccessful trial.
    #[serde(default = "default_quality_step")]
    pub step: u8,

    /// Lowest quality the search will ever try.
    #[serde(default = "default_floor_quality")]
    pub floor: u8,

    #[serde(default)]
    pub strategy: SearchStrategy,
}

impl Default for QualitySearchConfig {
    fn default() -> Self {
        Self {
            start: default_start_quality(),
            step: default_quality_step(),
            floor: default_floor_quality(),
            strategy: SearchStrategy::default(),
        }
    }
}

impl QualitySearchConfig {
    /// The descending list of qualities the search may visit:
    /// `start, start - step, ...`, always ending exactly at `floor`.
    pub fn ladder(&self) -> Vec<u8> {
        let mut rungs = Vec::new();
        let mut quality = self.start;
        loop {
            rungs.push(quality);
            if quality <= self.floor {
                break;
            }
            quality = quality.saturating_sub(self.step).max(self.floor);
        }
        rungs
    }

    fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(SvdPressError::InvalidConfig(
                "quality.step must be at least 1".to_string(),
            ));
        }
        if self.floor == 0 || self.start > 100 {
            return Err(SvdPressError::InvalidConfig(format!(
                "quality bounds must lie in 1..=100 (start={}, floor={})",
                self.start, self.floor
            )));
        }
        if self.floor > self.start {
            return Err(SvdPressError::InvalidConfig(format!(
                "quality.floor ({}) exceeds quality.start ({})",
                self.floor, self.start
            )));
        }
        Ok(())
    }
}

//==================================================================================
// II. The Unified CompressionConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CompressionConfig {
    /// Fraction of total singular-value energy the recommended rank must retain.
    #[serde(default = "default_retention")]
    pub retention: f64,

    #[serde(default)]
    pub quality: QualitySearchConfig,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            retention: default_retention(),
            quality: QualitySearchConfig::default(),
        }
    }
}

impl CompressionConfig {
    /// Reads and validates a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: CompressionConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.retention > 0.0 && self.retention <= 1.0) {
            return Err(SvdPressError::InvalidConfig(format!(
                "retention must be in (0, 1], got {}",
                self.retention
            )));
        }
        self.quality.validate()
    }
}

fn default_retention() -> f64 {
    0.95
}

fn default_start_quality() -> u8 {
    85
}

fn default_quality_step() -> u8 {
    5
}

fn default_floor_quality() -> u8 {
    50
}
