/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Lane configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! lane: left            # left | right
//! poll_interval_ms: 2   # 1..=10
//! self_test: true
//! ```
//!
//! Every key is optional.  Race timing is fixed and cannot be configured
//! here.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::{debug, info};

use crate::timeline::Millis;

/// Fastest accepted poll period.
pub const MIN_POLL_INTERVAL_MS: Millis = 1;

/// Slowest accepted poll period.  Beyond this the half-open lamp windows
/// start to visibly lag their checkpoints.
pub const MAX_POLL_INTERVAL_MS: Millis = 10;

pub const DEFAULT_POLL_INTERVAL_MS: Millis = 2;

// ── Lane ──────────────────────────────────────────────────────────────────────

/// Which lane this tower serves, as set by the lane-select switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    #[default]
    Left,
    Right,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lane::Left => f.write_str("left"),
            Lane::Right => f.write_str("right"),
        }
    }
}

// ── Private YAML deserialization types ────────────────────────────────────────

/// Fields as they appear in the YAML file; absent keys fall back to
/// [`LaneConfig::default`].
#[derive(Debug, Default, Deserialize)]
struct LaneConfigFile {
    lane: Option<Lane>,
    poll_interval_ms: Option<Millis>,
    self_test: Option<bool>,
}

// ── LaneConfig ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneConfig {
    pub lane: Lane,
    /// Host loop period.  The controller must be ticked every few ms.
    pub poll_interval_ms: Millis,
    /// Run the boot lamp self-test before polling.
    pub self_test: bool,
}

impl Default for LaneConfig {
    fn default() -> Self {
        Self {
            lane: Lane::Left,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            self_test: true,
        }
    }
}

impl LaneConfig {
    /// Parse and validate `path`.
    ///
    /// An empty file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is malformed, or
    /// a value is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading lane configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let file: LaneConfigFile = if content.trim().is_empty() {
            LaneConfigFile::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
        };
        debug!(?file, "parsed lane configuration");

        let defaults = Self::default();
        let config = Self {
            lane: file.lane.unwrap_or(defaults.lane),
            poll_interval_ms: file.poll_interval_ms.unwrap_or(defaults.poll_interval_ms),
            self_test: file.self_test.unwrap_or(defaults.self_test),
        };
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        info!(
            lane = %config.lane,
            poll_interval_ms = config.poll_interval_ms,
            self_test = config.self_test,
            "lane configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(&self.poll_interval_ms) {
            bail!(
                "poll_interval_ms = {} is outside {}..={}",
                self.poll_interval_ms,
                MIN_POLL_INTERVAL_MS,
                MAX_POLL_INTERVAL_MS
            );
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
