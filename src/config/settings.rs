use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::{self, PairingError};

/// How the standing gap between two players is turned into a cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disparity {
    /// |a - b|
    Linear,
    /// (a - b)^2, punishes one large gap more than several small ones
    Squared,
}

/// Who gets the bye when several candidates are equally cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByePriority {
    LowestStanding,
    HighestStanding,
    InputOrder,
}

/// What happens to slots that no opponent can fill, e.g. one player asking
/// for more matches than everyone else combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortfallPolicy {
    Reject,
    Bye,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingSettings {
    pub rematch_penalty: f64,
    pub bye_cost: f64,
    pub repeat_bye_penalty: f64,
    pub default_win_pct: f64,
    pub disparity: Disparity,
    pub bye_priority: ByePriority,
    pub shortfall: ShortfallPolicy,
    pub cost_precision: f64,
    /// Upper bound on one player's requested matches per cycle
    pub max_requested_matches: u32,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            rematch_penalty: 10.0,
            bye_cost: 0.0,
            repeat_bye_penalty: 10.0,
            default_win_pct: 0.5,
            disparity: Disparity::Linear,
            bye_priority: ByePriority::LowestStanding,
            shortfall: ShortfallPolicy::Reject,
            cost_precision: 1e6,
            max_requested_matches: 64,
        }
    }
}

impl PairingSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: PairingSettings =
            errors::with_parse_context(toml::from_str(content), "pairing settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = errors::with_io_context(std::fs::read_to_string(path), "read", path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), PairingError> {
        ensure_non_negative("bye_cost", self.bye_cost)?;
        ensure_non_negative("repeat_bye_penalty", self.repeat_bye_penalty)?;

        if !self.rematch_penalty.is_finite() || self.rematch_penalty <= 0.0 {
            return Err(PairingError::invalid_config(format!(
                "rematch_penalty must be a positive number, got {}",
                self.rematch_penalty
            )));
        }

        if !(0.0..=1.0).contains(&self.default_win_pct) {
            return Err(PairingError::invalid_config(format!(
                "default_win_pct must lie in [0, 1], got {}",
                self.default_win_pct
            )));
        }

        if !self.cost_precision.is_finite() || self.cost_precision < 1.0 {
            return Err(PairingError::invalid_config(format!(
                "cost_precision must be at least 1, got {}",
                self.cost_precision
            )));
        }

        if self.max_requested_matches == 0 {
            return Err(PairingError::invalid_config(
                "max_requested_matches must be at least 1",
            ));
        }

        Ok(())
    }
}

fn ensure_non_negative(name: &str, value: f64) -> Result<(), PairingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PairingError::invalid_config(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )))
    }
}

pub struct SnapshotSettings {
    pub default_output: &'static str,
    pub pretty: bool,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            default_output: "pairings.json",
            pretty: true,
        }
    }
}

pub struct AppConfig {
    pub pairing: PairingSettings,
    pub snapshot: SnapshotSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            pairing: PairingSettings::default(),
            snapshot: SnapshotSettings::default(),
        }
    }

    pub fn with_pairing(pairing: PairingSettings) -> Self {
        Self {
            pairing,
            snapshot: SnapshotSettings::default(),
        }
    }
}
