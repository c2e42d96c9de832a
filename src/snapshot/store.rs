use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::PairingSettings;
use crate::domain::{HistoryRecord, PlayerRecord};
use crate::errors;
use crate::pairing::PairingResult;

/// What the `pair` command writes: the result plus the settings it was
/// computed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingReport {
    pub generated_at: DateTime<Utc>,
    pub settings: PairingSettings,
    #[serde(flatten)]
    pub result: PairingResult,
}

impl PairingReport {
    pub fn new(result: PairingResult, settings: PairingSettings) -> Self {
        Self {
            generated_at: Utc::now(),
            settings,
            result,
        }
    }
}

/// JSON files standing in for the league's standings/history source and the
/// results sink.
pub struct SnapshotStore {
    pretty: bool,
}

impl SnapshotStore {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn load_players<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PlayerRecord>> {
        let players: Vec<PlayerRecord> = self.read_json(path.as_ref())?;
        info!("Loaded {} players from {}", players.len(), path.as_ref().display());
        Ok(players)
    }

    /// A missing history file means a league without prior cycles.
    pub fn load_history<P: AsRef<Path>>(&self, path: Option<P>) -> Result<Vec<HistoryRecord>> {
        let Some(path) = path else {
            return Ok(Vec::new());
        };
        let path = path.as_ref();
        if !path.exists() {
            info!("No history at {}, pairing without prior meetings", path.display());
            return Ok(Vec::new());
        }

        let history: Vec<HistoryRecord> = self.read_json(path)?;
        info!("Loaded {} history entries from {}", history.len(), path.display());
        Ok(history)
    }

    pub fn save_report<P: AsRef<Path>>(&self, path: P, report: &PairingReport) -> Result<()> {
        let path = path.as_ref();
        self.write_json(path, report)?;
        info!("Saved pairings to {}", path.display());
        Ok(())
    }

    pub fn load_report<P: AsRef<Path>>(&self, path: P) -> Result<PairingReport> {
        self.read_json(path.as_ref())
    }

    // --- Helper Methods ---

    fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        let json = json.with_context(|| format!("Failed to serialize JSON for {}", path.display()))?;
        errors::with_io_context(fs::write(path, json), "write", path)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, path: &Path) -> Result<T> {
        let json = errors::with_io_context(fs::read_to_string(path), "read", path)?;
        serde_json::from_str(&json).with_context(|| {
            format!(
                "Failed to parse JSON from {:?}. First 200 chars: {}",
                path,
                json.chars().take(200).collect::<String>()
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::Pairing;

    #[test]
    fn test_report_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pairings.json");
        let store = SnapshotStore::new(true);
        let result = PairingResult {
            pairings: vec![
                Pairing::Match {
                    player_a: "a".into(),
                    player_b: "b".into(),
                    cost: 0.25,
                },
                Pairing::Bye {
                    player: "c".into(),
                    cost: 0.0,
                },
            ],
            total_cost: 0.25,
        };
        let report = PairingReport::new(result, PairingSettings::default());

        store.save_report(&path, &report).unwrap();
        let loaded = store.load_report(&path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_unserializable_data_reports_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut data = std::collections::HashMap::new();
        data.insert((1u8, 2u8), 3u8);

        let err = SnapshotStore::new(false).write_json(&path, &data).unwrap_err();

        assert!(format!("{:#}", err).contains("Failed to serialize JSON"));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_history_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(false);

        let history = store.load_history(Some(dir.path().join("history.json"))).unwrap();

        assert!(history.is_empty());
    }

    #[test]
    fn test_malformed_standings_report_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standings.json");
        fs::write(&path, "[{\"id\": 1}]").unwrap();

        let err = SnapshotStore::new(false).load_players(&path).unwrap_err();

        assert!(format!("{:#}", err).contains("standings.json"));
    }
}
