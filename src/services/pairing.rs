use anyhow::Result;
use colored::Colorize;
use log::info;
use std::path::Path;

use crate::config::settings::AppConfig;
use crate::domain::{HistoryRecord, PlayerRecord};
use crate::pairing::{self, CostModel, HistoryLedger, Pairing, PairingResult, StandingTable};
use crate::snapshot::{PairingReport, SnapshotStore};

pub struct PairingService {
    config: AppConfig,
    store: SnapshotStore,
}

impl PairingService {
    pub fn new(config: AppConfig) -> Self {
        let store = SnapshotStore::new(config.snapshot.pretty);
        Self { config, store }
    }

    /// Load the snapshot, pair the cycle, print and save the result.
    pub fn run_pair(
        &self,
        standings: &Path,
        history: Option<&Path>,
        output: Option<&Path>,
    ) -> Result<PairingResult> {
        info!("=== Computing Pairings ===");
        let (players, records) = self.load_snapshot(standings, history)?;

        let result = pairing::compute_pairings(&players, &records, &self.config.pairing)?;
        self.print_pairings(&result);

        let output = output.unwrap_or_else(|| Path::new(self.config.snapshot.default_output));
        let report = PairingReport::new(result.clone(), self.config.pairing.clone());
        self.store.save_report(output, &report)?;

        info!("=== Pairing Complete ===");
        Ok(result)
    }

    /// Print the pairwise cost matrix for the snapshot.
    pub fn run_costs(&self, standings: &Path, history: Option<&Path>) -> Result<()> {
        let (players, records) = self.load_snapshot(standings, history)?;
        let settings = &self.config.pairing;
        settings.validate()?;

        let table = StandingTable::from_records(&players, settings.default_win_pct)?;
        let ledger = HistoryLedger::from_records(&records, &table);
        let model = CostModel::new(&table, &ledger, settings);
        let matrix = model.cost_matrix();

        let ids: Vec<&str> = table.iter().map(|s| s.id.as_str()).collect();
        let width = ids.iter().map(|id| id.len()).max().unwrap_or(0).max(8);

        print!("{:>width$}", "", width = width);
        for id in &ids {
            print!(" {:>width$}", id.bold(), width = width);
        }
        println!();

        for (i, row) in matrix.rows().into_iter().enumerate() {
            print!("{:>width$}", ids[i].bold(), width = width);
            for (j, cost) in row.iter().enumerate() {
                let cell = if i == j {
                    "-".to_string()
                } else {
                    format!("{:.4}", cost)
                };
                if i != j && ledger.meetings(i, j) > 0 {
                    print!(" {:>width$}", cell.red(), width = width);
                } else {
                    print!(" {:>width$}", cell, width = width);
                }
            }
            println!();
        }
        Ok(())
    }

    fn load_snapshot(
        &self,
        standings: &Path,
        history: Option<&Path>,
    ) -> Result<(Vec<PlayerRecord>, Vec<HistoryRecord>)> {
        let players = self.store.load_players(standings)?;
        let records = self.store.load_history(history)?;
        Ok((players, records))
    }

    fn print_pairings(&self, result: &PairingResult) {
        if result.is_empty() {
            println!("{}", "No pairings this cycle.".dimmed());
            return;
        }

        for pairing in &result.pairings {
            match pairing {
                Pairing::Match {
                    player_a,
                    player_b,
                    cost,
                } => {
                    let line = format!("{:>20} vs. {:<20} {:>8.4}", player_a, player_b, cost);
                    if *cost >= self.config.pairing.rematch_penalty {
                        println!("{}", line.red());
                    } else {
                        println!("{}", line);
                    }
                }
                Pairing::Bye { player, cost } => {
                    let line = format!("{:>20} receives a bye {:>12.4}", player, cost);
                    println!("{}", line.yellow());
                }
            }
        }
        println!("{} {:.4}", "Total cost:".bold(), result.total_cost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingSettings;

    #[test]
    fn test_run_pair_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let standings = dir.path().join("standings.json");
        let output = dir.path().join("out.json");
        std::fs::write(
            &standings,
            r#"[
                {"id": "a", "wins": 4, "losses": 1, "requested_matches": 1},
                {"id": "b", "wins": 3, "losses": 1, "requested_matches": 1},
                {"id": "c", "wins": 2, "losses": 3, "requested_matches": 1}
            ]"#,
        )
        .unwrap();

        let service = PairingService::new(AppConfig::with_pairing(PairingSettings::default()));
        let result = service.run_pair(&standings, None, Some(&output)).unwrap();
        let saved = SnapshotStore::new(false).load_report(&output).unwrap();

        assert_eq!(saved.result.pairings.len(), result.pairings.len());
        assert!((saved.result.total_cost - result.total_cost).abs() < 1e-12);
        assert_eq!(result.byes().map(String::as_str).collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_run_costs_rejects_invalid_standings() {
        let dir = tempfile::tempdir().unwrap();
        let standings = dir.path().join("standings.json");
        std::fs::write(
            &standings,
            r#"[{"id": "a", "wins": -1, "losses": 1, "requested_matches": 1}]"#,
        )
        .unwrap();

        let service = PairingService::new(AppConfig::new());

        assert!(service.run_costs(&standings, None).is_err());
    }
}
