pub mod blossom;
pub mod graph;
pub mod history;
pub mod matching;
pub mod result;
pub mod standings;
pub mod types;
pub mod weighting;

pub use history::HistoryLedger;
pub use standings::{Standing, StandingTable, win_percentage};
pub use types::{Pairing, PairingResult};
pub use weighting::{CostModel, calculate_bye_weight, calculate_weight};

use log::info;

use crate::config::PairingSettings;
use crate::domain::{HistoryRecord, PlayerRecord};
use crate::errors::Result;

/// Pairs one cycle: every player gets exactly `requested_matches` opponents
/// or byes, with minimum total cost over all such assignments.
///
/// Standings and history are an immutable snapshot; identical input always
/// gives identical output.
pub fn compute_pairings(
    players: &[PlayerRecord],
    history: &[HistoryRecord],
    settings: &PairingSettings,
) -> Result<PairingResult> {
    settings.validate()?;

    let table = StandingTable::from_records(players, settings.default_win_pct)?;
    let ledger = HistoryLedger::from_records(history, &table);
    let model = CostModel::new(&table, &ledger, settings);
    info!(
        "Pairing {} players requesting {} matches ({} stale history entries ignored)",
        table.len(),
        table.total_slots(),
        ledger.ignored_entries()
    );

    let graph = graph::build_graph(&model)?;
    if graph.is_empty() {
        return Ok(PairingResult::empty());
    }

    let mates = matching::solve(&graph, settings.shortfall)?;
    let result = result::assemble(&graph, &mates, &model);
    let byes = result.pairings.iter().filter(|p| p.is_bye()).count();
    info!(
        "Assigned {} matches and {} byes, total cost {:.4}",
        result.pairings.len() - byes,
        byes,
        result.total_cost
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ByePriority, ShortfallPolicy};
    use crate::errors::PairingError;

    fn player(id: &str, wins: i64, losses: i64, requested: i64) -> PlayerRecord {
        PlayerRecord::new(id, wins, losses, requested)
    }

    #[test]
    fn test_closest_standings_are_paired() {
        let players = vec![
            player("a", 4, 1, 1),
            player("b", 3, 1, 1),
            player("c", 2, 3, 1),
            player("d", 1, 9, 1),
        ];
        let result = compute_pairings(&players, &[], &PairingSettings::default()).unwrap();
        let matches: Vec<(&str, &str, f64)> = result
            .matches()
            .map(|(a, b, cost)| (a.as_str(), b.as_str(), cost))
            .collect();

        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].0, matches[0].1), ("a", "b"));
        assert_eq!((matches[1].0, matches[1].1), ("c", "d"));
        assert!((matches[0].2 - 0.05).abs() < 1e-9);
        assert!((matches[1].2 - 0.3).abs() < 1e-9);
        assert!((result.total_cost - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_single_player_gets_bye() {
        let players = vec![player("solo", 1, 1, 1)];
        let result = compute_pairings(&players, &[], &PairingSettings::default()).unwrap();

        assert_eq!(
            result.pairings,
            vec![Pairing::Bye {
                player: "solo".into(),
                cost: 0.0
            }]
        );
    }

    #[test]
    fn test_overdemand_is_rejected_by_default() {
        let players = vec![player("greedy", 1, 1, 3), player("b", 1, 1, 1)];
        let err = compute_pairings(&players, &[], &PairingSettings::default()).unwrap_err();

        assert!(matches!(err, PairingError::SolverFailure { .. }));
    }

    #[test]
    fn test_overdemand_with_bye_shortfall() {
        let settings = PairingSettings {
            shortfall: ShortfallPolicy::Bye,
            ..PairingSettings::default()
        };
        let players = vec![player("greedy", 1, 1, 3), player("b", 1, 1, 1)];
        let result = compute_pairings(&players, &[], &settings).unwrap();

        assert_eq!(result.appearances("greedy"), 3);
        assert_eq!(result.appearances("b"), 1);
        assert_eq!(result.byes().count(), 2);
    }

    #[test]
    fn test_saturated_history_still_avoids_rematch() {
        let players = vec![
            player("a", 2, 2, 1),
            player("b", 2, 2, 1),
            player("c", 2, 2, 1),
            player("d", 2, 2, 1),
        ];
        let history = vec![
            HistoryRecord::meeting("a", "b", u32::MAX),
            HistoryRecord::meeting("b", "a", 1),
        ];
        let result = compute_pairings(&players, &history, &PairingSettings::default()).unwrap();

        assert_eq!(result.total_cost, 0.0);
        for (x, y, _) in result.matches() {
            assert!(!(x == "a" && y == "b"));
        }
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = PairingSettings {
            default_win_pct: -0.1,
            ..PairingSettings::default()
        };
        let err = compute_pairings(&[player("a", 0, 0, 1)], &[], &settings).unwrap_err();

        assert!(matches!(err, PairingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_highest_standing_bye_priority() {
        let settings = PairingSettings {
            bye_priority: ByePriority::HighestStanding,
            ..PairingSettings::default()
        };
        // Equal standings, so every pairing costs the same.
        let players = vec![player("a", 1, 1, 1), player("b", 2, 2, 1), player("c", 3, 3, 1)];
        let result = compute_pairings(&players, &[], &settings).unwrap();

        assert_eq!(result.byes().map(String::as_str).collect::<Vec<_>>(), vec!["a"]);
    }
}
