use std::collections::HashMap;

use log::debug;

use super::standings::StandingTable;
use crate::domain::HistoryRecord;

/// Prior meetings and byes, restricted to players of the current cycle.
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    meetings: HashMap<(usize, usize), u32>,
    byes: HashMap<usize, u32>,
    ignored: usize,
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

impl HistoryLedger {
    /// Entries naming players that are not in `table` are stale league history
    /// and are skipped, as are entries pairing a player with themself.
    pub fn from_records(records: &[HistoryRecord], table: &StandingTable) -> Self {
        let mut ledger = HistoryLedger::default();

        for record in records {
            let Some(a) = table.index_of(&record.player_a) else {
                ledger.skip(record);
                continue;
            };

            match &record.player_b {
                None => {
                    let byes = ledger.byes.entry(a).or_insert(0);
                    *byes = byes.saturating_add(record.count);
                }
                Some(other) => match table.index_of(other) {
                    Some(b) if b != a => {
                        let met = ledger.meetings.entry(pair_key(a, b)).or_insert(0);
                        *met = met.saturating_add(record.count);
                    }
                    _ => ledger.skip(record),
                },
            }
        }

        if ledger.ignored > 0 {
            debug!("Ignored {} stale history entries", ledger.ignored);
        }
        ledger
    }

    fn skip(&mut self, record: &HistoryRecord) {
        debug!(
            "Skipping history entry {} vs {}",
            record.player_a,
            record.player_b.as_deref().unwrap_or("BYE")
        );
        self.ignored += 1;
    }

    pub fn meetings(&self, a: usize, b: usize) -> u32 {
        self.meetings.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn byes(&self, player: usize) -> u32 {
        self.byes.get(&player).copied().unwrap_or(0)
    }

    pub fn ignored_entries(&self) -> usize {
        self.ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerRecord;

    fn table() -> StandingTable {
        let records = vec![
            PlayerRecord::new("a", 1, 0, 1),
            PlayerRecord::new("b", 0, 1, 1),
            PlayerRecord::new("c", 0, 0, 1),
        ];
        StandingTable::from_records(&records, 0.5).unwrap()
    }

    #[test]
    fn test_meetings_are_unordered_and_accumulate() {
        let history = vec![
            HistoryRecord::meeting("a", "b", 1),
            HistoryRecord::meeting("b", "a", 2),
        ];
        let ledger = HistoryLedger::from_records(&history, &table());

        assert_eq!(ledger.meetings(0, 1), 3);
        assert_eq!(ledger.meetings(1, 0), 3);
        assert_eq!(ledger.meetings(0, 2), 0);
    }

    #[test]
    fn test_huge_counts_saturate_instead_of_wrapping() {
        let history = vec![
            HistoryRecord::meeting("a", "b", u32::MAX),
            HistoryRecord::meeting("b", "a", 1),
            HistoryRecord::bye("c", u32::MAX),
            HistoryRecord::bye("c", 2),
        ];
        let ledger = HistoryLedger::from_records(&history, &table());

        assert_eq!(ledger.meetings(0, 1), u32::MAX);
        assert_eq!(ledger.byes(2), u32::MAX);
    }

    #[test]
    fn test_unknown_players_are_ignored() {
        let history = vec![
            HistoryRecord::meeting("a", "zed", 1),
            HistoryRecord::bye("gone", 1),
            HistoryRecord::meeting("c", "c", 1),
        ];
        let ledger = HistoryLedger::from_records(&history, &table());

        assert_eq!(ledger.ignored_entries(), 3);
        assert_eq!(ledger.meetings(0, 2), 0);
    }

    #[test]
    fn test_byes_are_counted_per_player() {
        let history = vec![HistoryRecord::bye("c", 1), HistoryRecord::bye("c", 1)];
        let ledger = HistoryLedger::from_records(&history, &table());

        assert_eq!(ledger.byes(2), 2);
        assert_eq!(ledger.byes(0), 0);
    }
}
