use std::collections::HashMap;

use log::debug;

use crate::domain::{PlayerId, PlayerRecord};
use crate::errors::{PairingError, Result};

/// A validated player for one pairing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing {
    pub id: PlayerId,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub requested_matches: usize,
    pub win_pct: f64,
}

/// wins / (wins + losses + draws), or `default` for a player without games.
pub fn win_percentage(wins: u32, losses: u32, draws: u32, default: f64) -> f64 {
    let games = u64::from(wins) + u64::from(losses) + u64::from(draws);
    if games == 0 {
        default
    } else {
        wins as f64 / games as f64
    }
}

/// Players of the cycle in input order, addressed by dense index.
#[derive(Debug, Clone, Default)]
pub struct StandingTable {
    standings: Vec<Standing>,
    index: HashMap<PlayerId, usize>,
}

impl StandingTable {
    pub fn from_records(records: &[PlayerRecord], default_win_pct: f64) -> Result<Self> {
        let mut standings = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let standing = validate_record(record, default_win_pct)?;
            if index.insert(standing.id.clone(), standings.len()).is_some() {
                return Err(PairingError::invalid_input(format!(
                    "duplicate player id '{}'",
                    standing.id
                )));
            }
            standings.push(standing);
        }

        debug!("Validated {} players", standings.len());
        Ok(Self { standings, index })
    }

    pub fn len(&self) -> usize {
        self.standings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standings.is_empty()
    }

    pub fn get(&self, idx: usize) -> &Standing {
        &self.standings[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Standing> + '_ {
        self.standings.iter()
    }

    pub fn total_slots(&self) -> usize {
        self.standings.iter().map(|s| s.requested_matches).sum()
    }

    /// Indices sorted from the lowest-ranked player up (see `ranks_above`).
    pub fn ascending_by_standing(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.standings.len()).collect();
        order.sort_by(|&a, &b| {
            self.standings[a]
                .win_pct
                .total_cmp(&self.standings[b].win_pct)
                .then(b.cmp(&a))
        });
        order
    }

    /// True when player `a` ranks above player `b` (higher win percentage,
    /// earlier input position on ties).
    pub fn ranks_above(&self, a: usize, b: usize) -> bool {
        match self.standings[a].win_pct.total_cmp(&self.standings[b].win_pct) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => a < b,
        }
    }
}

fn validate_record(record: &PlayerRecord, default_win_pct: f64) -> Result<Standing> {
    if record.id.trim().is_empty() {
        return Err(PairingError::invalid_input("player id must not be empty"));
    }

    let wins = non_negative_count(record, "wins", record.wins)?;
    let losses = non_negative_count(record, "losses", record.losses)?;
    let draws = non_negative_count(record, "draws", record.draws)?;
    let requested_matches = non_negative_count(record, "requested_matches", record.requested_matches)?;

    Ok(Standing {
        id: record.id.clone(),
        wins,
        losses,
        draws,
        requested_matches: requested_matches as usize,
        win_pct: win_percentage(wins, losses, draws, default_win_pct),
    })
}

fn non_negative_count(record: &PlayerRecord, field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PairingError::invalid_input(format!(
            "player '{}' has {} = {}; expected a non-negative count",
            record.id, field, value
        ))
    })
}
