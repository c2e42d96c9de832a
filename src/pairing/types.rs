use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// One line of a cycle's pairings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Pairing {
    Match {
        player_a: PlayerId,
        player_b: PlayerId,
        cost: f64,
    },
    Bye {
        player: PlayerId,
        cost: f64,
    },
}

impl Pairing {
    pub fn cost(&self) -> f64 {
        match self {
            Pairing::Match { cost, .. } | Pairing::Bye { cost, .. } => *cost,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Pairing::Bye { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PairingResult {
    pub pairings: Vec<Pairing>,
    pub total_cost: f64,
}

impl PairingResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn matches(&self) -> impl Iterator<Item = (&PlayerId, &PlayerId, f64)> + '_ {
        self.pairings.iter().filter_map(|p| match p {
            Pairing::Match {
                player_a,
                player_b,
                cost,
            } => Some((player_a, player_b, *cost)),
            Pairing::Bye { .. } => None,
        })
    }

    pub fn byes(&self) -> impl Iterator<Item = &PlayerId> + '_ {
        self.pairings.iter().filter_map(|p| match p {
            Pairing::Bye { player, .. } => Some(player),
            Pairing::Match { .. } => None,
        })
    }

    /// Number of pairings and byes the player takes part in.
    pub fn appearances(&self, id: &str) -> usize {
        self.pairings
            .iter()
            .map(|p| match p {
                Pairing::Match {
                    player_a, player_b, ..
                } => usize::from(player_a == id) + usize::from(player_b == id),
                Pairing::Bye { player, .. } => usize::from(player == id),
            })
            .sum()
    }
}
