use serde::{Deserialize, Serialize};

pub type PlayerId = String;

/// One row of the standings snapshot for the cycle being paired.
///
/// Counts are signed so that malformed standings reach validation instead of
/// failing deep inside deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub wins: i64,
    pub losses: i64,
    #[serde(default)]
    pub draws: i64,
    pub requested_matches: i64,
}

impl PlayerRecord {
    pub fn new(id: impl Into<PlayerId>, wins: i64, losses: i64, requested_matches: i64) -> Self {
        Self {
            id: id.into(),
            wins,
            losses,
            draws: 0,
            requested_matches,
        }
    }

    pub fn with_draws(mut self, draws: i64) -> Self {
        self.draws = draws;
        self
    }
}

/// Prior meetings between two players, or prior byes of one player when
/// `player_b` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub player_a: PlayerId,
    #[serde(default)]
    pub player_b: Option<PlayerId>,
    #[serde(default = "default_count")]
    pub count: u32,
    /// Cycles in which the meetings happened (informational)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cycles: Vec<u32>,
}

fn default_count() -> u32 {
    1
}

impl HistoryRecord {
    pub fn meeting(a: impl Into<PlayerId>, b: impl Into<PlayerId>, count: u32) -> Self {
        Self {
            player_a: a.into(),
            player_b: Some(b.into()),
            count,
            cycles: Vec::new(),
        }
    }

    pub fn bye(player: impl Into<PlayerId>, count: u32) -> Self {
        Self {
            player_a: player.into(),
            player_b: None,
            count,
            cycles: Vec::new(),
        }
    }
}
