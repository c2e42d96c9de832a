use ndarray::Array2;

use super::history::HistoryLedger;
use super::standings::{Standing, StandingTable};
use crate::config::{Disparity, PairingSettings};

pub fn calculate_weight(
    a: &Standing,
    b: &Standing,
    prior_meetings: u32,
    settings: &PairingSettings,
) -> f64 {
    let disparity = standing_disparity(a.win_pct, b.win_pct, settings.disparity);
    disparity + rematch_penalty(prior_meetings, settings.rematch_penalty)
}

pub fn calculate_bye_weight(prior_byes: u32, settings: &PairingSettings) -> f64 {
    settings.bye_cost + settings.repeat_bye_penalty * f64::from(prior_byes)
}

fn standing_disparity(a: f64, b: f64, disparity: Disparity) -> f64 {
    let gap = (a - b).abs();
    match disparity {
        Disparity::Linear => gap,
        Disparity::Squared => gap * gap,
    }
}

fn rematch_penalty(prior_meetings: u32, penalty: f64) -> f64 {
    penalty * f64::from(prior_meetings)
}

/// Standings, history and settings bound together so costs can be looked up
/// by player index.
pub struct CostModel<'a> {
    pub table: &'a StandingTable,
    pub ledger: &'a HistoryLedger,
    pub settings: &'a PairingSettings,
}

impl<'a> CostModel<'a> {
    pub fn new(
        table: &'a StandingTable,
        ledger: &'a HistoryLedger,
        settings: &'a PairingSettings,
    ) -> Self {
        Self {
            table,
            ledger,
            settings,
        }
    }

    pub fn pair_cost(&self, a: usize, b: usize) -> f64 {
        calculate_weight(
            self.table.get(a),
            self.table.get(b),
            self.ledger.meetings(a, b),
            self.settings,
        )
    }

    pub fn bye_cost(&self, player: usize) -> f64 {
        calculate_bye_weight(self.ledger.byes(player), self.settings)
    }

    /// Dense matrix of pair costs; the diagonal is left at zero since a
    /// player is never an opponent of themself.
    pub fn cost_matrix(&self) -> Array2<f64> {
        let n = self.table.len();
        let mut matrix = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let cost = self.pair_cost(i, j);
                matrix[[i, j]] = cost;
                matrix[[j, i]] = cost;
            }
        }
        matrix
    }
}
