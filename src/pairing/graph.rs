use log::debug;

use super::blossom::WeightedEdge;
use super::weighting::CostModel;
use crate::config::ByePriority;
use crate::errors::{PairingError, Result};

/// Keeps `2 * weight` and the dual sums of the solver well inside `i64`.
const MAX_EDGE_WEIGHT: i64 = i64::MAX / 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOwner {
    Player(usize),
    Bye,
}

/// Slot-expanded graph: one node per requested match, plus a bye node when
/// the total number of slots is odd. Every pair of slots owned by different
/// players is joined by an edge carrying the pair's cost.
#[derive(Debug, Clone, Default)]
pub struct PairingGraph {
    owners: Vec<SlotOwner>,
    edges: Vec<WeightedEdge>,
    bye_node: Option<usize>,
}

impl PairingGraph {
    pub fn node_count(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn owner(&self, node: usize) -> SlotOwner {
        self.owners[node]
    }

    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    pub fn bye_node(&self) -> Option<usize> {
        self.bye_node
    }
}

pub fn build_graph(model: &CostModel) -> Result<PairingGraph> {
    let table = model.table;
    let cap = model.settings.max_requested_matches as usize;
    if let Some(standing) = table.iter().find(|s| s.requested_matches > cap) {
        return Err(PairingError::invalid_input(format!(
            "player '{}' requests {} matches; at most {} are allowed per cycle",
            standing.id, standing.requested_matches, cap
        )));
    }

    let mut owners: Vec<SlotOwner> = table
        .iter()
        .enumerate()
        .flat_map(|(idx, standing)| std::iter::repeat_n(SlotOwner::Player(idx), standing.requested_matches))
        .collect();

    if owners.is_empty() {
        debug!("No match slots requested; graph is empty");
        return Ok(PairingGraph::default());
    }

    let bye_node = if owners.len() % 2 == 1 {
        owners.push(SlotOwner::Bye);
        Some(owners.len() - 1)
    } else {
        None
    };

    let weights = EdgeWeights::new(model)?;
    let mut edges = Vec::new();
    for s in 0..owners.len() {
        for t in (s + 1)..owners.len() {
            let weight = match (owners[s], owners[t]) {
                (SlotOwner::Player(a), SlotOwner::Player(b)) if a != b => weights.pair[a * weights.n + b],
                (SlotOwner::Player(p), SlotOwner::Bye) | (SlotOwner::Bye, SlotOwner::Player(p)) => {
                    weights.bye[p]
                }
                _ => continue,
            };
            edges.push((s, t, weight));
        }
    }

    debug!(
        "Built pairing graph: {} slots, {} edges, bye node: {}",
        owners.len(),
        edges.len(),
        bye_node.is_some()
    );

    Ok(PairingGraph {
        owners,
        edges,
        bye_node,
    })
}

/// Integer edge weights per player pair and per bye candidate.
///
/// A weight is `quantized_cost * n + tiebreak`; the tiebreak (0 for real
/// pairs, the bye rank for bye edges) is below `n`, and a matching holds at
/// most one bye edge, so it only orders solutions of equal quantized cost.
struct EdgeWeights {
    n: usize,
    pair: Vec<i64>,
    bye: Vec<i64>,
}

impl EdgeWeights {
    fn new(model: &CostModel) -> Result<Self> {
        let n = model.table.len();
        let precision = model.settings.cost_precision;
        let ranks = bye_ranks(model);

        let mut pair = vec![0; n * n];
        for a in 0..n {
            for b in (a + 1)..n {
                let weight = combine(quantize(model.pair_cost(a, b), precision)?, n, 0)?;
                pair[a * n + b] = weight;
                pair[b * n + a] = weight;
            }
        }

        let bye = (0..n)
            .map(|p| combine(quantize(model.bye_cost(p), precision)?, n, ranks[p]))
            .collect::<Result<Vec<i64>>>()?;

        Ok(Self { n, pair, bye })
    }
}

fn quantize(cost: f64, precision: f64) -> Result<i64> {
    let scaled = (cost * precision).round();
    if !scaled.is_finite() || scaled < 0.0 || scaled > MAX_EDGE_WEIGHT as f64 {
        return Err(PairingError::solver_failure(format!(
            "edge cost {} cannot be represented at precision {}",
            cost, precision
        )));
    }
    Ok(scaled as i64)
}

fn combine(quantized: i64, n: usize, tiebreak: usize) -> Result<i64> {
    quantized
        .checked_mul(n as i64)
        .and_then(|w| w.checked_add(tiebreak as i64))
        .filter(|&w| w <= MAX_EDGE_WEIGHT)
        .ok_or_else(|| {
            PairingError::solver_failure(format!(
                "edge weight overflow for {} players at quantized cost {}",
                n, quantized
            ))
        })
}

/// Rank 0 is the preferred bye recipient.
fn bye_ranks(model: &CostModel) -> Vec<usize> {
    let n = model.table.len();
    let ascending = model.table.ascending_by_standing();
    let mut ranks = vec![0; n];
    for (pos, &idx) in ascending.iter().enumerate() {
        ranks[idx] = match model.settings.bye_priority {
            ByePriority::LowestStanding => pos,
            ByePriority::HighestStanding => n - 1 - pos,
            ByePriority::InputOrder => idx,
        };
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingSettings;
    use crate::domain::PlayerRecord;
    use crate::pairing::history::HistoryLedger;
    use crate::pairing::standings::StandingTable;

    fn build(records: &[PlayerRecord], settings: &PairingSettings) -> PairingGraph {
        let table = StandingTable::from_records(records, settings.default_win_pct).unwrap();
        let ledger = HistoryLedger::default();
        build_graph(&CostModel::new(&table, &ledger, settings)).unwrap()
    }

    #[test]
    fn test_slots_follow_requested_matches() {
        let records = vec![
            PlayerRecord::new("a", 1, 1, 2),
            PlayerRecord::new("b", 1, 1, 0),
            PlayerRecord::new("c", 1, 1, 2),
        ];
        let graph = build(&records, &PairingSettings::default());

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.bye_node(), None);
        assert_eq!(graph.owner(0), SlotOwner::Player(0));
        assert_eq!(graph.owner(3), SlotOwner::Player(2));
        // Only cross-player slot pairs are edges.
        assert_eq!(graph.edges().len(), 4);
    }

    #[test]
    fn test_no_edge_between_slots_of_one_player() {
        let records = vec![PlayerRecord::new("a", 1, 1, 3), PlayerRecord::new("b", 1, 1, 1)];
        let graph = build(&records, &PairingSettings::default());

        for &(s, t, _) in graph.edges() {
            assert_ne!(graph.owner(s), graph.owner(t));
        }
    }

    #[test]
    fn test_odd_total_adds_bye_node() {
        let records = vec![
            PlayerRecord::new("a", 1, 1, 1),
            PlayerRecord::new("b", 1, 1, 1),
            PlayerRecord::new("c", 1, 1, 1),
        ];
        let graph = build(&records, &PairingSettings::default());

        assert_eq!(graph.bye_node(), Some(3));
        assert_eq!(graph.owner(3), SlotOwner::Bye);
        assert_eq!(graph.edges().len(), 6);
    }

    #[test]
    fn test_zero_requests_give_empty_graph() {
        let records = vec![PlayerRecord::new("a", 1, 1, 0)];
        let graph = build(&records, &PairingSettings::default());

        assert!(graph.is_empty());
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_bye_tiebreak_prefers_lowest_standing() {
        let records = vec![
            PlayerRecord::new("top", 3, 0, 1),
            PlayerRecord::new("low", 0, 3, 1),
            PlayerRecord::new("mid", 1, 1, 1),
        ];
        let graph = build(&records, &PairingSettings::default());
        let bye_weight = |slot: usize| {
            graph
                .edges()
                .iter()
                .find(|&&(s, t, _)| s == slot && t == 3)
                .map(|&(_, _, w)| w)
                .unwrap()
        };

        assert!(bye_weight(1) < bye_weight(2));
        assert!(bye_weight(2) < bye_weight(0));
    }

    #[test]
    fn test_request_above_cap_is_rejected_before_expansion() {
        let settings = PairingSettings {
            max_requested_matches: 3,
            ..PairingSettings::default()
        };
        let records = vec![
            PlayerRecord::new("a", 1, 1, 3),
            PlayerRecord::new("b", 1, 1, i64::from(u32::MAX)),
        ];
        let table = StandingTable::from_records(&records, 0.5).unwrap();
        let ledger = HistoryLedger::default();
        let err = build_graph(&CostModel::new(&table, &ledger, &settings)).unwrap_err();

        assert!(matches!(err, PairingError::InvalidInput { .. }));
    }

    #[test]
    fn test_unrepresentable_cost_is_a_solver_failure() {
        let settings = PairingSettings {
            rematch_penalty: 1e300,
            ..PairingSettings::default()
        };
        let records = vec![PlayerRecord::new("a", 1, 1, 1), PlayerRecord::new("b", 1, 1, 1)];
        let table = StandingTable::from_records(&records, 0.5).unwrap();
        let ledger = HistoryLedger::from_records(
            &[crate::domain::HistoryRecord::meeting("a", "b", 1)],
            &table,
        );
        let err = build_graph(&CostModel::new(&table, &ledger, &settings)).unwrap_err();

        assert!(matches!(err, PairingError::SolverFailure { .. }));
    }
}
