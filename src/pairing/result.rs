use std::cmp::Reverse;

use super::graph::{PairingGraph, SlotOwner};
use super::types::{Pairing, PairingResult};
use super::weighting::CostModel;

enum Assigned {
    /// Higher-ranked player first.
    Match(usize, usize),
    Bye(usize),
}

/// Collapse slot partners into player pairings. Unpartnered player slots
/// (only possible under the bye shortfall policy) become byes.
pub fn assemble(graph: &PairingGraph, mates: &[Option<usize>], model: &CostModel) -> PairingResult {
    let mut assigned = Vec::new();

    for (node, mate) in mates.iter().enumerate() {
        let SlotOwner::Player(player) = graph.owner(node) else {
            continue;
        };
        match *mate {
            None => assigned.push(Assigned::Bye(player)),
            Some(other) => match graph.owner(other) {
                SlotOwner::Bye => assigned.push(Assigned::Bye(player)),
                SlotOwner::Player(opponent) if node < other => {
                    if model.table.ranks_above(player, opponent) {
                        assigned.push(Assigned::Match(player, opponent));
                    } else {
                        assigned.push(Assigned::Match(opponent, player));
                    }
                }
                SlotOwner::Player(_) => {}
            },
        }
    }

    // Matches from the top of the standings down, then byes.
    let mut position = vec![0; model.table.len()];
    for (pos, &idx) in model.table.ascending_by_standing().iter().enumerate() {
        position[idx] = pos;
    }
    assigned.sort_by_key(|a| match *a {
        Assigned::Match(hi, lo) => (0, Reverse(position[hi]), Reverse(position[lo])),
        Assigned::Bye(p) => (1, Reverse(position[p]), Reverse(0)),
    });

    let pairings: Vec<Pairing> = assigned
        .into_iter()
        .map(|a| match a {
            Assigned::Match(hi, lo) => Pairing::Match {
                player_a: model.table.get(hi).id.clone(),
                player_b: model.table.get(lo).id.clone(),
                cost: model.pair_cost(hi, lo),
            },
            Assigned::Bye(p) => Pairing::Bye {
                player: model.table.get(p).id.clone(),
                cost: model.bye_cost(p),
            },
        })
        .collect();

    let total_cost = pairings.iter().map(Pairing::cost).sum();
    PairingResult {
        pairings,
        total_cost,
    }
}
