use log::{debug, warn};

use super::blossom;
use super::graph::PairingGraph;
use crate::config::ShortfallPolicy;
use crate::errors::{PairingError, Result};

/// Partner of every slot in a minimum-cost maximum matching of `graph`.
///
/// Slots left without a partner mean the requested degrees cannot be met;
/// under `ShortfallPolicy::Reject` that is a solver failure.
pub fn solve(graph: &PairingGraph, shortfall: ShortfallPolicy) -> Result<Vec<Option<usize>>> {
    let mates = blossom::min_weight_matching(graph.node_count(), graph.edges());
    verify(graph, &mates)?;

    let unmatched: Vec<usize> = (0..graph.node_count())
        .filter(|&node| mates[node].is_none() && graph.bye_node() != Some(node))
        .collect();

    if unmatched.is_empty() {
        debug!("Found perfect matching over {} slots", graph.node_count());
        return Ok(mates);
    }

    match shortfall {
        ShortfallPolicy::Reject => Err(PairingError::solver_failure(format!(
            "{} match slots cannot be paired with a distinct opponent",
            unmatched.len()
        ))),
        ShortfallPolicy::Bye => {
            warn!(
                "{} match slots have no available opponent and receive byes",
                unmatched.len()
            );
            Ok(mates)
        }
    }
}

fn verify(graph: &PairingGraph, mates: &[Option<usize>]) -> Result<()> {
    if mates.len() != graph.node_count() {
        return Err(PairingError::solver_failure(format!(
            "matching covers {} of {} slots",
            mates.len(),
            graph.node_count()
        )));
    }

    for (node, mate) in mates.iter().enumerate() {
        let Some(other) = *mate else { continue };
        let symmetric = mates.get(other).copied().flatten() == Some(node);
        if !symmetric || graph.owner(node) == graph.owner(other) {
            return Err(PairingError::solver_failure(format!(
                "inconsistent matching between slots {} and {}",
                node, other
            )));
        }
    }
    Ok(())
}
