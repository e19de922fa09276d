use rand::Rng;
use rand::rngs::StdRng;

use crate::domain::scheduler::validation::ValidationStatus;
use crate::domain::task_graph::graph::{TaskGraph, TaskKey};
use crate::domain::topology::topology::{NodeKey, Topology};
use crate::error::{Error, Result};

/// Node and start time chosen for a task without predecessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourcePlacement {
    pub node: NodeKey,
    pub start: u64,
}

pub(crate) fn random_node(rng: &mut StdRng, order: &[NodeKey]) -> Result<NodeKey> {
    if order.is_empty() {
        return Err(Error::Validation(ValidationStatus::EmptyTopology));
    }
    Ok(order[rng.random_range(0..order.len())])
}

/// Random placement of a source task: the task is appended after the node's last task.
pub(crate) fn place_source_random(rng: &mut StdRng, topology: &Topology, order: &[NodeKey]) -> Result<SourcePlacement> {
    let node = random_node(rng, order)?;
    Ok(SourcePlacement { node, start: topology.get(node).last_task_end() })
}

/// Greedy placement of a source task.
///
/// While idle nodes exist the one appearing last in `order` starts the task at tact 0. Otherwise
/// the node whose last task ends first takes it (first in `order` on ties).
pub(crate) fn place_source_greedy(topology: &Topology, order: &[NodeKey]) -> Result<SourcePlacement> {
    if let Some(idle) = order.iter().rev().find(|key| topology.get(**key).is_idle()) {
        return Ok(SourcePlacement { node: *idle, start: 0 });
    }

    let mut earliest: Option<SourcePlacement> = None;
    for key in order {
        let end = topology.get(*key).last_task_end();
        if earliest.is_none_or(|current| end < current.start) {
            earliest = Some(SourcePlacement { node: *key, start: end });
        }
    }
    earliest.ok_or(Error::Validation(ValidationStatus::EmptyTopology))
}

/// Greedy target node for a dependent task: smallest estimated input arrival.
///
/// The estimate of one input is `weight * hops` from the predecessor's node to the candidate.
/// Several inputs are summed on single link nodes (they serialize on the one link) and
/// maximized otherwise. Ties go to the first candidate in `order`.
pub(crate) fn select_best_node(graph: &TaskGraph, topology: &Topology, order: &[NodeKey], task: TaskKey, link_count: usize) -> Result<NodeKey> {
    let predecessors = &graph.get(task).predecessors;
    let mut best: Option<(NodeKey, u64)> = None;

    for candidate in order {
        let mut path_times: Vec<u64> = Vec::with_capacity(predecessors.len());
        for pred in predecessors {
            let pred_task = graph.get(*pred);
            let node = pred_task.assigned_node().ok_or(Error::UnassignedPredecessor(pred_task.id))?;
            let hops = topology.shortest_path_keys(topology.key(node)?, *candidate)?.len() as u64 - 1;
            path_times.push(graph.weight(*pred, task) * hops);
        }

        let estimate = if path_times.len() > 1 && link_count == 1 {
            path_times.iter().sum()
        } else {
            path_times.iter().copied().max().unwrap_or(0)
        };

        log::trace!("Estimated arrival for task {} on node {}: {}", graph.get(task).id, topology.get(*candidate).id, estimate);

        if best.is_none_or(|(_, current)| estimate < current) {
            best = Some((*candidate, estimate));
        }
    }

    best.map(|(node, _)| node).ok_or(Error::Validation(ValidationStatus::EmptyTopology))
}
