use crate::domain::schedule::data_transmission::DataTransmission;
use crate::domain::scheduler::scheduler_type::Algorithm;
use crate::domain::utils::id::{NodeId, TaskId};

/// Where and when a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskPlacement {
    pub task: TaskId,
    pub node: NodeId,
    pub start: u64,
    pub end: u64,
}

/// Outcome of one scheduling run.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub algorithm: Algorithm,

    /// Queue the run consumed.
    pub queue: Vec<TaskId>,

    /// In assignment order.
    pub placements: Vec<TaskPlacement>,

    /// Hop transmissions in creation order.
    pub transmissions: Vec<DataTransmission>,

    /// Maximum over all nodes of the last task end.
    pub total_time: u64,
}

impl Schedule {
    pub fn placement(&self, task: TaskId) -> Option<&TaskPlacement> {
        self.placements.iter().find(|p| p.task == task)
    }

    /// Placements on one node, sorted by start time.
    pub fn node_placements(&self, node: NodeId) -> Vec<&TaskPlacement> {
        let mut placements: Vec<&TaskPlacement> = self.placements.iter().filter(|p| p.node == node).collect();
        placements.sort_by_key(|p| p.start);
        placements
    }

    /// Hops carrying the data of the dependency `from -> to`, in route order.
    pub fn transmissions_between(&self, from: TaskId, to: TaskId) -> Vec<&DataTransmission> {
        self.transmissions.iter().filter(|t| t.source_task == from && t.dest_task == to).collect()
    }

    /// Time at which the data of `from -> to` is available on the node of `to`.
    ///
    /// `None` when no transmission was needed (both tasks on the same node).
    pub fn arrival(&self, from: TaskId, to: TaskId) -> Option<u64> {
        self.transmissions_between(from, to).iter().map(|t| t.end).max()
    }
}
