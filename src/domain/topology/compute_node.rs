use crate::domain::schedule::time_ledger::{DEFAULT_HORIZON, TimeLedger};
use crate::domain::topology::physical_link::PhysicalLink;
use crate::domain::topology::topology::NodeKey;
use crate::domain::utils::id::{NodeId, TaskId};

/// Entry of a node's schedule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub task: TaskId,
    pub start: u64,
    pub end: u64,
}

/// A schedulable resource of the topology.
#[derive(Debug, Clone)]
pub struct ComputeNode {
    pub id: NodeId,

    /// Undirected adjacency, in connection order.
    pub(crate) neighbors: Vec<NodeKey>,

    pub links: Vec<PhysicalLink>,

    pub ledger: TimeLedger,

    /// Tasks placed on this node, sorted by start time.
    pub scheduled: Vec<ScheduledTask>,
}

impl ComputeNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            neighbors: Vec::new(),
            links: vec![PhysicalLink::new(0)],
            ledger: TimeLedger::new(1, false, Some(DEFAULT_HORIZON)),
            scheduled: Vec::new(),
        }
    }

    /// Number of neighbors; used to order the nodes before assignment.
    pub fn priority(&self) -> usize {
        self.neighbors.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Drops all scheduling state and rebuilds links and ledger for a new run.
    pub fn reset(&mut self, link_count: usize, duplex: bool, horizon: Option<u64>) {
        self.links = (0..link_count).map(PhysicalLink::new).collect();
        self.ledger = TimeLedger::new(link_count, duplex, horizon);
        self.scheduled.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// End of the latest-ending scheduled task, `0` for an idle node.
    pub fn last_task_end(&self) -> u64 {
        self.scheduled.iter().map(|s| s.end).max().unwrap_or(0)
    }

    pub(crate) fn insert_scheduled(&mut self, entry: ScheduledTask) {
        let position = self.scheduled.partition_point(|s| s.start <= entry.start);
        self.scheduled.insert(position, entry);
    }
}
