use crate::domain::task_graph::graph::TaskKey;
use crate::domain::utils::id::{NodeId, TaskId};

/// Placement of a task produced by a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    /// Compute node executing the task.
    pub node: NodeId,

    /// First tact of the execution.
    pub start: u64,

    /// First tact after the execution (`start + cost`).
    pub end: u64,
}

/// Longest route values of a task, see [`crate::domain::task_graph::critical_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CriticalPath {
    /// Maximum accumulated execution cost over all maximal routes.
    pub time: u64,

    /// Maximum number of tasks over all maximal routes.
    pub task_count: usize,
}

/// A unit of work in the task graph.
///
/// Adjacency is kept as key lists into the owning [`crate::domain::task_graph::graph::TaskGraph`];
/// the order of the lists is the order in which dependencies were added.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,

    /// Execution cost in tacts.
    pub cost: u64,

    pub(crate) predecessors: Vec<TaskKey>,
    pub(crate) successors: Vec<TaskKey>,

    /// Set by the assignment engine, cleared at the start of every run.
    pub assignment: Option<Assignment>,

    /// Derived by queue generation.
    pub critical_path: CriticalPath,

    /// Derived by the critical path queue policy.
    pub priority: f64,
}

impl Task {
    pub fn new(id: TaskId, cost: u64) -> Self {
        Self {
            id,
            cost,
            predecessors: Vec::new(),
            successors: Vec::new(),
            assignment: None,
            critical_path: CriticalPath::default(),
            priority: 0.0,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// A task without predecessors.
    pub fn is_source(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// A task without successors.
    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }

    pub fn out_degree(&self) -> usize {
        self.successors.len()
    }

    pub fn start_time(&self) -> Option<u64> {
        self.assignment.map(|a| a.start)
    }

    pub fn end_time(&self) -> Option<u64> {
        self.assignment.map(|a| a.end)
    }

    pub fn assigned_node(&self) -> Option<NodeId> {
        self.assignment.map(|a| a.node)
    }
}
