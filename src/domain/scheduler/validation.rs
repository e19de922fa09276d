use std::fmt;

use crate::domain::task_graph::graph::TaskGraph;
use crate::domain::topology::topology::Topology;

/// Precondition status checked before any scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationStatus {
    Ok,
    EmptyTopology,
    DisconnectedTopology,
    EmptyTaskGraph,
    CyclicTaskGraph,
}

impl ValidationStatus {
    /// Numeric status code `0..=4`.
    pub fn code(&self) -> u8 {
        match self {
            ValidationStatus::Ok => 0,
            ValidationStatus::EmptyTopology => 1,
            ValidationStatus::DisconnectedTopology => 2,
            ValidationStatus::EmptyTaskGraph => 3,
            ValidationStatus::CyclicTaskGraph => 4,
        }
    }

    pub fn is_ok(&self) -> bool {
        *self == ValidationStatus::Ok
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationStatus::Ok => "ok",
            ValidationStatus::EmptyTopology => "topology has no compute nodes",
            ValidationStatus::DisconnectedTopology => "topology is not connected",
            ValidationStatus::EmptyTaskGraph => "task graph has no tasks",
            ValidationStatus::CyclicTaskGraph => "task graph contains cycles",
        };
        write!(f, "{} (code {})", text, self.code())
    }
}

/// Checks the topology alone.
pub fn validate_topology(topology: &Topology) -> ValidationStatus {
    if topology.is_empty() {
        return ValidationStatus::EmptyTopology;
    }
    if !topology.is_connected() {
        return ValidationStatus::DisconnectedTopology;
    }
    ValidationStatus::Ok
}

/// Checks the task graph first (emptiness, cycles), then the topology (emptiness, connectivity).
pub fn validate(graph: &TaskGraph, topology: &Topology) -> ValidationStatus {
    if graph.is_empty() {
        return ValidationStatus::EmptyTaskGraph;
    }
    if graph.has_cycles() {
        return ValidationStatus::CyclicTaskGraph;
    }
    validate_topology(topology)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_checks_come_before_topology_checks() {
        let mut graph = TaskGraph::new();
        let topology = Topology::new();
        assert_eq!(validate(&graph, &topology).code(), 3);

        let a = graph.add_task(1);
        let b = graph.add_task(1);
        graph.add_dependency(a, b, 1).unwrap();
        graph.add_dependency(b, a, 1).unwrap();
        assert_eq!(validate(&graph, &topology), ValidationStatus::CyclicTaskGraph);

        graph.remove_dependency(b, a).unwrap();
        assert_eq!(validate(&graph, &topology), ValidationStatus::EmptyTopology);
    }

    #[test]
    fn test_disconnected_topology() {
        let mut graph = TaskGraph::new();
        graph.add_task(1);
        let mut topology = Topology::new();
        topology.add_node();
        topology.add_node();

        assert_eq!(validate(&graph, &topology).code(), 2);
        assert_eq!(validate(&graph, &Topology::fully_connected(2)), ValidationStatus::Ok);
        assert_eq!(ValidationStatus::DisconnectedTopology.to_string(), "topology is not connected (code 2)");
    }
}
