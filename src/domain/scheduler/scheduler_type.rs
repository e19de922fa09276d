use std::fmt;
use std::str::FromStr;

use crate::error::ConversionError;

/// How a compute node is chosen for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacementAlgorithm {
    /// Uniformly random node for every task.
    Random,
    /// **Greedy**: front-loads empty nodes with source tasks and places dependent tasks on the node
    /// with the smallest estimated input arrival time.
    #[default]
    Greedy,
}

/// Ordering strategy over all tasks, deciding assignment precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QueuePolicy {
    /// Descending by `cp_time / graph_cp_time + cp_count / graph_cp_count`.
    #[default]
    CriticalPath,
    /// Descending by successor count.
    OutDegree,
    /// Ascending by the critical path time through the ancestors.
    ReverseCriticalPath,
}

/// A placement algorithm combined with a queue policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Algorithm {
    pub placement: PlacementAlgorithm,
    pub queue: QueuePolicy,
}

impl Algorithm {
    pub fn new(placement: PlacementAlgorithm, queue: QueuePolicy) -> Self {
        Self { placement, queue }
    }

    /// All six combinations, placement major.
    pub fn all() -> Vec<Algorithm> {
        let mut algorithms = Vec::new();
        for placement in PlacementAlgorithm::ALL {
            for queue in QueuePolicy::ALL {
                algorithms.push(Algorithm::new(placement, queue));
            }
        }
        algorithms
    }

    /// e.g. `greedy-reverse-critical-path`
    pub fn label(&self) -> String {
        format!("{}-{}", self.placement, self.queue)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl PlacementAlgorithm {
    pub const ALL: [PlacementAlgorithm; 2] = [PlacementAlgorithm::Random, PlacementAlgorithm::Greedy];
}

impl QueuePolicy {
    pub const ALL: [QueuePolicy; 3] = [QueuePolicy::CriticalPath, QueuePolicy::OutDegree, QueuePolicy::ReverseCriticalPath];
}

impl fmt::Display for PlacementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementAlgorithm::Random => write!(f, "random"),
            PlacementAlgorithm::Greedy => write!(f, "greedy"),
        }
    }
}

impl fmt::Display for QueuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueuePolicy::CriticalPath => write!(f, "critical-path"),
            QueuePolicy::OutDegree => write!(f, "out-degree"),
            QueuePolicy::ReverseCriticalPath => write!(f, "reverse-critical-path"),
        }
    }
}

impl FromStr for PlacementAlgorithm {
    type Err = ConversionError;

    // Numeric codes are the historic algorithm numbers still found in older scenario files.
    fn from_str(placement: &str) -> Result<PlacementAlgorithm, Self::Err> {
        match placement.trim().to_ascii_lowercase().as_str() {
            "random" | "1" => Ok(PlacementAlgorithm::Random),
            "greedy" | "5" => Ok(PlacementAlgorithm::Greedy),
            _ => Err(ConversionError::UnknownPlacement(placement.to_string())),
        }
    }
}

impl FromStr for QueuePolicy {
    type Err = ConversionError;

    fn from_str(policy: &str) -> Result<QueuePolicy, Self::Err> {
        match policy.trim().to_ascii_lowercase().as_str() {
            "critical-path" | "1" => Ok(QueuePolicy::CriticalPath),
            "out-degree" | "12" => Ok(QueuePolicy::OutDegree),
            "reverse-critical-path" | "16" => Ok(QueuePolicy::ReverseCriticalPath),
            _ => Err(ConversionError::UnknownQueuePolicy(policy.to_string())),
        }
    }
}
