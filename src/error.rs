use thiserror::Error;

use crate::domain::scheduler::validation::ValidationStatus;
use crate::domain::utils::id::{NodeId, TaskId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse scenario JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write CSV export: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to build internal domain model: {0}")]
    ConversionError(#[from] ConversionError),

    #[error("Scheduling precondition violated: {0}")]
    Validation(ValidationStatus),

    #[error("Task {0} does not exist in the task graph")]
    UnknownTask(TaskId),

    #[error("Compute node {0} does not exist in the topology")]
    UnknownNode(NodeId),

    #[error("Task {0} already exists in the task graph")]
    DuplicateTask(TaskId),

    #[error("Compute node {0} already exists in the topology")]
    DuplicateNode(NodeId),

    #[error("No dependency from task {from} to task {to}")]
    UnknownDependency { from: TaskId, to: TaskId },

    #[error("Task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("Compute node {0} cannot be connected to itself")]
    SelfConnection(NodeId),

    #[error("No route between compute node {from} and compute node {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("Time ledger horizon of {horizon} tacts exceeded: booking requires tact {requested}")]
    HorizonExceeded { horizon: u64, requested: u64 },

    #[error("Physical link count must be at least 1, got {0}")]
    InvalidLinkCount(usize),

    #[error("Queue holds {actual} entries but the task graph has {expected} tasks")]
    QueueLength { expected: usize, actual: usize },

    #[error("Task {0} appears more than once in the queue")]
    DuplicateQueueEntry(TaskId),

    #[error("None of the {0} remaining queue entries has all predecessors assigned")]
    StalledQueue(usize),

    #[error("Task {0} has not been assigned to a compute node yet")]
    UnassignedPredecessor(TaskId),
}

/// Errors raised while converting external representations (strings, DTOs) into domain types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Unknown placement algorithm: '{0}'")]
    UnknownPlacement(String),

    #[error("Unknown queue policy: '{0}'")]
    UnknownQueuePolicy(String),

    #[error("Dependency references unknown task {0}")]
    UnknownTaskReference(u32),

    #[error("Link references unknown compute node {0}")]
    UnknownNodeReference(u32),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type Result<T> = std::result::Result<T, Error>;
