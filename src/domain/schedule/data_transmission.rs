use crate::domain::utils::id::{NodeId, TaskId};

/// One hop of the data transfer belonging to a dependency edge.
///
/// A route over `k` topology edges produces `k` transmissions; the interval length of each equals
/// the communication weight of the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTransmission {
    pub source_task: TaskId,
    pub dest_task: TaskId,

    /// Node sending on this hop.
    pub source_node: NodeId,
    /// Node receiving on this hop.
    pub dest_node: NodeId,

    pub start: u64,
    pub end: u64,

    /// Physical link number used at `source_node`.
    pub source_link: usize,
    /// Physical link number used at `dest_node`.
    pub dest_link: usize,
}

impl DataTransmission {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &DataTransmission) -> bool {
        self.start < other.end && other.start < self.end
    }
}
