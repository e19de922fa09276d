use crate::domain::utils::id::TaskId;

/// Directed precedence edge between two tasks.
///
/// `weight` is the communication cost: the number of tacts a transfer of the
/// produced data occupies on one physical link hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub from: TaskId,
    pub to: TaskId,
    pub weight: u64,
}

impl Dependency {
    pub fn new(from: TaskId, to: TaskId, weight: u64) -> Self {
        Self { from, to, weight }
    }
}
