use crate::domain::schedule::time_ledger::DEFAULT_HORIZON;
use crate::domain::scheduler::scheduler_type::{Algorithm, PlacementAlgorithm, QueuePolicy};
use crate::error::{Error, Result};

/// Parameters of a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub placement: PlacementAlgorithm,
    pub queue_policy: QueuePolicy,

    /// Physical links per compute node, at least 1.
    pub link_count: usize,

    pub duplex: bool,

    /// Ledger capacity in tacts; `None` for an unbounded ledger.
    pub horizon: Option<u64>,

    /// Seed of the random placement; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            placement: PlacementAlgorithm::default(),
            queue_policy: QueuePolicy::default(),
            link_count: 1,
            duplex: false,
            horizon: Some(DEFAULT_HORIZON),
            seed: None,
        }
    }
}

impl SchedulerConfig {
    pub fn algorithm(&self) -> Algorithm {
        Algorithm::new(self.placement, self.queue_policy)
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.placement = algorithm.placement;
        self.queue_policy = algorithm.queue;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.link_count == 0 {
            return Err(Error::InvalidLinkCount(self.link_count));
        }
        Ok(())
    }
}
