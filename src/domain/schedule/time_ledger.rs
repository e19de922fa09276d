use crate::domain::schedule::timeline::Timeline;
use crate::domain::utils::id::TaskId;
use crate::error::{Error, Result};

/// Default number of tacts a ledger accepts bookings for.
pub const DEFAULT_HORIZON: u64 = 5000;

/// Transfer direction of a physical link booking, seen from the owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outbound,
    Inbound,
}

/// Owner of a link booking: the dependency edge whose data is transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOwner {
    pub source_task: TaskId,
    pub dest_task: TaskId,
}

#[derive(Debug, Clone, Default)]
pub struct LinkLedger {
    pub outbound: Timeline<TransferOwner>,
    pub inbound: Timeline<TransferOwner>,
}

impl LinkLedger {
    fn direction(&self, direction: Direction) -> &Timeline<TransferOwner> {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        }
    }
}

/// State of one physical link at a single tact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkTactState {
    pub busy: bool,
    pub outbound: bool,
    pub inbound: bool,
}

impl LinkTactState {
    /// The direction tag of the tact; `None` when the link is idle or carries both directions.
    pub fn direction(&self) -> Option<Direction> {
        match (self.outbound, self.inbound) {
            (true, false) => Some(Direction::Outbound),
            (false, true) => Some(Direction::Inbound),
            _ => None,
        }
    }
}

/// Observable form of a single time unit of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TactView {
    pub processor: Option<TaskId>,
    pub links: Vec<LinkTactState>,
}

/// Per compute node resource ledger: the processor and every physical link.
///
/// With `duplex` enabled a link carries one outbound and one inbound transfer at the same time;
/// otherwise any booking makes the link busy in both directions.
/// A `horizon` of `None` makes the ledger unbounded.
#[derive(Debug, Clone)]
pub struct TimeLedger {
    processor: Timeline<TaskId>,
    links: Vec<LinkLedger>,
    duplex: bool,
    horizon: Option<u64>,
}

impl Default for TimeLedger {
    fn default() -> Self {
        Self::new(1, false, Some(DEFAULT_HORIZON))
    }
}

impl TimeLedger {
    pub fn new(link_count: usize, duplex: bool, horizon: Option<u64>) -> Self {
        Self { processor: Timeline::new(), links: vec![LinkLedger::default(); link_count], duplex, horizon }
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_duplex(&self) -> bool {
        self.duplex
    }

    pub fn horizon(&self) -> Option<u64> {
        self.horizon
    }

    fn check_horizon(&self, end: u64) -> Result<()> {
        match self.horizon {
            Some(horizon) if end > horizon => {
                log::error!("HorizonExceeded: booking ends at tact {} but the ledger holds {} tacts.", end, horizon);
                Err(Error::HorizonExceeded { horizon, requested: end })
            }
            _ => Ok(()),
        }
    }

    /// Earliest start `>= from` at which the processor is free for `len` tacts.
    pub fn earliest_processor_slot(&self, from: u64, len: u64) -> u64 {
        self.processor.earliest_free(from, len)
    }

    pub fn book_processor(&mut self, task: TaskId, start: u64, len: u64) -> Result<()> {
        self.check_horizon(start + len)?;
        self.processor.book(start, len, task);
        Ok(())
    }

    /// End of the latest task on the processor.
    pub fn last_task_end(&self) -> u64 {
        self.processor.last_end()
    }

    /// Whether `link` can carry a transfer in `direction` during `[start, start + len)`.
    pub fn link_free(&self, link: usize, direction: Direction, start: u64, len: u64) -> bool {
        let Some(ledger) = self.links.get(link) else {
            return false;
        };
        if self.duplex {
            ledger.direction(direction).is_free(start, len)
        } else {
            ledger.outbound.is_free(start, len) && ledger.inbound.is_free(start, len)
        }
    }

    /// Earliest start `>= from` at which `link` is free in `direction` for `len` tacts.
    pub fn earliest_link_slot(&self, link: usize, direction: Direction, from: u64, len: u64) -> u64 {
        let Some(ledger) = self.links.get(link) else {
            return from;
        };
        if self.duplex {
            return ledger.direction(direction).earliest_free(from, len);
        }

        let mut start = from;
        loop {
            let next = ledger.inbound.earliest_free(ledger.outbound.earliest_free(start, len), len);
            if next == start {
                return start;
            }
            start = next;
        }
    }

    pub fn book_link(&mut self, link: usize, direction: Direction, start: u64, len: u64, owner: TransferOwner) -> Result<()> {
        self.check_horizon(start + len)?;
        let link_count = self.links.len();
        let ledger = self.links.get_mut(link).ok_or(Error::InvalidLinkCount(link_count))?;
        match direction {
            Direction::Outbound => ledger.outbound.book(start, len, owner),
            Direction::Inbound => ledger.inbound.book(start, len, owner),
        }
        Ok(())
    }

    /// Snapshot of tact `t`.
    pub fn tact(&self, t: u64) -> TactView {
        let links = self
            .links
            .iter()
            .map(|ledger| {
                let outbound = ledger.outbound.occupant_at(t).is_some();
                let inbound = ledger.inbound.occupant_at(t).is_some();
                LinkTactState { busy: outbound || inbound, outbound, inbound }
            })
            .collect();

        TactView { processor: self.processor.occupant_at(t), links }
    }
}
