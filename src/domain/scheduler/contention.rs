use crate::domain::schedule::time_ledger::{Direction, TimeLedger};
use crate::error::{Error, Result};

/// Resolved interval and link pair for one hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSlot {
    pub start: u64,
    pub source_link: usize,
    pub dest_link: usize,
}

/// Earliest start per link, the smallest one wins; lowest link number on ties.
fn best_link(ledger: &TimeLedger, direction: Direction, from: u64, len: u64) -> (usize, u64) {
    let mut best = (0, ledger.earliest_link_slot(0, direction, from, len));
    for link in 1..ledger.link_count() {
        let start = ledger.earliest_link_slot(link, direction, from, len);
        if start < best.1 {
            best = (link, start);
        }
    }
    best
}

/// Finds the earliest interval `[t, t + len)` with `t >= from` during which the source node can send
/// on one of its links and the destination node can receive on one of its links.
///
/// The source links are searched first, the destination links from the resulting start. If the
/// destination pushed the start past the point where the chosen source link is free, another free
/// source link is taken; without one the search starts over from the new time.
pub fn resolve(source: &TimeLedger, destination: &TimeLedger, from: u64, len: u64) -> Result<LinkSlot> {
    if source.link_count() == 0 || destination.link_count() == 0 {
        return Err(Error::InvalidLinkCount(0));
    }
    let mut candidate = from;

    loop {
        let (source_link, source_start) = best_link(source, Direction::Outbound, candidate, len);
        let (dest_link, start) = best_link(destination, Direction::Inbound, source_start, len);

        if source.link_free(source_link, Direction::Outbound, start, len) {
            return Ok(LinkSlot { start, source_link, dest_link });
        }

        if let Some(other) = (0..source.link_count()).find(|link| source.link_free(*link, Direction::Outbound, start, len)) {
            return Ok(LinkSlot { start, source_link: other, dest_link });
        }

        log::trace!("Source links busy at tact {}, restarting contention search.", start);
        candidate = start;
    }
}
