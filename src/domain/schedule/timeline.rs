use std::collections::BTreeMap;

/// A busy interval `[start, end)` of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking<T> {
    pub start: u64,
    pub end: u64,
    pub owner: T,
}

/// Sparse occupancy of a single resource (a processor or one direction of a physical link).
///
/// Bookings are non-overlapping and keyed by their start tact, so "is this interval free" and
/// "next free slot" queries only look at the neighborhood of the requested interval.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    bookings: BTreeMap<u64, Booking<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self { bookings: BTreeMap::new() }
    }
}

impl<T: Copy> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The booking overlapping `[start, start + len)`, if any.
    ///
    /// Only the latest booking starting before the interval end can overlap, because bookings
    /// never overlap each other.
    pub fn conflict(&self, start: u64, len: u64) -> Option<&Booking<T>> {
        if len == 0 {
            return None;
        }
        let end = start + len;
        self.bookings.range(..end).next_back().map(|(_, booking)| booking).filter(|booking| booking.end > start)
    }

    pub fn is_free(&self, start: u64, len: u64) -> bool {
        self.conflict(start, len).is_none()
    }

    /// Earliest `t >= from` such that `[t, t + len)` is free.
    pub fn earliest_free(&self, from: u64, len: u64) -> u64 {
        let mut start = from;
        while let Some(booking) = self.conflict(start, len) {
            start = booking.end;
        }
        start
    }

    /// Marks `[start, start + len)` as occupied by `owner`.
    ///
    /// The caller must have checked the interval with [`Timeline::is_free`]. Empty intervals are ignored.
    pub fn book(&mut self, start: u64, len: u64, owner: T) {
        if len == 0 {
            return;
        }
        debug_assert!(self.is_free(start, len), "booking [{}, {}) overlaps an existing booking", start, start + len);
        self.bookings.insert(start, Booking { start, end: start + len, owner });
    }

    /// Owner of the booking covering tact `t`.
    pub fn occupant_at(&self, t: u64) -> Option<T> {
        self.bookings.range(..=t).next_back().map(|(_, booking)| booking).filter(|booking| booking.end > t).map(|booking| booking.owner)
    }

    /// End of the latest booking, `0` for an empty timeline.
    pub fn last_end(&self) -> u64 {
        self.bookings.values().next_back().map(|booking| booking.end).unwrap_or(0)
    }
}
