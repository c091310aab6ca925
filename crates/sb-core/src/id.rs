use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node on a page.
///
/// Ids are millisecond timestamps at heart (that is what the exported JSON
/// has always carried), but they are handed out by an [`IdAllocator`] that
/// never returns the same value twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        NodeId(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of wall-clock milliseconds.
///
/// Native builds use [`SystemClock`]; the browser bridge supplies its own
/// clock backed by `Date.now()`.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// `std::time` clock. Not usable on `wasm32-unknown-unknown`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Timestamp-derived, strictly monotonic id source.
///
/// `next = max(now, last + 1)`: two requests in the same millisecond get
/// consecutive values instead of colliding.
#[derive(Debug, Default, Clone)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate one raw id.
    pub fn next(&mut self, now_ms: u64) -> u64 {
        self.next_block(now_ms, 1)
    }

    /// Allocate `len` consecutive ids and return the first one.
    /// Scrapbooks use this so their page ids (`book + i`) stay unique too.
    pub fn next_block(&mut self, now_ms: u64, len: u64) -> u64 {
        let start = now_ms.max(self.last.saturating_add(1));
        self.last = start.saturating_add(len.max(1) - 1);
        start
    }

    pub fn next_node_id(&mut self, now_ms: u64) -> NodeId {
        NodeId(self.next(now_ms))
    }

    /// Make sure future ids are greater than an id that came from elsewhere
    /// (a loaded scrapbook, for instance).
    pub fn observe(&mut self, raw: u64) {
        self.last = self.last.max(raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_millisecond_ids_are_unique() {
        let mut ids = IdAllocator::new();
        let a = ids.next_node_id(1_700_000_000_000);
        let b = ids.next_node_id(1_700_000_000_000);
        assert_ne!(a, b);
        assert_eq!(b.get(), a.get() + 1);
    }

    #[test]
    fn clock_going_backwards_still_increases() {
        let mut ids = IdAllocator::new();
        let a = ids.next(500);
        let b = ids.next(100);
        assert!(b > a);
    }

    #[test]
    fn block_reserves_the_whole_range() {
        let mut ids = IdAllocator::new();
        let book = ids.next_block(1000, 4);
        assert_eq!(book, 1000);
        // pages are 1000..=1003, so the next id must skip past them
        assert_eq!(ids.next(1001), 1004);
    }

    #[test]
    fn observe_bumps_past_loaded_ids() {
        let mut ids = IdAllocator::new();
        ids.observe(9_000);
        assert_eq!(ids.next(10), 9_001);
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&NodeId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
