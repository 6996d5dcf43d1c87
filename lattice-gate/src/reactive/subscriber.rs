//! Identity types for the reactive graph.
//!
//! Two kinds of nodes take part in dependency tracking:
//!
//! - Sources (signals, memos, computeds) are read from. Each has a `SourceId`.
//! - Subscribers (memos, computeds, effects) read from sources while they run.
//!   Each has a `SubscriberId`.
//!
//! Memos and computeds are both: they subscribe to their inputs and act as a
//! source for whatever reads them.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a memo, computed or effect in the runtime registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Next id from a process-wide counter.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a readable source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    /// Generate a new unique source ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}
