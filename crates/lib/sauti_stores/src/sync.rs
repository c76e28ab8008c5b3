//! Latest-request-wins guard for overlapping fetches.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic fetch sequence.
///
/// Overlapping fetches on one store are not cancelled; instead each fetch
/// captures a sequence number at invocation and only reconciles if it is
/// still the latest issued when its response arrives. Stale results are
/// discarded.
#[derive(Debug, Default)]
pub(crate) struct FetchSeq(AtomicU64);

impl FetchSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, returning its sequence number.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the given fetch is still the latest issued.
    pub fn is_current(&self, seq: u64) -> bool {
        self.0.load(Ordering::SeqCst) == seq
    }
}
