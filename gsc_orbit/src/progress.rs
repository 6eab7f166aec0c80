use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by the explorer while it runs. Readers take a
/// [`ProgressSnapshot`] from any thread without stalling the search.
#[derive(Debug, Default)]
pub struct Progress {
    visited: AtomicU64,
    discovered: AtomicU64,
    candidates: AtomicU64,
    trivial: AtomicU64,
}

/// Point-in-time copy of [`Progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Class-graph nodes popped and expanded.
    pub visited: u64,
    /// Class-graph nodes known, expanded or not.
    pub discovered: u64,
    /// Candidate states produced by operations.
    pub candidates: u64,
    /// Candidates skipped because the operation acted trivially.
    pub trivial: u64,
}

impl ProgressSnapshot {
    /// Nodes still waiting in the queue.
    #[must_use]
    pub const fn pending(&self) -> u64 {
        self.discovered.saturating_sub(self.visited)
    }
}

impl Progress {
    /// All counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&self) {
        for counter in [&self.visited, &self.discovered, &self.candidates, &self.trivial] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub(crate) fn inc_visited(&self) {
        self.visited.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_discovered(&self) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_candidates(&self, by: u64) {
        self.candidates.fetch_add(by, Ordering::Relaxed);
    }

    pub(crate) fn inc_trivial(&self) {
        self.trivial.fetch_add(1, Ordering::Relaxed);
    }

    /// Read a snapshot for display/reporting.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            visited: self.visited.load(Ordering::Relaxed),
            discovered: self.discovered.load(Ordering::Relaxed),
            candidates: self.candidates.load(Ordering::Relaxed),
            trivial: self.trivial.load(Ordering::Relaxed),
        }
    }
}
