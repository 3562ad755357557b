use crate::engine::container::ContainerId;

/// Result of a best-effort batch of live cookie operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// What a completed swap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReport {
    pub domain: String,
    /// Previous owner, whose cookies were saved.
    pub from: ContainerId,
    pub to: ContainerId,
    /// Number of live cookies saved into `from`'s jar.
    pub saved: usize,
    pub cleared: BatchReport,
    pub restored: BatchReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The target already owned the domain; nothing was touched.
    AlreadyOwned,
    Swapped(SwapReport),
}
