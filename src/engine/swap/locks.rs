use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per domain, created on demand.
///
/// Swaps of different domains never wait on each other. Idle entries are
/// pruned whenever a new lock is taken.
#[derive(Debug, Clone, Default)]
pub struct DomainLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl DomainLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder has `domain` locked.
    pub async fn lock(&self, domain: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Held or awaited locks have clones outstanding
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(domain.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// Number of domains with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn same_domain_waits() {
        let locks = DomainLocks::new();
        let held = locks.lock("x.com").await;

        assert!(timeout(Duration::from_millis(50), locks.lock("x.com")).await.is_err());
        assert!(timeout(Duration::from_millis(50), locks.lock("y.com")).await.is_ok());

        drop(held);
        assert!(timeout(Duration::from_millis(50), locks.lock("x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = DomainLocks::new();
        drop(locks.lock("a.com").await);
        drop(locks.lock("b.com").await);
        let _c = locks.lock("c.com").await;
        assert_eq!(locks.len(), 1);
    }
}
