//! The cookie swap engine.
//!
//! The browser has one live cookie store without a container axis. To give
//! every container its own cookies for a domain, the engine keeps exactly one
//! container's cookies materialized per domain (the domain's *owner*) and
//! parks everybody else's in the [`CookieJarStore`]. A swap moves ownership:
//!
//! 1. save the owner's live cookies into its jar,
//! 2. clear them from the live store,
//! 3. replay the incoming container's jar,
//! 4. record the new owner.
//!
//! Storage faults abort the swap. Individual cookie writes and removals are
//! best-effort and reported through [`BatchReport`].

mod locks;
mod report;

pub use locks::DomainLocks;
pub use report::{BatchReport, SwapOutcome, SwapReport};

use futures::future::join_all;
use crate::engine::container::ContainerId;
use crate::engine::cookies::{Cookie, CookieJarStore, LiveCookieHandle};
use crate::engine::errors::{CookieError, EngineError};
use crate::engine::ownership::OwnershipLedger;

#[derive(Clone)]
pub struct SwapEngine {
    live: LiveCookieHandle,
    jars: CookieJarStore,
    ledger: OwnershipLedger,
    /// Per-domain serialization. `None` accepts last-write-wins races between
    /// overlapping swaps of one domain.
    locks: Option<DomainLocks>,
}

impl std::fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapEngine")
            .field("live", &"Arc<dyn LiveCookieStore>")
            .field("serialized", &self.locks.is_some())
            .finish()
    }
}

impl SwapEngine {
    pub fn new(live: LiveCookieHandle, jars: CookieJarStore, ledger: OwnershipLedger, serialize: bool) -> Self {
        Self { live, jars, ledger, locks: serialize.then(DomainLocks::new) }
    }

    pub fn ledger(&self) -> &OwnershipLedger {
        &self.ledger
    }

    pub fn jars(&self) -> &CookieJarStore {
        &self.jars
    }

    /// Makes `target` the owner of `domain`'s live cookies.
    ///
    /// Does not touch the live store when `target` already owns the domain.
    /// On return the live cookies matching `domain` are exactly `target`'s last
    /// saved jar (minus records the store refused).
    pub async fn swap_domain(&self, domain: &str, target: &ContainerId) -> Result<SwapOutcome, EngineError> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock(domain).await),
            None => None,
        };

        let owner = self.ledger.get_owner(domain).await?;
        if &owner == target {
            log::debug!("{domain} already owned by {target}");
            return Ok(SwapOutcome::AlreadyOwned);
        }

        let live: Vec<Cookie> = self
            .live
            .get_all(domain)
            .await?
            .into_iter()
            .filter(|c| c.matches_domain(domain))
            .collect();
        self.jars.set_jar(domain, &owner, &live).await?;

        let cleared = self.clear(domain, &live).await;

        let jar = self.jars.get_jar(domain, target).await?;
        let restored = self.restore(domain, &jar).await;

        self.ledger.set_owner(domain, target).await?;

        log::info!(
            "swapped {domain}: {owner} -> {target} (saved {}, cleared {}/{}, restored {}/{})",
            live.len(),
            cleared.succeeded(),
            cleared.attempted,
            restored.succeeded(),
            restored.attempted,
        );

        Ok(SwapOutcome::Swapped(SwapReport {
            domain: domain.to_string(),
            from: owner,
            to: target.clone(),
            saved: live.len(),
            cleared,
            restored,
        }))
    }

    async fn clear(&self, domain: &str, cookies: &[Cookie]) -> BatchReport {
        let results = join_all(cookies.iter().map(|cookie| async move {
            let url = cookie.removal_url(domain)?;
            self.live.remove(&url, &cookie.name).await
        }))
        .await;
        tally(domain, "clear", cookies, results)
    }

    async fn restore(&self, domain: &str, cookies: &[Cookie]) -> BatchReport {
        let results = join_all(cookies.iter().map(|cookie| async move {
            let write = cookie.to_write()?;
            self.live.set(&write).await
        }))
        .await;
        tally(domain, "restore", cookies, results)
    }
}

fn tally(domain: &str, op: &str, cookies: &[Cookie], results: Vec<Result<(), CookieError>>) -> BatchReport {
    let mut report = BatchReport { attempted: results.len(), failed: 0 };
    for (cookie, result) in cookies.iter().zip(results) {
        if let Err(e) = result {
            report.failed += 1;
            log::warn!("{domain}: {op} of cookie {} ({}) failed: {e}", cookie.name, cookie.domain);
        }
    }
    report
}
