//! Domain ownership ledger (`domainOwnerMap/{domain}`).
//!
//! Records which container's cookies currently occupy the live cookie store
//! for a domain. A domain without a record is owned by the default container.

use crate::engine::container::ContainerId;
use crate::engine::errors::StorageError;
use crate::engine::storage::{keys, RecordStore};

#[derive(Debug, Clone)]
pub struct OwnershipLedger {
    records: RecordStore,
}

impl OwnershipLedger {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    pub async fn get_owner(&self, domain: &str) -> Result<ContainerId, StorageError> {
        Ok(self
            .records
            .get_record(&keys::domain_owner(domain))
            .await?
            .unwrap_or_default())
    }

    pub async fn set_owner(&self, domain: &str, container: &ContainerId) -> Result<(), StorageError> {
        self.records.set_record(&keys::domain_owner(domain), container).await
    }

    /// Domains currently owned by `container`.
    pub async fn domains_owned_by(&self, container: &ContainerId) -> Result<Vec<String>, StorageError> {
        let mut domains = Vec::new();
        for key in self.records.keys_with_prefix(keys::DOMAIN_OWNER_PREFIX).await? {
            if self.records.get_record::<ContainerId>(&key).await?.as_ref() == Some(container) {
                domains.push(key[keys::DOMAIN_OWNER_PREFIX.len()..].to_string());
            }
        }
        Ok(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn absent_owner_is_default() {
        let ledger = OwnershipLedger::new(RecordStore::new(Arc::new(InMemoryStore::new())));
        assert!(ledger.get_owner("example.com").await.unwrap().is_default());
    }

    #[tokio::test]
    async fn owners_are_independent_per_domain() {
        let ledger = OwnershipLedger::new(RecordStore::new(Arc::new(InMemoryStore::new())));
        let work = ContainerId::parse("work").unwrap();
        let personal = ContainerId::parse("personal").unwrap();

        ledger.set_owner("a.com", &work).await.unwrap();
        ledger.set_owner("b.com", &personal).await.unwrap();
        ledger.set_owner("c.com", &work).await.unwrap();

        assert_eq!(ledger.get_owner("a.com").await.unwrap(), work);
        assert_eq!(ledger.get_owner("b.com").await.unwrap(), personal);
        assert_eq!(ledger.domains_owned_by(&work).await.unwrap(), vec!["a.com", "c.com"]);
    }
}
