use crate::engine::container::ContainerId;
use crate::engine::errors::StorageError;
use crate::engine::storage::{keys, RecordStore};

/// Sticky domain → container directives (`siteContainerMap/{domain}`).
///
/// Entries are only written by explicit user action and never expire.
#[derive(Debug, Clone)]
pub struct SitePolicyTable {
    records: RecordStore,
}

impl SitePolicyTable {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    pub async fn get(&self, domain: &str) -> Result<Option<ContainerId>, StorageError> {
        self.records.get_record(&keys::site_container(domain)).await
    }

    pub async fn set(&self, domain: &str, container: &ContainerId) -> Result<(), StorageError> {
        self.records.set_record(&keys::site_container(domain), container).await
    }

    pub async fn remove(&self, domain: &str) -> Result<(), StorageError> {
        self.records.remove_record(&keys::site_container(domain)).await
    }

    /// Every policy as `(domain, container)`, ordered by domain.
    pub async fn list(&self) -> Result<Vec<(String, ContainerId)>, StorageError> {
        let mut out = Vec::new();
        for key in self.records.keys_with_prefix(keys::SITE_CONTAINER_PREFIX).await? {
            if let Some(container) = self.records.get_record::<ContainerId>(&key).await? {
                out.push((key[keys::SITE_CONTAINER_PREFIX.len()..].to_string(), container));
            }
        }
        Ok(out)
    }

    /// Drops every policy pointing at `container`. Returns the affected domains.
    pub async fn remove_container(&self, container: &ContainerId) -> Result<Vec<String>, StorageError> {
        let mut removed = Vec::new();
        for (domain, target) in self.list().await? {
            if &target == container {
                self.remove(&domain).await?;
                removed.push(domain);
            }
        }
        Ok(removed)
    }
}
