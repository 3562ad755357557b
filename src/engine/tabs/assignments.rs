use crate::engine::container::ContainerId;
use crate::engine::errors::StorageError;
use crate::engine::storage::{keys, RecordStore};
use crate::engine::tabs::TabId;

/// Tab → container table (`tabContainerMap/{tabId}`).
///
/// A tab without an entry belongs to the default container; this is also what
/// tabs restored from a previous session end up with.
#[derive(Debug, Clone)]
pub struct TabAssignments {
    records: RecordStore,
}

impl TabAssignments {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    pub async fn get(&self, tab: TabId) -> Result<ContainerId, StorageError> {
        Ok(self
            .records
            .get_record(&keys::tab_container(tab))
            .await?
            .unwrap_or_default())
    }

    pub async fn assign(&self, tab: TabId, container: &ContainerId) -> Result<(), StorageError> {
        self.records.set_record(&keys::tab_container(tab), container).await
    }

    pub async fn remove(&self, tab: TabId) -> Result<(), StorageError> {
        self.records.remove_record(&keys::tab_container(tab)).await
    }

    /// Copies `opener`'s assignment to `tab`. Returns the inherited container,
    /// or `None` when the opener is untracked (the child then stays default too).
    pub async fn inherit(&self, tab: TabId, opener: TabId) -> Result<Option<ContainerId>, StorageError> {
        let parent: Option<ContainerId> = self.records.get_record(&keys::tab_container(opener)).await?;
        match parent {
            Some(container) if !container.is_default() => {
                self.assign(tab, &container).await?;
                Ok(Some(container))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::InMemoryStore;
    use std::sync::Arc;

    fn table() -> TabAssignments {
        TabAssignments::new(RecordStore::new(Arc::new(InMemoryStore::new())))
    }

    #[tokio::test]
    async fn untracked_tab_is_default() {
        let t = table();
        assert!(t.get(TabId(7)).await.unwrap().is_default());
    }

    #[tokio::test]
    async fn assign_and_remove() {
        let t = table();
        let work = ContainerId::parse("work").unwrap();
        t.assign(TabId(1), &work).await.unwrap();
        assert_eq!(t.get(TabId(1)).await.unwrap(), work);

        t.remove(TabId(1)).await.unwrap();
        assert!(t.get(TabId(1)).await.unwrap().is_default());
    }

    #[tokio::test]
    async fn children_inherit_the_opener_container() {
        let t = table();
        let work = ContainerId::parse("work").unwrap();
        t.assign(TabId(1), &work).await.unwrap();

        assert_eq!(t.inherit(TabId(2), TabId(1)).await.unwrap(), Some(work.clone()));
        assert_eq!(t.get(TabId(2)).await.unwrap(), work);

        // untracked opener: nothing written
        assert_eq!(t.inherit(TabId(3), TabId(99)).await.unwrap(), None);
        assert!(t.get(TabId(3)).await.unwrap().is_default());
    }
}
