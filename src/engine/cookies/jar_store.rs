use crate::engine::container::ContainerId;
use crate::engine::cookies::Cookie;
use crate::engine::errors::StorageError;
use crate::engine::storage::{keys, RecordStore};

/// Saved cookie snapshots, one jar per (domain, container) pair.
///
/// A jar is fully replaced on every save; there is no merging or versioning.
#[derive(Debug, Clone)]
pub struct CookieJarStore {
    records: RecordStore,
}

impl CookieJarStore {
    pub fn new(records: RecordStore) -> Self {
        Self { records }
    }

    /// Returns the saved jar, or an empty list if the pair never saved one.
    pub async fn get_jar(&self, domain: &str, container: &ContainerId) -> Result<Vec<Cookie>, StorageError> {
        Ok(self
            .records
            .get_record(&keys::cookie_jar(container, domain))
            .await?
            .unwrap_or_default())
    }

    pub async fn set_jar(&self, domain: &str, container: &ContainerId, cookies: &[Cookie]) -> Result<(), StorageError> {
        self.records.set_record(&keys::cookie_jar(container, domain), cookies).await
    }

    /// Drops every jar of `container`. Returns how many were removed.
    pub async fn remove_container(&self, container: &ContainerId) -> Result<usize, StorageError> {
        let keys = self.records.keys_with_prefix(&keys::cookie_jars_of(container)).await?;
        for key in &keys {
            self.records.remove_record(key).await?;
        }
        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::InMemoryStore;
    use std::sync::Arc;

    fn cookie(name: &str) -> Cookie {
        Cookie {
            name: name.into(),
            value: "v".into(),
            domain: "x.com".into(),
            path: "/".into(),
            host_only: true,
            secure: true,
            http_only: false,
            same_site: None,
            expiration_date: None,
        }
    }

    #[tokio::test]
    async fn jars_are_keyed_by_domain_and_container() {
        let jars = CookieJarStore::new(RecordStore::new(Arc::new(InMemoryStore::new())));
        let work = ContainerId::parse("work").unwrap();
        let personal = ContainerId::parse("personal").unwrap();

        assert!(jars.get_jar("x.com", &work).await.unwrap().is_empty());

        jars.set_jar("x.com", &work, &[cookie("a"), cookie("b")]).await.unwrap();
        jars.set_jar("x.com", &personal, &[cookie("c")]).await.unwrap();

        assert_eq!(jars.get_jar("x.com", &work).await.unwrap().len(), 2);
        assert_eq!(jars.get_jar("x.com", &personal).await.unwrap()[0].name, "c");
        assert!(jars.get_jar("y.com", &work).await.unwrap().is_empty());

        // last write wins
        jars.set_jar("x.com", &work, &[]).await.unwrap();
        assert!(jars.get_jar("x.com", &work).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_a_container_keeps_similar_ids() {
        let jars = CookieJarStore::new(RecordStore::new(Arc::new(InMemoryStore::new())));
        let work = ContainerId::parse("work").unwrap();
        let work2 = ContainerId::parse("work-2").unwrap();

        jars.set_jar("x.com", &work, &[cookie("a")]).await.unwrap();
        jars.set_jar("y.com", &work, &[cookie("a")]).await.unwrap();
        jars.set_jar("x.com", &work2, &[cookie("a")]).await.unwrap();

        assert_eq!(jars.remove_container(&work).await.unwrap(), 2);
        assert!(jars.get_jar("x.com", &work).await.unwrap().is_empty());
        assert_eq!(jars.get_jar("x.com", &work2).await.unwrap().len(), 1);
    }
}
