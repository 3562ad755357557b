use crate::engine::errors::StorageError;
use crate::engine::storage::KeyValueHandle;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// Typed access to JSON-encoded records of a [`KeyValueStore`](super::KeyValueStore).
#[derive(Clone)]
pub struct RecordStore {
    kv: KeyValueHandle,
}

impl Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl RecordStore {
    pub fn new(kv: KeyValueHandle) -> Self {
        Self { kv }
    }

    pub fn backend(&self) -> &KeyValueHandle {
        &self.kv
    }

    pub async fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Codec { key: key.to_string(), source })
    }

    pub async fn set_record<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)
            .map_err(|source| StorageError::Codec { key: key.to_string(), source })?;
        self.kv.set(key, &raw).await
    }

    pub async fn remove_record(&self, key: &str) -> Result<(), StorageError> {
        self.kv.remove(key).await
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.kv.keys_with_prefix(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::{InMemoryStore, KeyValueStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn typed_records_round_trip_through_backend() {
        let kv = Arc::new(InMemoryStore::new());
        let records = RecordStore::new(kv.clone());

        records.set_record("k", &vec![1u32, 2, 3]).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap().as_deref(), Some("[1,2,3]"));

        let back: Option<Vec<u32>> = records.get_record("k").await.unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));

        let missing: Option<String> = records.get_record("missing").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn corrupt_record_is_a_codec_error() {
        let kv = Arc::new(InMemoryStore::new());
        kv.set("bad", "{not json").await.unwrap();
        let records = RecordStore::new(kv);

        let err = records.get_record::<Vec<u32>>("bad").await.unwrap_err();
        assert!(matches!(err, StorageError::Codec { ref key, .. } if key == "bad"));
    }
}
