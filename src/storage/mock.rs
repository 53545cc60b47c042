use super::ObjectStore;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A stored object: its bytes and declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

#[derive(Clone, Default)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    put_count: Arc<Mutex<usize>>,
    delete_count: Arc<Mutex<usize>>,
    fail_puts: Arc<Mutex<bool>>,
    fail_deletes: Arc<Mutex<bool>>,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: String, data: Vec<u8>, content_type: &str) -> Self {
        self.objects.lock().unwrap().insert(
            key,
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        self
    }

    pub fn with_put_failure(self, should_fail: bool) -> Self {
        *self.fail_puts.lock().unwrap() = should_fail;
        self
    }

    pub fn with_delete_failure(self, should_fail: bool) -> Self {
        *self.fail_deletes.lock().unwrap() = should_fail;
        self
    }

    pub fn get_put_count(&self) -> usize {
        *self.put_count.lock().unwrap()
    }

    pub fn get_delete_count(&self) -> usize {
        *self.delete_count.lock().unwrap()
    }

    pub fn get_object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn put_object(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        *self.put_count.lock().unwrap() += 1;

        if *self.fail_puts.lock().unwrap() {
            return Err(Error::Storage(format!("Mock upload failure for {}", key)));
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        *self.delete_count.lock().unwrap() += 1;

        if *self.fail_deletes.lock().unwrap() {
            return Err(Error::Storage(format!("Mock delete failure for {}", key)));
        }

        // S3 deletes are idempotent: a missing key is not an error.
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_put_and_delete() {
        let store = MockObjectStore::new();

        store
            .put_object("abc", b"\x89PNG", "image/png")
            .await
            .unwrap();

        let stored = store.get_object("abc").unwrap();
        assert_eq!(stored.data, b"\x89PNG");
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(store.get_put_count(), 1);

        store.delete_object("abc").await.unwrap();
        assert!(!store.contains("abc"));
        assert_eq!(store.get_delete_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_store_delete_missing_is_ok() {
        let store = MockObjectStore::new();
        assert!(store.delete_object("missing").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_store_put_failure() {
        let store = MockObjectStore::new().with_put_failure(true);

        let result = store.put_object("abc", b"data", "image/png").await;
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mock_store_delete_failure_keeps_object() {
        let store = MockObjectStore::new()
            .with_object("abc".to_string(), b"data".to_vec(), "image/png")
            .with_delete_failure(true);

        assert!(store.delete_object("abc").await.is_err());
        assert!(store.contains("abc"));
    }
}
