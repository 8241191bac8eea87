use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RecordKey, Store, StoreError};

/// In-process store for tests and ephemeral sessions. Can be switched into a
/// failing mode to exercise persistence-error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<RecordKey, String>>,
    failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I, V>(records: I) -> Self
    where
        I: IntoIterator<Item = (RecordKey, V)>,
        V: Into<String>,
    {
        let records = records.into_iter().map(|(k, v)| (k, v.into())).collect();
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub async fn raw(&self, key: RecordKey) -> Option<String> {
        self.records.lock().await.get(&key).cloned()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store set to fail".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: RecordKey) -> Result<Option<String>, StoreError> {
        self.check()?;
        Ok(self.records.lock().await.get(&key).cloned())
    }

    async fn set(&self, key: RecordKey, value: &str) -> Result<(), StoreError> {
        self.check()?;
        self.records.lock().await.insert(key, value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
