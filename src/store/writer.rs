use std::sync::Arc;

use tokio::sync::watch;

use super::{RecordKey, Store, StoreError};

#[derive(Debug, Clone, Default)]
struct Pending {
    version: u64,
    value: Option<String>,
}

/// Background writer for one record.
///
/// Submissions are fire-and-forget. A single task drains them in order, so at
/// most one write per record is in flight; values submitted while a write is
/// running collapse into the newest one. Failures are logged and the next
/// submission simply overwrites again.
#[derive(Debug)]
pub struct SlotWriter {
    key: RecordKey,
    tx: watch::Sender<Pending>,
    attempted: watch::Receiver<u64>,
    version: u64,
}

impl SlotWriter {
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn Store>, key: RecordKey) -> Self {
        let (tx, mut rx) = watch::channel(Pending::default());
        let (attempted_tx, attempted) = watch::channel(0u64);

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let pending = rx.borrow_and_update().clone();
                let Some(value) = pending.value else {
                    continue;
                };

                match store.set(key, &value).await {
                    Ok(()) => {
                        tracing::debug!(slot = key.as_str(), version = pending.version, "Record persisted");
                    }
                    Err(e) => {
                        tracing::error!(
                            slot = key.as_str(),
                            version = pending.version,
                            error = %e,
                            "Failed to persist record; keeping in-memory state"
                        );
                    }
                }
                let _ = attempted_tx.send(pending.version);
            }
            tracing::debug!(slot = key.as_str(), "Slot writer stopped");
        });

        Self {
            key,
            tx,
            attempted,
            version: 0,
        }
    }

    pub fn key(&self) -> RecordKey {
        self.key
    }

    pub fn submit(&mut self, value: String) {
        self.version += 1;
        let pending = Pending {
            version: self.version,
            value: Some(value),
        };
        if self.tx.send(pending).is_err() {
            tracing::error!(slot = self.key.as_str(), "Slot writer is gone; record not persisted");
        }
    }

    /// Waits until the latest submitted value has been written (or has
    /// failed to write).
    pub async fn flush(&self) -> Result<(), StoreError> {
        let target = self.version;
        let mut attempted = self.attempted.clone();
        attempted
            .wait_for(|done| *done >= target)
            .await
            .map(|_| ())
            .map_err(|_| StoreError::Closed(self.key.as_str()))
    }
}
