//! Durable key-value storage for the four session records.

use async_trait::async_trait;

pub mod memory;
pub mod sqlite;
pub mod writer;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use writer::SlotWriter;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed record {key}: {reason}")]
    Malformed { key: &'static str, reason: String },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Writer for {0} has stopped")]
    Closed(&'static str),
}

/// The independently persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    MoodEntries,
    ThemePreference,
    UserProfile,
    UserBadges,
}

impl RecordKey {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::MoodEntries => "mood_entries",
            RecordKey::ThemePreference => "theme_preference",
            RecordKey::UserProfile => "user_profile",
            RecordKey::UserBadges => "user_badges",
        }
    }
}

/// A string-valued store. Writes are full overwrites.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: RecordKey) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: RecordKey, value: &str) -> Result<(), StoreError>;

    /// Cheap reachability probe for readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
