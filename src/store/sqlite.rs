use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{RecordKey, Store, StoreError};

/// Records kept in the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn get(&self, key: RecordKey) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key.as_str())
            .fetch_optional(&self.db)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: RecordKey, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, run_migrations};

    async fn memory_store() -> SqliteStore {
        let pool = create_pool("sqlite::memory:", 1).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let store = memory_store().await;
        assert_eq!(store.get(RecordKey::MoodEntries).await.unwrap(), None);
        store.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_set_overwrites_whole_value() {
        let store = memory_store().await;
        store.set(RecordKey::ThemePreference, "dark").await.unwrap();
        store.set(RecordKey::ThemePreference, "light").await.unwrap();
        store.set(RecordKey::UserProfile, r#"{"name":"A"}"#).await.unwrap();

        assert_eq!(
            store.get(RecordKey::ThemePreference).await.unwrap().as_deref(),
            Some("light")
        );
        assert_eq!(
            store.get(RecordKey::UserProfile).await.unwrap().as_deref(),
            Some(r#"{"name":"A"}"#)
        );
    }
}
