//! Raw key/value access to the `session_entries` table.

use sqlx::SqlitePool;

use crate::models::SessionEntry;
use crate::Result;

/// Create or replace an entry.
pub async fn upsert_entry(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO session_entries (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get an entry by key.
pub async fn get_entry(pool: &SqlitePool, key: &str) -> Result<Option<SessionEntry>> {
    let entry = sqlx::query_as::<_, SessionEntry>(
        r#"
        SELECT key, value, updated_at
        FROM session_entries
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// Delete an entry. Deleting a missing key is not an error.
pub async fn delete_entry(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM session_entries
        WHERE key = ?
        "#,
    )
    .bind(key)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete every entry.
pub async fn clear_all(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM session_entries
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_entry_crud() {
        let db = test_db().await;

        assert!(get_entry(db.pool(), "k").await.unwrap().is_none());

        upsert_entry(db.pool(), "k", "one").await.unwrap();
        let entry = get_entry(db.pool(), "k").await.unwrap().unwrap();
        assert_eq!(entry.value, "one");
        assert!(!entry.updated_at.is_empty());

        upsert_entry(db.pool(), "k", "two").await.unwrap();
        let entry = get_entry(db.pool(), "k").await.unwrap().unwrap();
        assert_eq!(entry.value, "two");

        delete_entry(db.pool(), "k").await.unwrap();
        assert!(get_entry(db.pool(), "k").await.unwrap().is_none());

        // Deleting again is fine
        delete_entry(db.pool(), "k").await.unwrap();
    }

    #[tokio::test]
    async fn test_clear_all() {
        let db = test_db().await;
        upsert_entry(db.pool(), "a", "1").await.unwrap();
        upsert_entry(db.pool(), "b", "2").await.unwrap();

        clear_all(db.pool()).await.unwrap();

        assert!(get_entry(db.pool(), "a").await.unwrap().is_none());
        assert!(get_entry(db.pool(), "b").await.unwrap().is_none());
    }
}
