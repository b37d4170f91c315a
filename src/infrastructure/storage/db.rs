use crate::domain::error::SchemaKoError;
use crate::domain::model::TranslationEntry;
use crate::domain::traits::TranslationStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension;
use std::collections::BTreeMap;
use std::path::Path;
use tokio_rusqlite::{params, Connection};

const SELECT_COLUMNS: &str = "SELECT id, connection_id, table_name, korean_name, korean_description,
        column_translations, is_ai_generated, created_at, updated_at
     FROM schema_translations";

pub async fn init_database(db_path: &Path) -> Result<Connection, SchemaKoError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    create_schema(&db).await?;
    Ok(db)
}

pub async fn init_in_memory() -> Result<Connection, SchemaKoError> {
    let db = Connection::open_in_memory().await?;
    create_schema(&db).await?;
    Ok(db)
}

async fn create_schema(db: &Connection) -> Result<(), SchemaKoError> {
    db.call(|conn| -> rusqlite::Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                connection_id TEXT NOT NULL,
                table_name TEXT NOT NULL,
                korean_name TEXT NOT NULL,
                korean_description TEXT,
                column_translations TEXT NOT NULL DEFAULT '{}',
                is_ai_generated INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(connection_id, table_name)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_translations_connection ON schema_translations(connection_id)",
            [],
        )?;

        Ok(())
    })
    .await?;

    Ok(())
}

/// SQLite-backed translation store
#[derive(Clone)]
pub struct SqliteTranslationStore {
    conn: Connection,
}

impl SqliteTranslationStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TranslationStore for SqliteTranslationStore {
    async fn find_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Vec<TranslationEntry>, SchemaKoError> {
        let connection_id = connection_id.to_string();
        let rows = self
            .conn
            .call(move |conn| -> rusqlite::Result<Vec<TranslationEntry>> {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE connection_id = ? ORDER BY table_name",
                    SELECT_COLUMNS
                ))?;
                let entries = stmt
                    .query_map(params![connection_id], row_to_entry)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(entries)
            })
            .await?;

        Ok(rows)
    }

    async fn find_one(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Option<TranslationEntry>, SchemaKoError> {
        let connection_id = connection_id.to_string();
        let table_name = table_name.to_string();
        let row = self
            .conn
            .call(move |conn| -> rusqlite::Result<Option<TranslationEntry>> {
                conn.query_row(
                    &format!("{} WHERE connection_id = ? AND table_name = ?", SELECT_COLUMNS),
                    params![connection_id, table_name],
                    row_to_entry,
                )
                .optional()
            })
            .await?;

        Ok(row)
    }

    async fn upsert(&self, entry: &TranslationEntry) -> Result<TranslationEntry, SchemaKoError> {
        let columns_json = serde_json::to_string(&entry.column_translations)?;
        let now = Utc::now().timestamp_millis();
        let created = entry.created_at.timestamp_millis();
        let e = entry.clone();

        let stored = self
            .conn
            .call(move |conn| -> rusqlite::Result<TranslationEntry> {
                // ON CONFLICT keeps the row id and created_at of an existing row
                conn.execute(
                    "INSERT INTO schema_translations
                        (connection_id, table_name, korean_name, korean_description,
                         column_translations, is_ai_generated, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                     ON CONFLICT(connection_id, table_name) DO UPDATE SET
                        korean_name = excluded.korean_name,
                        korean_description = COALESCE(excluded.korean_description, korean_description),
                        column_translations = excluded.column_translations,
                        is_ai_generated = excluded.is_ai_generated,
                        updated_at = excluded.updated_at",
                    params![
                        e.connection_id,
                        e.table_name,
                        e.korean_name,
                        e.korean_description,
                        columns_json,
                        e.is_ai_generated,
                        created,
                        now
                    ],
                )?;

                conn.query_row(
                    &format!("{} WHERE connection_id = ? AND table_name = ?", SELECT_COLUMNS),
                    params![e.connection_id, e.table_name],
                    row_to_entry,
                )
            })
            .await?;

        Ok(stored)
    }

    async fn delete(&self, connection_id: &str, table_name: &str) -> Result<bool, SchemaKoError> {
        let connection_id = connection_id.to_string();
        let table_name = table_name.to_string();
        let affected = self
            .conn
            .call(move |conn| -> rusqlite::Result<usize> {
                conn.execute(
                    "DELETE FROM schema_translations WHERE connection_id = ? AND table_name = ?",
                    params![connection_id, table_name],
                )
            })
            .await?;

        Ok(affected > 0)
    }

    async fn delete_by_connection(&self, connection_id: &str) -> Result<usize, SchemaKoError> {
        let connection_id = connection_id.to_string();
        let affected = self
            .conn
            .call(move |conn| -> rusqlite::Result<usize> {
                conn.execute(
                    "DELETE FROM schema_translations WHERE connection_id = ?",
                    params![connection_id],
                )
            })
            .await?;

        Ok(affected)
    }

    async fn count(&self) -> Result<usize, SchemaKoError> {
        let count: i64 = self
            .conn
            .call(|conn| -> rusqlite::Result<i64> {
                conn.query_row("SELECT COUNT(*) FROM schema_translations", [], |row| row.get(0))
            })
            .await?;

        Ok(count as usize)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<TranslationEntry> {
    let columns_json: String = row.get(5)?;
    let column_translations: BTreeMap<String, String> = serde_json::from_str(&columns_json)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(TranslationEntry {
        id: Some(row.get(0)?),
        connection_id: row.get(1)?,
        table_name: row.get(2)?,
        korean_name: row.get(3)?,
        korean_description: row.get(4)?,
        column_translations,
        is_ai_generated: row.get(6)?,
        created_at: millis_to_datetime(row.get(7)?),
        updated_at: millis_to_datetime(row.get(8)?),
    })
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_keeps_row_identity() {
        let store = SqliteTranslationStore::new(init_in_memory().await.unwrap());

        let mut entry = TranslationEntry::new("c1", "users", "사용자".into());
        entry.korean_description = Some("가입한 사용자".into());
        let first = store.upsert(&entry).await.unwrap();

        entry.korean_name = "회원".into();
        entry.korean_description = None;
        entry.column_translations.insert("email".into(), "이메일".into());
        let second = store.upsert(&entry).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.korean_name, "회원");
        // a missing description keeps the stored one
        assert_eq!(second.korean_description.as_deref(), Some("가입한 사용자"));
        assert_eq!(second.column_translations["email"], "이메일");
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_paths() {
        let store = SqliteTranslationStore::new(init_in_memory().await.unwrap());
        for table in ["a", "b", "c"] {
            store
                .upsert(&TranslationEntry::new("c1", table, table.to_uppercase()))
                .await
                .unwrap();
        }
        store
            .upsert(&TranslationEntry::new("c2", "a", "A".into()))
            .await
            .unwrap();

        assert!(store.delete("c1", "a").await.unwrap());
        assert!(!store.delete("c1", "a").await.unwrap());
        assert_eq!(store.delete_by_connection("c1").await.unwrap(), 2);
        assert!(store.find_by_connection("c1").await.unwrap().is_empty());
        assert!(store.find_one("c2", "a").await.unwrap().is_some());
    }
}
