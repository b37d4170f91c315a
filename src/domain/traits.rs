use crate::domain::error::SchemaKoError;
use crate::domain::model::{ColumnInfo, ProgressEvent, TableInfo, TranslationEntry};
use async_trait::async_trait;
use std::time::Duration;

/// Read-only view of the database being translated.
///
/// Implementations must not cache; every call reflects the live schema.
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// List tables of a connection. Unknown connection yields `NotFound`.
    async fn get_tables(&self, connection_id: &str) -> Result<Vec<TableInfo>, SchemaKoError>;

    /// List columns of one table. Unknown table yields `NotFound`.
    async fn get_columns(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnInfo>, SchemaKoError>;
}

/// Persistence of translation entries, unique per `(connection_id, table_name)`.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    async fn find_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Vec<TranslationEntry>, SchemaKoError>;

    async fn find_one(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Option<TranslationEntry>, SchemaKoError>;

    /// Insert or update in place. Returns the stored row.
    async fn upsert(&self, entry: &TranslationEntry) -> Result<TranslationEntry, SchemaKoError>;

    async fn delete(&self, connection_id: &str, table_name: &str) -> Result<bool, SchemaKoError>;

    async fn delete_by_connection(&self, connection_id: &str) -> Result<usize, SchemaKoError>;

    async fn count(&self) -> Result<usize, SchemaKoError>;
}

/// Chat-style translation service. Best effort: may fail, may answer with partial garbage.
#[async_trait]
pub trait AiTranslationClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, SchemaKoError>;
}

/// Observer for batch progress. Never required for correctness.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}
