//! Manual overrides, deletion and export/import of translations.
//!
//! Every write here marks the entry as human-made (`is_ai_generated = false`) and
//! invalidates the connection's cache entry before returning.

use crate::application::translate::TranslationService;
use crate::domain::error::SchemaKoError;
use crate::domain::model::{ExportSnapshot, ImportResult, TranslationEntry};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

impl TranslationService {
    /// Set a table's Korean name, and optionally its description and some column labels.
    /// Creates the entry when none exists yet.
    pub async fn update_translation(
        &self,
        connection_id: &str,
        table_name: &str,
        korean_name: String,
        korean_description: Option<String>,
        column_translations: Option<BTreeMap<String, String>>,
    ) -> Result<TranslationEntry, SchemaKoError> {
        let mut entry = self
            .store
            .find_one(connection_id, table_name)
            .await?
            .unwrap_or_else(|| TranslationEntry::new(connection_id, table_name, String::new()));

        entry.korean_name = korean_name;
        if korean_description.is_some() {
            entry.korean_description = korean_description;
        }
        if let Some(columns) = column_translations {
            entry.merge_columns(columns);
        }
        entry.is_ai_generated = false;

        self.write(entry).await
    }

    pub async fn update_column_translation(
        &self,
        connection_id: &str,
        table_name: &str,
        column_name: &str,
        korean_name: String,
    ) -> Result<TranslationEntry, SchemaKoError> {
        let mut columns = BTreeMap::new();
        columns.insert(column_name.to_string(), korean_name);
        self.update_multiple_column_translations(connection_id, table_name, columns)
            .await
    }

    /// Merge column labels into an existing entry. Unknown entry yields `NotFound`.
    pub async fn update_multiple_column_translations(
        &self,
        connection_id: &str,
        table_name: &str,
        columns: BTreeMap<String, String>,
    ) -> Result<TranslationEntry, SchemaKoError> {
        let mut entry = self
            .store
            .find_one(connection_id, table_name)
            .await?
            .ok_or_else(|| {
                SchemaKoError::NotFound(format!(
                    "translation for table '{}' in connection '{}'",
                    table_name, connection_id
                ))
            })?;

        entry.merge_columns(columns);
        entry.is_ai_generated = false;

        self.write(entry).await
    }

    pub async fn delete_translation(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<bool, SchemaKoError> {
        let deleted = self.store.delete(connection_id, table_name).await;
        self.cache.invalidate(Some(connection_id));
        deleted
    }

    pub async fn delete_all_translations(&self, connection_id: &str) -> Result<usize, SchemaKoError> {
        let deleted = self.store.delete_by_connection(connection_id).await;
        self.cache.invalidate(Some(connection_id));
        deleted
    }

    /// Full snapshot straight from the store.
    pub async fn export_translations(
        &self,
        connection_id: &str,
    ) -> Result<ExportSnapshot, SchemaKoError> {
        let translations = self.store.find_by_connection(connection_id).await?;
        Ok(ExportSnapshot {
            connection_id: connection_id.to_string(),
            exported_at: Utc::now(),
            translations,
        })
    }

    /// Upsert by table name. Column maps are merged with incoming labels winning.
    pub async fn import_translations(
        &self,
        connection_id: &str,
        entries: Vec<TranslationEntry>,
    ) -> Result<ImportResult, SchemaKoError> {
        let outcome = self.import_entries(connection_id, entries).await;
        self.cache.invalidate(Some(connection_id));
        let result = outcome?;
        info!(connection_id, imported = result.imported, updated = result.updated, "translations imported");
        Ok(result)
    }

    async fn import_entries(
        &self,
        connection_id: &str,
        entries: Vec<TranslationEntry>,
    ) -> Result<ImportResult, SchemaKoError> {
        let mut result = ImportResult::default();

        for incoming in entries {
            let existing = self.store.find_one(connection_id, &incoming.table_name).await?;
            let mut entry = match existing {
                Some(mut entry) => {
                    entry.korean_name = incoming.korean_name;
                    if incoming.korean_description.is_some() {
                        entry.korean_description = incoming.korean_description;
                    }
                    entry.merge_columns(incoming.column_translations);
                    result.updated += 1;
                    entry
                }
                None => {
                    let mut entry = TranslationEntry::new(
                        connection_id,
                        &incoming.table_name,
                        incoming.korean_name,
                    );
                    entry.korean_description = incoming.korean_description;
                    entry.column_translations = incoming.column_translations;
                    result.imported += 1;
                    entry
                }
            };

            entry.is_ai_generated = false;
            self.store.upsert(&entry).await?;
        }

        Ok(result)
    }

    async fn write(&self, entry: TranslationEntry) -> Result<TranslationEntry, SchemaKoError> {
        let saved = self.store.upsert(&entry).await;
        self.cache.invalidate(Some(entry.connection_id.as_str()));
        saved
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload {
    Snapshot(ExportSnapshot),
    Entries(Vec<TranslationEntry>),
}

/// Accepts either an export snapshot or a bare array of entries.
pub fn parse_import_payload(json: &str) -> Result<Vec<TranslationEntry>, SchemaKoError> {
    Ok(match serde_json::from_str::<ImportPayload>(json)? {
        ImportPayload::Snapshot(snapshot) => snapshot.translations,
        ImportPayload::Entries(entries) => entries,
    })
}
