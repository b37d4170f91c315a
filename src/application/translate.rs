//! Batch translation: dictionary seeding, AI enhancement with retry and fallback,
//! bounded-concurrency persistence.

use crate::application::ai_response::{
    parse_translation_lines, single_table_prompt, table_batch_prompt, SYSTEM_PROMPT,
};
use crate::application::dictionary::{translate_column_name, translate_table_name};
use crate::application::retry::{retry_with_backoff, RetryPolicy};
use crate::application::stats::RollingStats;
use crate::domain::error::SchemaKoError;
use crate::domain::model::{
    AllColumnsResult, BatchOptions, BatchResult, ColumnInfo, ProgressEvent, ProgressStatus,
    SingleTableResult, TranslationEntry, TranslationStatistics,
};
use crate::domain::traits::{
    AiTranslationClient, ProgressSink, SchemaIntrospection, TranslationStore,
};
use crate::infrastructure::storage::cache::{TranslationCache, TranslationMap};
use futures_util::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Entry point for every translation operation. Cheap to clone.
#[derive(Clone)]
pub struct TranslationService {
    pub(crate) schema: Arc<dyn SchemaIntrospection>,
    pub(crate) store: Arc<dyn TranslationStore>,
    pub(crate) ai: Option<Arc<dyn AiTranslationClient>>,
    pub(crate) cache: Arc<TranslationCache>,
    pub(crate) stats: Arc<RollingStats>,
    pub(crate) retry: RetryPolicy,
}

enum TableOutcome {
    Translated(usize),
    FellBack(usize),
    Failed,
}

impl TranslationService {
    pub fn new(
        schema: Arc<dyn SchemaIntrospection>,
        store: Arc<dyn TranslationStore>,
        cache: Arc<TranslationCache>,
    ) -> Self {
        Self {
            schema,
            store,
            ai: None,
            cache,
            stats: Arc::new(RollingStats::default()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_ai_client(mut self, ai: Option<Arc<dyn AiTranslationClient>>) -> Self {
        self.ai = ai;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn store(&self) -> &dyn TranslationStore {
        self.store.as_ref()
    }

    pub fn statistics(&self) -> TranslationStatistics {
        self.stats.snapshot()
    }

    /// Persisted translations of a connection, through the TTL cache.
    pub async fn get_translations(
        &self,
        connection_id: &str,
        force_refresh: bool,
    ) -> Result<Arc<TranslationMap>, SchemaKoError> {
        self.cache
            .get_cached(self.store.as_ref(), connection_id, force_refresh)
            .await
    }

    /// Translate every untranslated table (all tables when forced) and save the results.
    ///
    /// Table names may come from the AI in chunks of `batch_size`; columns always come
    /// from the dictionary. A failed save is counted, never raised.
    pub async fn translate_and_save(
        &self,
        connection_id: &str,
        options: &BatchOptions,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<BatchResult, SchemaKoError> {
        let started = Instant::now();
        let tables = self.schema.get_tables(connection_id).await?;
        let total_tables = tables.len();

        let existing = self.get_translations(connection_id, true).await?;
        let targets: Vec<String> = tables
            .into_iter()
            .map(|t| t.name)
            .filter(|name| options.force_retranslate || !existing.contains_key(name))
            .collect();
        let skipped = total_tables - targets.len();

        if targets.is_empty() {
            info!(connection_id, skipped, "nothing to translate");
            return Ok(BatchResult {
                translated: 0,
                skipped,
                failed: 0,
                duration: started.elapsed(),
            });
        }

        let mut ai_names: HashMap<String, String> = HashMap::new();
        if let Some(ai) = self.ai_client(options) {
            for chunk in targets.chunks(options.batch_size.max(1)) {
                match self.ai_table_names(ai, chunk, options.timeout).await {
                    Ok(parsed) => ai_names.extend(parsed),
                    Err(e) => warn!(
                        connection_id,
                        tables = chunk.len(),
                        error = %e,
                        "AI batch failed, using dictionary for this chunk"
                    ),
                }
            }
        }

        let jobs: Vec<(String, String, bool)> = targets
            .into_iter()
            .map(|table| match ai_names.remove(&table) {
                Some(korean) => (table, korean, true),
                None => {
                    let korean = translate_table_name(&table);
                    (table, korean, false)
                }
            })
            .collect();

        let total = jobs.len();
        let mut saves = stream::iter(jobs)
            .map(|(table, korean, ai_generated)| async move {
                let result = self
                    .save_with_dictionary_columns(connection_id, &table, korean, ai_generated)
                    .await;
                (table, result)
            })
            .buffer_unordered(options.max_concurrency.max(1));

        let (mut translated, mut failed, mut current) = (0, 0, 0);
        while let Some((table, result)) = saves.next().await {
            current += 1;
            let status = match result {
                Ok(()) => {
                    translated += 1;
                    ProgressStatus::Translated
                }
                Err(e) => {
                    failed += 1;
                    warn!(connection_id, table = %table, error = %e, "failed to save translation");
                    ProgressStatus::Failed
                }
            };
            if let Some(sink) = progress {
                sink.report(ProgressEvent {
                    connection_id: connection_id.to_string(),
                    current,
                    total,
                    table_name: table,
                    status,
                });
            }
        }

        self.cache.invalidate(Some(connection_id));

        if let Some(sink) = progress {
            sink.report(ProgressEvent {
                connection_id: connection_id.to_string(),
                current: total,
                total,
                table_name: String::new(),
                status: ProgressStatus::Completed,
            });
        }

        let result = BatchResult {
            translated,
            skipped,
            failed,
            duration: started.elapsed(),
        };
        info!(
            connection_id,
            translated,
            skipped,
            failed,
            duration_ms = result.duration.as_millis() as u64,
            "batch translation finished"
        );
        Ok(result)
    }

    /// One AI round trip for a table and all of its columns, dictionary on exhaustion.
    ///
    /// Any parsed term marks the entry AI-generated, even when the reply left out the table
    /// name and its label came from the dictionary.
    pub async fn translate_single_table(
        &self,
        connection_id: &str,
        table_name: &str,
        options: &BatchOptions,
    ) -> Result<SingleTableResult, SchemaKoError> {
        let started = Instant::now();
        let columns = self.schema.get_columns(connection_id, table_name).await?;

        let Some(ai) = self.ai_client(options) else {
            return self
                .dictionary_single_table(connection_id, table_name, &columns, started)
                .await;
        };

        let mut terms = Vec::with_capacity(columns.len() + 1);
        terms.push(table_name.to_string());
        terms.extend(columns.iter().map(|c| c.name.clone()));
        let prompt = single_table_prompt(table_name, &columns);
        let timeout = options.timeout;
        let (prompt_ref, terms_ref) = (&prompt, &terms);

        let reply = retry_with_backoff(&self.retry, table_name, || async move {
            let text = ai.complete(SYSTEM_PROMPT, prompt_ref, timeout).await?;
            let parsed = parse_translation_lines(&text, terms_ref);
            if parsed.is_empty() {
                return Err(SchemaKoError::Ai(
                    "reply contained no `english: korean` lines".to_string(),
                ));
            }
            Ok(parsed)
        })
        .await;

        let parsed = match reply {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(connection_id, table_name, error = %e, "AI translation exhausted, using dictionary");
                return self
                    .dictionary_single_table(connection_id, table_name, &columns, started)
                    .await;
            }
        };

        let korean_name = parsed
            .get(table_name)
            .cloned()
            .unwrap_or_else(|| translate_table_name(table_name));
        let column_translations: BTreeMap<String, String> = columns
            .iter()
            .map(|column| {
                let explicit = column.comment.as_deref().map(str::trim).filter(|c| !c.is_empty());
                let korean = match (explicit, parsed.get(&column.name)) {
                    (None, Some(ai_label)) => ai_label.clone(),
                    _ => translate_column_name(&column.name, column.comment.as_deref()),
                };
                (column.name.clone(), korean)
            })
            .collect();

        let mut entry = TranslationEntry::new(connection_id, table_name, korean_name);
        entry.column_translations = column_translations;
        entry.is_ai_generated = true;
        self.persist_single(entry, started).await
    }

    /// Pure dictionary path; the result is never marked AI-generated.
    pub async fn translate_single_table_with_dictionary(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<SingleTableResult, SchemaKoError> {
        let started = Instant::now();
        let columns = self.schema.get_columns(connection_id, table_name).await?;
        self.dictionary_single_table(connection_id, table_name, &columns, started)
            .await
    }

    /// `translate_single_table` over every table, at most `max_concurrency` at a time.
    /// A table whose translation fails falls back to the dictionary; the run never stops early.
    ///
    /// Unless `force_retranslate` is set, tables whose stored entry is not AI-generated are left
    /// untouched. They count as translated (their stored label stands) but add no columns.
    pub async fn translate_all_tables_columns(
        &self,
        connection_id: &str,
        options: &BatchOptions,
    ) -> Result<AllColumnsResult, SchemaKoError> {
        let started = Instant::now();
        let tables = self.schema.get_tables(connection_id).await?;
        let total_tables = tables.len();
        let existing = self.get_translations(connection_id, true).await?;
        let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));

        let mut kept = 0;
        let mut join_set = JoinSet::new();
        for table in tables {
            let manual = existing
                .get(&table.name)
                .is_some_and(|entry| !entry.is_ai_generated);
            if manual && !options.force_retranslate {
                debug!(connection_id, table = %table.name, "keeping non-AI translation");
                kept += 1;
                continue;
            }

            let service = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let connection_id = connection_id.to_string();
            let options = options.clone();

            join_set.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return TableOutcome::Failed;
                };
                match service
                    .translate_single_table(&connection_id, &table.name, &options)
                    .await
                {
                    Ok(result) => TableOutcome::Translated(result.columns_translated),
                    Err(e) => {
                        warn!(connection_id = %connection_id, table = %table.name, error = %e, "table translation failed, retrying with dictionary");
                        match service
                            .translate_single_table_with_dictionary(&connection_id, &table.name)
                            .await
                        {
                            Ok(result) => TableOutcome::FellBack(result.columns_translated),
                            Err(e) => {
                                warn!(connection_id = %connection_id, table = %table.name, error = %e, "dictionary fallback failed");
                                TableOutcome::Failed
                            }
                        }
                    }
                }
            });
        }

        let (mut translated_tables, mut failed_tables, mut total_columns) = (kept, 0, 0);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(TableOutcome::Translated(columns)) => {
                    translated_tables += 1;
                    total_columns += columns;
                }
                Ok(TableOutcome::FellBack(columns)) => {
                    failed_tables += 1;
                    total_columns += columns;
                }
                Ok(TableOutcome::Failed) => failed_tables += 1,
                Err(e) => {
                    warn!(connection_id, error = %e, "table task panicked");
                    failed_tables += 1;
                }
            }
        }

        // every task wrote through persist_single, which already invalidated; this covers panics
        self.cache.invalidate(Some(connection_id));

        let result = AllColumnsResult {
            total_tables,
            translated_tables,
            failed_tables,
            total_columns,
            duration: started.elapsed(),
        };
        info!(
            connection_id,
            total_tables,
            translated_tables,
            failed_tables,
            total_columns,
            "column translation finished"
        );
        Ok(result)
    }

    fn ai_client(&self, options: &BatchOptions) -> Option<&Arc<dyn AiTranslationClient>> {
        if options.use_ai {
            self.ai.as_ref()
        } else {
            None
        }
    }

    async fn ai_table_names(
        &self,
        ai: &Arc<dyn AiTranslationClient>,
        chunk: &[String],
        timeout: Duration,
    ) -> Result<HashMap<String, String>, SchemaKoError> {
        let prompt = table_batch_prompt(chunk);
        let prompt_ref = &prompt;

        retry_with_backoff(&self.retry, "table batch", || async move {
            let text = ai.complete(SYSTEM_PROMPT, prompt_ref, timeout).await?;
            let parsed = parse_translation_lines(&text, chunk);
            if parsed.is_empty() {
                return Err(SchemaKoError::Ai(
                    "reply contained no `english: korean` lines".to_string(),
                ));
            }
            debug!(requested = chunk.len(), parsed = parsed.len(), "AI table batch parsed");
            Ok(parsed)
        })
        .await
    }

    async fn save_with_dictionary_columns(
        &self,
        connection_id: &str,
        table_name: &str,
        korean_name: String,
        ai_generated: bool,
    ) -> Result<(), SchemaKoError> {
        let columns = self.schema.get_columns(connection_id, table_name).await?;
        let mut entry = TranslationEntry::new(connection_id, table_name, korean_name);
        entry.column_translations = dictionary_columns(&columns);
        entry.is_ai_generated = ai_generated;
        self.store.upsert(&entry).await?;
        Ok(())
    }

    async fn dictionary_single_table(
        &self,
        connection_id: &str,
        table_name: &str,
        columns: &[ColumnInfo],
        started: Instant,
    ) -> Result<SingleTableResult, SchemaKoError> {
        let mut entry =
            TranslationEntry::new(connection_id, table_name, translate_table_name(table_name));
        entry.column_translations = dictionary_columns(columns);
        self.persist_single(entry, started).await
    }

    async fn persist_single(
        &self,
        entry: TranslationEntry,
        started: Instant,
    ) -> Result<SingleTableResult, SchemaKoError> {
        let saved = self.store.upsert(&entry).await;
        self.cache.invalidate(Some(entry.connection_id.as_str()));
        let saved = saved?;

        self.stats.record(saved.is_ai_generated, started.elapsed());
        Ok(SingleTableResult {
            table_name: saved.table_name,
            korean_name: saved.korean_name,
            columns_translated: saved.column_translations.len(),
            is_ai_generated: saved.is_ai_generated,
        })
    }
}

pub fn dictionary_columns(columns: &[ColumnInfo]) -> BTreeMap<String, String> {
    columns
        .iter()
        .map(|c| {
            (
                c.name.clone(),
                translate_column_name(&c.name, c.comment.as_deref()),
            )
        })
        .collect()
}
