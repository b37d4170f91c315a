//! 통합 테스트 공용 목(mock) 구현
#![allow(dead_code)]

use async_trait::async_trait;
use schemako::application::retry::RetryPolicy;
use schemako::domain::error::SchemaKoError;
use schemako::domain::model::{ColumnInfo, ProgressEvent, TableInfo, TranslationEntry};
use schemako::domain::traits::{
    AiTranslationClient, ProgressSink, SchemaIntrospection, TranslationStore,
};
use schemako::infrastructure::storage::cache::TranslationCache;
use schemako::TranslationService;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CONN: &str = "shop";

/// Fixed schema: connection -> ordered (table, columns)
#[derive(Default)]
pub struct MockSchema {
    connections: HashMap<String, Vec<(String, Vec<ColumnInfo>)>>,
}

impl MockSchema {
    pub fn with_tables(connection_id: &str, tables: Vec<(&str, Vec<ColumnInfo>)>) -> Self {
        let mut connections = HashMap::new();
        connections.insert(
            connection_id.to_string(),
            tables
                .into_iter()
                .map(|(name, columns)| (name.to_string(), columns))
                .collect(),
        );
        Self { connections }
    }

    /// `count` tables named `t0`.. each with `id` and `created_at`
    pub fn numbered(connection_id: &str, count: usize) -> Self {
        let names: Vec<String> = (0..count).map(|i| format!("t{}", i)).collect();
        Self::with_tables(
            connection_id,
            names
                .iter()
                .map(|n| (n.as_str(), basic_columns()))
                .collect(),
        )
    }
}

#[async_trait]
impl SchemaIntrospection for MockSchema {
    async fn get_tables(&self, connection_id: &str) -> Result<Vec<TableInfo>, SchemaKoError> {
        let tables = self
            .connections
            .get(connection_id)
            .ok_or_else(|| SchemaKoError::NotFound(connection_id.to_string()))?;
        Ok(tables
            .iter()
            .map(|(name, _)| TableInfo { name: name.clone() })
            .collect())
    }

    async fn get_columns(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Vec<ColumnInfo>, SchemaKoError> {
        self.connections
            .get(connection_id)
            .and_then(|tables| tables.iter().find(|(name, _)| name == table_name))
            .map(|(_, columns)| columns.clone())
            .ok_or_else(|| SchemaKoError::NotFound(table_name.to_string()))
    }
}

pub fn basic_columns() -> Vec<ColumnInfo> {
    vec![
        ColumnInfo::new("id", "integer"),
        ColumnInfo::new("created_at", "timestamp"),
    ]
}

/// In-memory store with call counters, optional per-table failures and an in-flight gauge
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<(String, String), TranslationEntry>>,
    next_id: AtomicUsize,
    pub find_calls: AtomicUsize,
    pub fail_tables: Mutex<HashSet<String>>,
    pub upsert_delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub peak_in_flight: AtomicUsize,
}

impl MemoryStore {
    pub fn slow(delay: Duration) -> Self {
        Self {
            upsert_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn fail_on(&self, table_name: &str) {
        if let Ok(mut tables) = self.fail_tables.lock() {
            tables.insert(table_name.to_string());
        }
    }

    pub fn get(&self, connection_id: &str, table_name: &str) -> Option<TranslationEntry> {
        self.rows
            .lock()
            .unwrap()
            .get(&(connection_id.to_string(), table_name.to_string()))
            .cloned()
    }

    pub fn finds(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn find_by_connection(
        &self,
        connection_id: &str,
    ) -> Result<Vec<TranslationEntry>, SchemaKoError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.connection_id == connection_id)
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        connection_id: &str,
        table_name: &str,
    ) -> Result<Option<TranslationEntry>, SchemaKoError> {
        Ok(self.get(connection_id, table_name))
    }

    async fn upsert(&self, entry: &TranslationEntry) -> Result<TranslationEntry, SchemaKoError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.upsert_delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_tables.lock().unwrap().contains(&entry.table_name) {
            return Err(SchemaKoError::Config(format!(
                "disk full while saving {}",
                entry.table_name
            )));
        }

        let key = (entry.connection_id.clone(), entry.table_name.clone());
        let mut rows = self.rows.lock().unwrap();
        let mut stored = entry.clone();
        stored.id = match rows.get(&key) {
            Some(existing) => existing.id,
            None => Some(self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1),
        };
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, connection_id: &str, table_name: &str) -> Result<bool, SchemaKoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .remove(&(connection_id.to_string(), table_name.to_string()))
            .is_some())
    }

    async fn delete_by_connection(&self, connection_id: &str) -> Result<usize, SchemaKoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|(conn, _), _| conn != connection_id);
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<usize, SchemaKoError> {
        Ok(self.rows.lock().unwrap().len())
    }
}

/// AI stub: fails the first `failures` calls, then answers with `reply`
pub struct ScriptedAi {
    reply: String,
    failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl ScriptedAi {
    pub fn answering(reply: &str) -> Self {
        Self::failing_then(0, reply)
    }

    pub fn always_failing() -> Self {
        Self::failing_then(usize::MAX, "")
    }

    pub fn failing_then(failures: usize, reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            failures: AtomicUsize::new(failures),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiTranslationClient for ScriptedAi {
    async fn complete(
        &self,
        _system: &str,
        _prompt: &str,
        _timeout: Duration,
    ) -> Result<String, SchemaKoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            if remaining != usize::MAX {
                self.failures.fetch_sub(1, Ordering::SeqCst);
            }
            return Err(SchemaKoError::Ai("upstream 503".to_string()));
        }
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

pub fn service(
    schema: MockSchema,
    store: Arc<MemoryStore>,
    ai: Option<Arc<ScriptedAi>>,
) -> TranslationService {
    TranslationService::new(
        Arc::new(schema),
        store,
        Arc::new(TranslationCache::default()),
    )
    .with_ai_client(ai.map(|ai| ai as Arc<dyn AiTranslationClient>))
    .with_retry_policy(fast_retry())
}
