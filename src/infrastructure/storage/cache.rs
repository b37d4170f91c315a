// Per-connection TTL cache over the translation store, using DashMap
use crate::domain::error::SchemaKoError;
use crate::domain::model::TranslationEntry;
use crate::domain::traits::TranslationStore;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// table_name -> entry, for one connection
pub type TranslationMap = HashMap<String, TranslationEntry>;

struct CacheEntry {
    data: Arc<TranslationMap>,
    timestamp: Instant,
}

/// Read-through cache keyed by connection id.
///
/// The store stays the source of truth. Every invalidation bumps a generation so a
/// reload that started before the invalidation is never written back.
pub struct TranslationCache {
    entries: DashMap<String, CacheEntry>,
    generations: DashMap<String, u64>,
    epoch: AtomicU64,
    ttl: Duration,
}

impl TranslationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            generations: DashMap::new(),
            epoch: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_cached(
        &self,
        store: &dyn TranslationStore,
        connection_id: &str,
        force_refresh: bool,
    ) -> Result<Arc<TranslationMap>, SchemaKoError> {
        if !force_refresh {
            if let Some(entry) = self.entries.get(connection_id) {
                if entry.timestamp.elapsed() < self.ttl {
                    return Ok(Arc::clone(&entry.data));
                }
            }
        }

        let stamp = self.stamp(connection_id);
        let rows = store.find_by_connection(connection_id).await?;
        let data: Arc<TranslationMap> = Arc::new(
            rows.into_iter()
                .map(|entry| (entry.table_name.clone(), entry))
                .collect(),
        );

        // check and insert under the shard lock so a concurrent invalidate cannot slip between
        let entry = self.entries.entry(connection_id.to_string());
        if self.stamp(connection_id) == stamp {
            entry.insert(CacheEntry {
                data: Arc::clone(&data),
                timestamp: Instant::now(),
            });
            debug!(connection_id, tables = data.len(), "translation cache refreshed");
        } else {
            debug!(connection_id, "translation cache invalidated during reload, not stored");
        }

        Ok(data)
    }

    /// Drop one connection's entry, or everything when `connection_id` is `None`.
    pub fn invalidate(&self, connection_id: Option<&str>) {
        match connection_id {
            Some(id) => {
                *self.generations.entry(id.to_string()).or_insert(0) += 1;
                self.entries.remove(id);
            }
            None => {
                self.epoch.fetch_add(1, Ordering::SeqCst);
                self.entries.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn stamp(&self, connection_id: &str) -> (u64, u64) {
        let generation = self.generations.get(connection_id).map_or(0, |g| *g);
        (self.epoch.load(Ordering::SeqCst), generation)
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
