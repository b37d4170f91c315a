use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// 테이블 한 개의 번역 결과 (connection_id, table_name 조합으로 유일)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>, // row id, kept stable across upserts
    #[serde(default)]
    pub connection_id: String,
    pub table_name: String,
    pub korean_name: String,
    #[serde(default)]
    pub korean_description: Option<String>,
    #[serde(default)]
    pub column_translations: BTreeMap<String, String>, // column -> 한국어 이름
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl TranslationEntry {
    pub fn new(connection_id: &str, table_name: &str, korean_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            connection_id: connection_id.to_string(),
            table_name: table_name.to_string(),
            korean_name,
            korean_description: None,
            column_translations: BTreeMap::new(),
            is_ai_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge incoming column labels into this entry; incoming wins on conflict.
    pub fn merge_columns<I>(&mut self, incoming: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.column_translations.extend(incoming);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub comment: Option<String>,
}

impl ColumnInfo {
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            comment: None,
        }
    }
}

// 배치 번역 옵션
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub force_retranslate: bool,
    pub use_ai: bool,
    pub batch_size: usize,
    pub max_concurrency: usize,
    pub timeout: Duration, // per AI call
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            force_retranslate: false,
            use_ai: true,
            batch_size: 10,
            max_concurrency: 3,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SingleTableResult {
    pub table_name: String,
    pub korean_name: String,
    pub columns_translated: usize,
    pub is_ai_generated: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AllColumnsResult {
    pub total_tables: usize,
    pub translated_tables: usize,
    pub failed_tables: usize,
    pub total_columns: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Translated,
    Failed,
    Completed,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub connection_id: String,
    pub current: usize,
    pub total: usize,
    pub table_name: String,
    pub status: ProgressStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub connection_id: String,
    pub exported_at: DateTime<Utc>,
    pub translations: Vec<TranslationEntry>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ImportResult {
    pub imported: usize,
    pub updated: usize,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationStatistics {
    pub ai_translations: u64,
    pub dictionary_translations: u64,
    pub average_latency_ms: f64,
    pub samples: usize,
}

// NL2SQL 테이블 매칭 단계 (우선순위 순)
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MatchTier {
    Keyword,
    KoreanTableName,
    EnglishTableName,
    Column,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub table_name: String,
    pub korean_name: String,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SqlGeneration {
    pub sql: String,
    pub explanation: String,
    pub schema_context: String,
    pub matched: Option<MatchResult>,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
