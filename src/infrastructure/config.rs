use crate::domain::error::SchemaKoError;
use crate::domain::model::BatchOptions;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "SCHEMAKO_AI_API_KEY";

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub database_path: Option<String>,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub translation: TranslationDefaults,
    /// connection id -> SQLite database file to introspect
    #[serde(default)]
    pub connections: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AiConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationDefaults {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_enable")]
    pub use_ai: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enable: true,
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TranslationDefaults {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_concurrency: default_max_concurrency(),
            use_ai: true,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl AiConfig {
    /// Key from the config file, else from the environment. Blank keys count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

impl Config {
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            force_retranslate: false,
            use_ai: self.translation.use_ai,
            batch_size: self.translation.batch_size.max(1),
            max_concurrency: self.translation.max_concurrency.max(1),
            timeout: Duration::from_millis(self.ai.timeout_ms),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.translation.cache_ttl_secs)
    }

    pub fn connection_paths(&self) -> HashMap<String, PathBuf> {
        self.connections
            .iter()
            .map(|(id, path)| (id.clone(), PathBuf::from(path)))
            .collect()
    }
}

// Defaults
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_timeout_ms() -> u64 {
    30_000
}
fn default_batch_size() -> usize {
    10
}
fn default_max_concurrency() -> usize {
    3
}
fn default_cache_ttl_secs() -> u64 {
    300
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("schemako").join("config.toml"))
}

/// Translation store path: `database_path` from the config, else ~/.config/schemako/schemako.db
pub fn get_database_path(config: &Config) -> PathBuf {
    if let Some(path) = config.database_path.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("schemako")
        .join("schemako.db")
}

pub fn parse_config(content: &str) -> Result<Config, SchemaKoError> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn load_config() -> Result<Config, SchemaKoError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match parse_config(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), SchemaKoError> {
    let path = get_config_path()
        .ok_or_else(|| SchemaKoError::Config("Cannot determine config directory".to_string()))?;

    if path.exists() {
        eprintln!("Config file already exists at: {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut sample = Config::default();
    sample
        .connections
        .insert("local".to_string(), "/path/to/app.db".to_string());
    let toml_content = toml::to_string_pretty(&sample)
        .map_err(|e| SchemaKoError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(&path, toml_content)
        .map_err(|e| SchemaKoError::Config(format!("Failed to write config file: {}", e)))?;
    println!("Generated config file at: {}", path.display());

    Ok(())
}
