use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaKoError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("AI translation error: {0}")]
    Ai(String),

    #[error("AI request timed out after {0} ms")]
    Timeout(u64),
}

impl SchemaKoError {
    /// Failures worth another attempt: the AI service, the network, or a slow response.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SchemaKoError::Ai(_) | SchemaKoError::Http(_) | SchemaKoError::Timeout(_)
        )
    }
}
