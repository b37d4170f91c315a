use crate::application::translate::TranslationService;
use crate::domain::error::SchemaKoError;
use crate::domain::traits::AiTranslationClient;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::client::ChatCompletionsClient;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::cache::TranslationCache;
use crate::infrastructure::storage::db::SqliteTranslationStore;
use crate::infrastructure::storage::schema::SqliteSchemaIntrospection;
use std::sync::Arc;
use tokio_rusqlite::Connection;

#[derive(Clone)]
pub struct AppState {
    pub service: TranslationService,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Connection, config: Config) -> Result<Self, SchemaKoError> {
        let http_client = create_client()?;
        let ai: Option<Arc<dyn AiTranslationClient>> =
            ChatCompletionsClient::from_config(http_client, &config.ai)
                .map(|client| Arc::new(client) as Arc<dyn AiTranslationClient>);

        let service = TranslationService::new(
            Arc::new(SqliteSchemaIntrospection::new(config.connection_paths())),
            Arc::new(SqliteTranslationStore::new(db)),
            Arc::new(TranslationCache::new(config.cache_ttl())),
        )
        .with_ai_client(ai);

        Ok(Self {
            service,
            config: Arc::new(config),
        })
    }
}
