// HTTP client utilities
use crate::domain::error::SchemaKoError;
use reqwest::Client;

/// Shared HTTP client; per-request timeouts are applied by the caller.
pub fn create_client() -> Result<Client, SchemaKoError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .user_agent(concat!("schemako/", env!("CARGO_PKG_VERSION")))
        .build()?)
}
