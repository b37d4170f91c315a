//! 설정 파일 테스트

use schemako::infrastructure::config::{get_database_path, parse_config, Config};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_config_defaults() {
    let config = parse_config("").unwrap();

    assert!(config.logging.enable);
    assert_eq!(config.logging.level, "WARN");
    assert!(config.ai.enable);
    assert_eq!(config.ai.model, "gpt-4o-mini");
    assert_eq!(config.ai.timeout_ms, 30_000);
    assert_eq!(config.translation.batch_size, 10);
    assert_eq!(config.translation.max_concurrency, 3);
    assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    assert!(config.connections.is_empty());
}

#[test]
fn test_config_toml_format() {
    let toml_content = r#"
database_path = "/tmp/schemako-test.db"

[logging]
enable = true
path = "/tmp/schemako.log"
level = "DEBUG"

[ai]
api_key = "sk-test"
base_url = "http://localhost:8080/v1"
model = "local-model"
timeout_ms = 5000

[translation]
batch_size = 0
max_concurrency = 8
use_ai = false
cache_ttl_secs = 60

[connections]
shop = "/data/shop.db"
"#;

    let config = parse_config(toml_content).unwrap();

    assert_eq!(config.logging.level, "DEBUG");
    assert_eq!(config.ai.resolve_api_key().as_deref(), Some("sk-test"));
    assert_eq!(
        get_database_path(&config),
        PathBuf::from("/tmp/schemako-test.db")
    );
    assert_eq!(
        config.connection_paths()["shop"],
        PathBuf::from("/data/shop.db")
    );

    let options = config.batch_options();
    // 0 은 1 로 보정
    assert_eq!(options.batch_size, 1);
    assert_eq!(options.max_concurrency, 8);
    assert!(!options.use_ai);
    assert_eq!(options.timeout, Duration::from_millis(5000));
    assert_eq!(config.cache_ttl(), Duration::from_secs(60));
}

#[test]
fn test_invalid_toml_is_an_error() {
    assert!(parse_config("[translation\nbatch_size = ").is_err());
}

#[test]
fn test_sample_round_trips() {
    let mut sample = Config::default();
    sample
        .connections
        .insert("local".to_string(), "/path/to/app.db".to_string());

    let text = toml::to_string_pretty(&sample).unwrap();
    let parsed = parse_config(&text).unwrap();
    assert_eq!(parsed.connections["local"], "/path/to/app.db");
    assert_eq!(parsed.translation.batch_size, 10);
}
