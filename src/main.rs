// Main entry point
mod interfaces;

use clap::Parser;
use colored::Colorize;
use interfaces::cli::{parse_pair, BatchArgs, Cli, Command};
use schemako::application::manage::parse_import_payload;
use schemako::domain::model::BatchOptions;
use schemako::domain::traits::ProgressSink;
use schemako::infrastructure::config::{self, load_config, Config};
use schemako::infrastructure::storage::db::init_database;
use schemako::presentation::progress::BarProgress;
use schemako::state::AppState;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            eprintln!("\n중단 신호를 받아 종료합니다...");
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if matches!(cli.command, Command::GenerateConfig) {
        config::generate_config_sample()?;
        return Ok(());
    }

    let db_path = config::get_database_path(&config);
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_conn = init_database(&db_path).await?;
    let state = AppState::new(db_conn, config)?;

    tokio::select! {
        result = run(&state, cli) => result,
        _ = shutdown_rx => {
            eprintln!("작업이 중단되었습니다");
            Ok(())
        }
    }
}

async fn run(state: &AppState, cli: Cli) -> anyhow::Result<()> {
    let service = &state.service;
    let config = state.config.as_ref();
    let json = cli.json;

    match cli.command {
        Command::Translate {
            connection,
            force,
            batch,
        } => {
            let mut options = batch_options(config, &batch);
            options.force_retranslate = force;
            let progress = BarProgress::new();
            let sink: Option<&dyn ProgressSink> = if json { None } else { Some(&progress) };
            let result = service.translate_and_save(&connection, &options, sink).await?;
            if json {
                print_json(&result)?;
            } else {
                println!(
                    "{} 번역 {}개, 건너뜀 {}개, 실패 {}개 ({} ms)",
                    connection.green().bold(),
                    result.translated,
                    result.skipped,
                    result.failed.to_string().red(),
                    result.duration.as_millis()
                );
            }
        }
        Command::Table {
            connection,
            table,
            batch,
        } => {
            let options = batch_options(config, &batch);
            let result = service
                .translate_single_table(&connection, &table, &options)
                .await?;
            if json {
                print_json(&result)?;
            } else {
                let source = if result.is_ai_generated { "[AI]" } else { "[사전]" };
                println!(
                    "{} → {} {} (컬럼 {}개)",
                    result.table_name,
                    result.korean_name.bright_magenta().bold(),
                    source.cyan(),
                    result.columns_translated
                );
            }
        }
        Command::Columns { connection, batch } => {
            let options = batch_options(config, &batch);
            let result = service
                .translate_all_tables_columns(&connection, &options)
                .await?;
            if json {
                print_json(&result)?;
            } else {
                println!(
                    "테이블 {}개 중 {}개 번역, {}개 사전 대체, 컬럼 {}개 ({} ms)",
                    result.total_tables,
                    result.translated_tables,
                    result.failed_tables,
                    result.total_columns,
                    result.duration.as_millis()
                );
            }
        }
        Command::Show {
            connection,
            refresh,
        } => {
            let translations = service.get_translations(&connection, refresh).await?;
            let mut entries: Vec<_> = translations.values().cloned().collect();
            entries.sort_by(|a, b| a.table_name.cmp(&b.table_name));
            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("{}", "저장된 번역이 없습니다".yellow());
            } else {
                for entry in entries {
                    let source = if entry.is_ai_generated { "[AI]" } else { "" };
                    println!(
                        "{} {} {}",
                        entry.table_name.bright_white().bold(),
                        entry.korean_name.bright_magenta(),
                        source.cyan()
                    );
                    if let Some(description) = &entry.korean_description {
                        println!("  {}", description.dimmed());
                    }
                    for (column, korean) in &entry.column_translations {
                        println!("  {} {}", column, korean.yellow());
                    }
                }
            }
        }
        Command::Set {
            connection,
            table,
            korean,
            description,
        } => {
            let entry = service
                .update_translation(&connection, &table, korean, description, None)
                .await?;
            if json {
                print_json(&entry)?;
            } else {
                println!("{} → {}", entry.table_name, entry.korean_name.green());
            }
        }
        Command::SetColumn {
            connection,
            table,
            pairs,
        } => {
            let mut columns = BTreeMap::new();
            for pair in &pairs {
                match parse_pair(pair) {
                    Some((column, korean)) => {
                        columns.insert(column, korean);
                    }
                    None => anyhow::bail!("expected column=korean, got '{}'", pair),
                }
            }
            let entry = service
                .update_multiple_column_translations(&connection, &table, columns)
                .await?;
            if json {
                print_json(&entry)?;
            } else {
                println!(
                    "{} 컬럼 번역 {}개 저장됨",
                    entry.table_name,
                    entry.column_translations.len()
                );
            }
        }
        Command::Delete { connection, table } => match table {
            Some(table) => {
                let deleted = service.delete_translation(&connection, &table).await?;
                if json {
                    print_json(&deleted)?;
                } else if deleted {
                    println!("{} 번역 삭제됨", table);
                } else {
                    println!("{}", "삭제할 번역이 없습니다".yellow());
                }
            }
            None => {
                let deleted = service.delete_all_translations(&connection).await?;
                if json {
                    print_json(&deleted)?;
                } else {
                    println!("{} 번역 {}개 삭제됨", connection, deleted);
                }
            }
        },
        Command::Export { connection, output } => {
            let snapshot = service.export_translations(&connection).await?;
            let content = serde_json::to_string_pretty(&snapshot)?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, content).await?;
                    eprintln!(
                        "{}개 번역을 {}에 저장했습니다",
                        snapshot.translations.len(),
                        path.display()
                    );
                }
                None => println!("{}", content),
            }
        }
        Command::Import { connection, file } => {
            let content = tokio::fs::read_to_string(&file).await?;
            let entries = parse_import_payload(&content)?;
            let result = service.import_translations(&connection, entries).await?;
            if json {
                print_json(&result)?;
            } else {
                println!("추가 {}개, 갱신 {}개", result.imported, result.updated);
            }
        }
        Command::Sql { connection, prompt } => {
            let prompt = prompt.join(" ");
            let generation = service.generate_sql(&connection, &prompt).await?;
            if json {
                print_json(&generation)?;
            } else {
                println!("{}", generation.sql.bright_white());
                println!();
                println!("{}", generation.explanation.cyan());
            }
        }
        Command::Status => print_status(state, config).await?,
        Command::GenerateConfig => config::generate_config_sample()?,
    }

    Ok(())
}

fn batch_options(config: &Config, args: &BatchArgs) -> BatchOptions {
    let mut options = config.batch_options();
    if args.no_ai {
        options.use_ai = false;
    }
    if let Some(size) = args.batch_size {
        options.batch_size = size.max(1);
    }
    if let Some(concurrency) = args.concurrency {
        options.max_concurrency = concurrency.max(1);
    }
    if let Some(ms) = args.timeout {
        options.timeout = Duration::from_millis(ms);
    }
    options
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = logging.path.as_deref().filter(|p| !p.is_empty()) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .init();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_status(state: &AppState, config: &Config) -> anyhow::Result<()> {
    println!("{}", "schemako Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = config::get_database_path(config);
    let count = state.service.store().count().await?;
    println!("Database: {} ({} translations)", db_path.display(), count);

    println!(
        "Memory Cache: {} connections (TTL {}s)",
        state.service.cache().len(),
        state.service.cache().ttl().as_secs()
    );

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    if state.service.has_ai() {
        println!("AI: {} ({})", "Configured".green(), config.ai.model);
    } else {
        println!("AI: {}", "Not configured (dictionary only)".yellow());
    }

    let mut ids: Vec<_> = config.connections.keys().collect();
    ids.sort();
    println!("Connections: {}", ids.len());
    for id in ids {
        println!("  {} → {}", id, config.connections[id]);
    }

    let stats = state.service.statistics();
    println!(
        "Session: AI {} / 사전 {} (avg {:.0} ms)",
        stats.ai_translations, stats.dictionary_translations, stats.average_latency_ms
    );

    Ok(())
}
