use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schemako")]
#[command(about = "Korean labels for SQL schemas, and Korean prompts to SQL.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Clone, Default)]
pub struct BatchArgs {
    /// Skip the AI and use the dictionary only
    #[arg(long)]
    pub no_ai: bool,

    /// Tables per AI request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Maximum tables processed at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Timeout of each AI call in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Translate table names of a connection and save them
    Translate {
        connection: String,
        /// Retranslate tables that already have a translation
        #[arg(short, long)]
        force: bool,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Translate one table together with all of its columns
    Table {
        connection: String,
        table: String,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Translate every table together with its columns
    Columns {
        connection: String,
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Show saved translations
    Show {
        connection: String,
        /// Bypass the cache
        #[arg(short, long)]
        refresh: bool,
    },

    /// Set a table's Korean name by hand
    Set {
        connection: String,
        table: String,
        korean: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Set column labels by hand (column=korean ...)
    SetColumn {
        connection: String,
        table: String,
        #[arg(num_args = 1.., required = true)]
        pairs: Vec<String>,
    },

    /// Delete one table's translation, or all of a connection
    Delete {
        connection: String,
        table: Option<String>,
    },

    /// Export translations as JSON
    Export {
        connection: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import translations from a JSON export
    Import { connection: String, file: PathBuf },

    /// Turn a Korean question into SQL
    Sql {
        connection: String,
        #[arg(num_args = 1.., required = true)]
        prompt: Vec<String>,
    },

    /// Show status
    Status,

    /// Generate config sample
    GenerateConfig,
}

/// `email=이메일` -> (`email`, `이메일`)
pub fn parse_pair(pair: &str) -> Option<(String, String)> {
    let (column, korean) = pair.split_once('=')?;
    let (column, korean) = (column.trim(), korean.trim());
    if column.is_empty() || korean.is_empty() {
        return None;
    }
    Some((column.to_string(), korean.to_string()))
}
