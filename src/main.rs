//! Bigram CLI - count adjacent word pairs across text files

use bigram::config::{self, BigramConfig};
use bigram::storage::{Store, StoreHandle};
use bigram::ui::{self, Icons};
use bigram::{bigram as pairs, ingest, Tokenizer};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bigram")]
#[command(disable_version_flag = true)]
#[command(about = "Add bigrams from text files to a word-pair database")]
#[command(long_about = r#"Add bigrams from text files to a word-pair database.

Every file is split into words and each pair of adjacent words is counted.
Counts accumulate across runs until the database is reset.

Example usage:
  bigram ./sample-texts/alice.txt
  bigram --reset ./sample-texts/*.txt
  bigram --top 20
"#)]
struct Cli {
    /// Text files to add
    files: Vec<PathBuf>,

    /// Delete the database before adding files
    #[arg(long)]
    reset: bool,

    /// Path to the database file (overrides the config file)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print database statistics
    #[arg(long)]
    stats: bool,

    /// Print the N most frequent bigrams
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    top: Option<u64>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'V', long)]
    version: bool,
}

impl Cli {
    fn wants_report(&self) -> bool {
        self.stats || self.top.is_some()
    }
}

#[derive(Serialize)]
struct JsonReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<bigram::StoreStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top: Option<Vec<bigram::BigramRow>>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if cli.version {
        println!("Version {}", env!("CARGO_PKG_VERSION"));
        return Ok(ExitCode::SUCCESS);
    }

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?.unwrap_or_default();
    let store = Store::new(config.database_path(cli.database.as_deref()));

    if cli.reset {
        store.reset()?;
        ui::header(Icons::DEL, &format!("Reset {}", store.path().display()));
    }

    if cli.files.is_empty() && !cli.wants_report() {
        eprintln!("Expected at least one file path (see --help)");
        return Ok(ExitCode::from(2));
    }

    let mut handle = store.connect()?;
    let result = run(&cli, &config, &mut handle);
    let closed = handle.close();
    result?;
    closed?;

    Ok(ExitCode::SUCCESS)
}

fn run(cli: &Cli, config: &BigramConfig, handle: &mut StoreHandle) -> anyhow::Result<()> {
    let tokenizer = Tokenizer::new(config.lowercase());

    for path in &cli.files {
        match ingest::ingest_file(handle, path, &tokenizer)? {
            Some(report) => {
                tracing::info!("{}: {} tokens, {} bigrams", path.display(), report.tokens, report.bigrams);
                if !cli.json {
                    ui::file_ingested(path, &report);
                }
            }
            None => ui::warn(&format!("File not found: {}", path.display())),
        }
    }

    if !cli.files.is_empty() && !cli.json {
        ui::success(&format!("Saved to {}", store_label(handle)));
    }

    if !cli.wants_report() {
        return Ok(());
    }

    let stats = if cli.stats { Some(handle.stats()?) } else { None };
    let top = match cli.top {
        Some(limit) => Some(pairs::top(handle, limit as usize)?),
        None => None,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&JsonReport { stats, top })?);
        return Ok(());
    }

    if let Some(stats) = stats {
        ui::header(Icons::STATS, &format!("Statistics ({})", store_label(handle)));
        println!("{}", ui::stats_table(&stats));
    }

    if let Some(rows) = top {
        if rows.is_empty() {
            println!("∅ No bigrams recorded yet.");
        } else {
            ui::header(Icons::DATABASE, &format!("Top {} bigrams", rows.len()));
            println!("{}", ui::bigram_table(&rows));
        }
    }

    Ok(())
}

fn store_label(handle: &StoreHandle) -> String {
    handle
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| ":memory:".to_string())
}
