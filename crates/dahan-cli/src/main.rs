//! `dahan`: record Spirit Island games and keep their master data in sync.
//!
//! # Usage
//!
//! ```
//! dahan sync --force
//! dahan options spirits
//! dahan record game.json
//! dahan export --out games.csv
//! ```

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use dahan_core::dimension::{GameId, SpiritId};
use dahan_sheets::SheetSource;
use dahan_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "dahan", author, version, about = "Spirit Island score tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "dahan.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Create the database if needed and print its location.
  Init,

  /// Pull master data from the configured sheets.
  Sync {
    /// Replace tables that already hold rows.
    #[arg(long)]
    force: bool,
  },

  /// List the choices available when recording a game.
  Options {
    #[command(subcommand)]
    kind: OptionKind,
  },

  /// Record a game from a JSON draft (`-` for stdin).
  Record { file: PathBuf },

  /// Show recorded games, newest first.
  List {
    #[arg(long)]
    json: bool,
  },

  /// Write all games as CSV.
  Export {
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
  },

  /// Write a raw fact table as CSV.
  ExportRaw {
    table: RawTable,

    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
  },

  /// Delete a game and its event rows.
  Delete { id: i64 },
}

#[derive(Subcommand)]
enum OptionKind {
  Spirits,
  Aspects {
    #[arg(long)]
    spirit: i64,
  },
  Adversaries,
  Scenarios,
}

#[derive(Clone, Copy, ValueEnum)]
enum RawTable {
  Games,
  Events,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  let source = SheetSource::new(cfg.sources.clone(), cfg.fetch_timeout())
    .context("failed to set up master data source")?;

  match cli.command {
    Command::Init => {
      println!("store ready at {}", cfg.store_path.display());
    }
    Command::Sync { force } => commands::sync(&store, &source, force).await?,
    Command::Options { kind } => {
      commands::startup_sync(&store, &source).await;
      match kind {
        OptionKind::Spirits => commands::spirits(&store).await?,
        OptionKind::Aspects { spirit } => commands::aspects(&store, SpiritId(spirit)).await?,
        OptionKind::Adversaries => commands::adversaries(&store).await?,
        OptionKind::Scenarios => commands::scenarios(&store).await?,
      }
    }
    Command::Record { file } => {
      commands::startup_sync(&store, &source).await;
      commands::record(&store, &file).await?;
    }
    Command::List { json } => commands::list(&store, json).await?,
    Command::Export { out } => commands::export(&store, out.as_deref()).await?,
    Command::ExportRaw { table, out } => {
      commands::export_raw(&store, matches!(table, RawTable::Events), out.as_deref()).await?
    }
    Command::Delete { id } => commands::delete(&store, GameId(id)).await?,
  }

  Ok(())
}
