//! `collector` — server and admin tool for the collector records store.
//!
//! Reads `collector.toml` (or the path specified with `--config`), opens the
//! SQLite store, and either serves the JSON API or runs a one-shot report.
//!
//! ```
//! collector serve
//! collector export --output members.csv --status active
//! collector expiring --days 30
//! ```

mod config;

use std::{
  fs::File,
  io::{self, Write},
  path::PathBuf,
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use clap::{Parser, Subcommand};
use collector_api::{ApiSettings, api_router};
use collector_core::{
  export::write_csv,
  status::CollectorStatus,
  store::{CollectorQuery, CollectorStore},
};
use collector_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Collector records server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "collector.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (the default).
  Serve,

  /// Write collectors as CSV.
  Export {
    /// Destination file; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only export collectors with this status.
    #[arg(long)]
    status: Option<CollectorStatus>,

    /// Case-insensitive name filter.
    #[arg(long)]
    text: Option<String>,
  },

  /// List collectors whose membership expires soon.
  Expiring {
    /// Look-ahead in days; defaults to the configured window.
    #[arg(long)]
    days: Option<u32>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let cfg = ServerConfig::load(&cli.config)?;

  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &cfg).await,
    Command::Export { output, status, text } => {
      let query = CollectorQuery { text, status, ..Default::default() };
      export(&store, &query, output).await
    }
    Command::Expiring { days } => {
      let days = days.map_or(cfg.expiring_window_days, i64::from);
      expiring(&store, days).await
    }
  }
}

async fn serve(store: SqliteStore, cfg: &ServerConfig) -> anyhow::Result<()> {
  let settings = ApiSettings { expiring_window_days: cfg.expiring_window_days };
  let app = Router::new()
    .nest("/api", api_router(Arc::new(store), settings))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn export(
  store: &SqliteStore,
  query: &CollectorQuery,
  output: Option<PathBuf>,
) -> anyhow::Result<()> {
  let collectors = store.list(query).await.context("failed to list collectors")?;

  match &output {
    Some(path) => {
      let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
      write_csv(file, &collectors).context("failed to write CSV")?;
    }
    None => write_csv(io::stdout().lock(), &collectors)
      .context("failed to write CSV")?,
  }

  tracing::info!(rows = collectors.len(), "exported collectors");
  Ok(())
}

async fn expiring(store: &SqliteStore, days: i64) -> anyhow::Result<()> {
  let collectors = store
    .expiring_soon(days)
    .await
    .context("failed to query expiring collectors")?;

  let mut out = io::stdout().lock();
  for c in &collectors {
    writeln!(out, "{}\t{}\t{}", c.fields.expiration_date, c, c.fields.email)?;
  }
  tracing::info!(count = collectors.len(), days, "expiring collectors");
  Ok(())
}
