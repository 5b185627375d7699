//! genrelens server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite record store, and serves the genre metrics API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use genrelens_core::MetricsEngine;
use genrelens_server::ServerConfig;
use genrelens_store_sqlite::SqliteSource;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "GenreLens genre metrics server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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
    .init();

  let cli = Cli::parse();

  // Load configuration. `GENRELENS_WINDOW__MAX_YEAR=2025` sets `window.max_year`.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("GENRELENS")
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("countries")
        .with_list_parse_key("cors_origins")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let source = SqliteSource::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let countries = server_cfg.allow_list();
  tracing::info!(countries = countries.len(), "country allow-list loaded");
  let engine = Arc::new(MetricsEngine::new(Arc::new(source), countries));

  let app = genrelens_server::app(engine, &server_cfg)?;
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
