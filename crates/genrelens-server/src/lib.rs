//! HTTP front end for GenreLens.
//!
//! Wraps the [`genrelens_api`] router in CORS and request tracing layers and
//! mounts it under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{
  Router,
  http::{HeaderValue, Method},
};
use genrelens_api::WindowBounds;
use genrelens_core::{MetricsEngine, record::CountryAllowList, source::RecordSource};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GENRELENS_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Countries whose records take part in every metric except `count`.
  pub countries:    Vec<String>,
  /// Browser origins allowed to call the API.
  pub cors_origins: Vec<String>,
  pub window:       WindowBounds,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "127.0.0.1".to_string(),
      port:         8000,
      store_path:   PathBuf::from("genrelens.db"),
      countries:    CountryAllowList::DEFAULT.iter().map(|c| c.to_string()).collect(),
      cors_origins: vec!["http://localhost:3000".to_string()],
      window:       WindowBounds::default(),
    }
  }
}

impl ServerConfig {
  pub fn allow_list(&self) -> CountryAllowList { CountryAllowList::new(&self.countries) }
}

// ─── Application ──────────────────────────────────────────────────────────────

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
    .collect::<anyhow::Result<Vec<_>>>()?;
  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([Method::GET, Method::OPTIONS])
      .allow_headers(Any),
  )
}

/// Build the full application router: the API nested under `/api`, with CORS
/// for `config.cors_origins` and an HTTP trace layer.
pub fn app<S>(engine: Arc<MetricsEngine<S>>, config: &ServerConfig) -> anyhow::Result<Router>
where
  S: RecordSource + 'static,
{
  Ok(
    Router::new()
      .nest("/api", genrelens_api::api_router(engine, config.window))
      .layer(cors_layer(&config.cors_origins)?)
      .layer(TraceLayer::new_for_http()),
  )
}
