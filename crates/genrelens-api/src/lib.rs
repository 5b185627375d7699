//! JSON REST API for GenreLens.
//!
//! Exposes an axum [`Router`] backed by a [`MetricsEngine`] over any
//! [`RecordSource`]. CORS, TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", genrelens_api::api_router(engine.clone(), WindowBounds::default()))
//! ```

pub mod bounds;
pub mod error;
pub mod genres;
pub mod metrics;

use std::sync::Arc;

use axum::{Router, routing::get};
use genrelens_core::{MetricsEngine, source::RecordSource};
use serde::Serialize;

pub use bounds::WindowBounds;
pub use error::ApiError;

// ─── Envelope ─────────────────────────────────────────────────────────────────

/// Response body of every successful request: `{"data": [...]}`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
  pub data: Vec<T>,
}

impl<T> Data<T> {
  pub fn new(data: Vec<T>) -> Self { Self { data } }
}

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub engine: Arc<MetricsEngine<S>>,
  pub bounds: WindowBounds,
}

// Derived `Clone` would require `S: Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self { Self { engine: Arc::clone(&self.engine), bounds: self.bounds } }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(engine: Arc<MetricsEngine<S>>, bounds: WindowBounds) -> Router<()>
where
  S: RecordSource + 'static,
{
  Router::new()
    .route("/genre",                              get(genres::list::<S>))
    .route("/genre/{year}/{month}/revenue",       get(metrics::revenue::<S>))
    .route("/genre/{year}/{month}/user",          get(metrics::user::<S>))
    .route("/genre/{year}/{month}/rating",        get(metrics::rating::<S>))
    .route("/genre/{year}/{month}/version",       get(metrics::version::<S>))
    .route("/genre/{year}/{month}/count",         get(metrics::count::<S>))
    .route("/genre/{year}/{month}/hhi",           get(metrics::hhi::<S>))
    .route("/genre/{year}/{month}/stability",     get(metrics::stability::<S>))
    .route("/genre/{year}/{month}/country_rank",  get(metrics::country_rank::<S>))
    .with_state(ApiState { engine, bounds })
}

// ─── Integration tests ────────────────────────────────────────────────────────
