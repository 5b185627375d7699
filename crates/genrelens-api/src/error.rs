//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::PathRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("record source unavailable: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<genrelens_core::Error> for ApiError {
  fn from(e: genrelens_core::Error) -> Self {
    match e {
      e @ genrelens_core::Error::InvalidWindow { .. } => ApiError::BadRequest(e.to_string()),
      genrelens_core::Error::UpstreamUnavailable(source) => ApiError::Upstream(source),
    }
  }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Upstream(e) => {
        tracing::error!("upstream failure: {e}");
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
