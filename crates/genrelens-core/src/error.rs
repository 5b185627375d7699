//! Error types for `genrelens-core`.
//!
//! Degenerate ratios (zero denominators, too few points for a correlation)
//! are not errors; the aggregators normalise them to `0.0`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid window: {year}-{month:02} (month must be 1-12)")]
  InvalidWindow { year: i32, month: u32 },

  #[error("record source unavailable: {0}")]
  UpstreamUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn upstream<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::UpstreamUnavailable(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
