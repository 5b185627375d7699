//! The `RecordSource` trait — the boundary toward the raw record store and
//! the genre resolver.
//!
//! Implemented by storage backends (e.g. `genrelens-store-sqlite`). The engine
//! depends on this abstraction, not on any concrete backend. Retry and timeout
//! policy belongs to the implementation.

use std::future::Future;

use crate::{
  record::{CountryAllowList, Genre, ProductMeta, TaggedRecord},
  window::DateWindow,
};

/// A read-only supplier of raw records and product reference data.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All genre definitions, independent of any date window.
  fn genres(&self) -> impl Future<Output = Result<Vec<Genre>, Self::Error>> + Send + '_;

  /// Every record dated within `window` (inclusive) whose country is in
  /// `countries`, tagged with its product's genre. Records of products with
  /// no metadata are not returned.
  fn records<'a>(
    &'a self,
    window: DateWindow,
    countries: &'a CountryAllowList,
  ) -> impl Future<Output = Result<Vec<TaggedRecord>, Self::Error>> + Send + 'a;

  /// The full product metadata set.
  fn products(&self) -> impl Future<Output = Result<Vec<ProductMeta>, Self::Error>> + Send + '_;
}
