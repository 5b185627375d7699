//! Input types: raw daily records, product metadata and genre reference data.
//!
//! Records are immutable, supplied fresh for each request and dropped once the
//! aggregation that consumed them returns.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable integer key of a genre.
pub type GenreId = i64;

// ─── Genre ───────────────────────────────────────────────────────────────────

/// A classification bucket for products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
  pub id:   GenreId,
  pub name: String,
}

// ─── Raw records ─────────────────────────────────────────────────────────────

/// A rating observation. `count_cumulative` is the weight used when averaging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSample {
  pub value:            f64,
  pub count_cumulative: u64,
}

/// A version-change event, as the dotted version strings before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionChange {
  pub old: String,
  pub new: String,
}

/// One observation keyed by `(product_id, country_code, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
  pub product_id:     String,
  pub country_code:   String,
  pub date:           NaiveDate,
  pub downloads:      u64,
  /// Currency minor units.
  pub revenue:        u64,
  pub active_users:   f64,
  pub install_base:   f64,
  pub rating:         Option<RatingSample>,
  pub version_change: Option<VersionChange>,
}

impl RawRecord {
  /// A record with every metric zeroed and no rating or version event.
  pub fn new(
    product_id: impl Into<String>,
    country_code: impl Into<String>,
    date: NaiveDate,
  ) -> Self {
    Self {
      product_id: product_id.into(),
      country_code: country_code.into(),
      date,
      downloads: 0,
      revenue: 0,
      active_users: 0.0,
      install_base: 0.0,
      rating: None,
      version_change: None,
    }
  }
}

/// A [`RawRecord`] tagged with the genre of its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedRecord {
  pub genre_id: GenreId,
  pub record:   RawRecord,
}

// ─── Product metadata ────────────────────────────────────────────────────────

/// Lifecycle status of a product.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProductStatus {
  #[default]
  Active,
  Dead,
}

/// Per-product metadata, independent of any date window or country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMeta {
  pub product_id:         String,
  pub genre_id:           GenreId,
  pub first_release_date: Option<NaiveDate>,
  pub last_update_date:   Option<NaiveDate>,
  pub status:             ProductStatus,
}

// ─── Country allow-list ──────────────────────────────────────────────────────

/// The fixed set of country codes every windowed aggregation is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryAllowList(BTreeSet<String>);

impl CountryAllowList {
  /// Markets covered by the upstream data set.
  pub const DEFAULT: [&'static str; 10] =
    ["AU", "BR", "DE", "FR", "JP", "KR", "US", "GB", "IN", "CN"];

  /// Build an allow-list; codes are trimmed and upper-cased, blanks dropped.
  pub fn new<I, S>(codes: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self(
      codes
        .into_iter()
        .map(|c| c.as_ref().trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .collect(),
    )
  }

  pub fn contains(&self, country_code: &str) -> bool {
    self.0.contains(country_code)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> { self.0.iter().map(String::as_str) }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl Default for CountryAllowList {
  fn default() -> Self { Self::new(Self::DEFAULT) }
}
