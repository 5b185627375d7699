//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical comparison in SQL matches
//! calendar order. Counts are stored as signed 64-bit integers.

use chrono::NaiveDate;
use genrelens_core::record::{
  GenreId, ProductMeta, ProductStatus, RatingSample, RawRecord, TaggedRecord, VersionChange,
};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counts ──────────────────────────────────────────────────────────────────

pub fn encode_count(column: &'static str, n: u64) -> Result<i64> {
  i64::try_from(n).map_err(|_| Error::OutOfRange { column, value: n.to_string() })
}

pub fn decode_count(column: &'static str, n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::OutOfRange { column, value: n.to_string() })
}

// ─── ProductStatus ───────────────────────────────────────────────────────────

pub fn decode_status(s: &str) -> Result<ProductStatus> {
  s.parse().map_err(|_| Error::UnknownStatus(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values of one `daily_records` row.
pub struct RecordRow {
  pub product_id:   String,
  pub country_code: String,
  pub date:         String,
  pub downloads:    i64,
  pub revenue:      i64,
  pub active_users: f64,
  pub install_base: f64,
  pub rating_value: Option<f64>,
  pub rating_count: Option<i64>,
  pub version_old:  Option<String>,
  pub version_new:  Option<String>,
}

impl RecordRow {
  pub fn encode(r: &RawRecord) -> Result<Self> {
    Ok(Self {
      product_id:   r.product_id.clone(),
      country_code: r.country_code.clone(),
      date:         encode_date(r.date),
      downloads:    encode_count("downloads", r.downloads)?,
      revenue:      encode_count("revenue", r.revenue)?,
      active_users: r.active_users,
      install_base: r.install_base,
      rating_value: r.rating.map(|s| s.value),
      rating_count: r
        .rating
        .map(|s| encode_count("rating_count", s.count_cumulative))
        .transpose()?,
      version_old:  r.version_change.as_ref().map(|v| v.old.clone()),
      version_new:  r.version_change.as_ref().map(|v| v.new.clone()),
    })
  }

  pub fn into_record(self) -> Result<RawRecord> {
    // A rating needs both its value and its weight; a version change needs
    // both sides.
    let rating = match (self.rating_value, self.rating_count) {
      (Some(value), Some(count)) => Some(RatingSample {
        value,
        count_cumulative: decode_count("rating_count", count)?,
      }),
      _ => None,
    };
    let version_change = match (self.version_old, self.version_new) {
      (Some(old), Some(new)) => Some(VersionChange { old, new }),
      _ => None,
    };

    Ok(RawRecord {
      product_id: self.product_id,
      country_code: self.country_code,
      date: decode_date(&self.date)?,
      downloads: decode_count("downloads", self.downloads)?,
      revenue: decode_count("revenue", self.revenue)?,
      active_users: self.active_users,
      install_base: self.install_base,
      rating,
      version_change,
    })
  }

  pub fn into_tagged(self, genre_id: GenreId) -> Result<TaggedRecord> {
    Ok(TaggedRecord { genre_id, record: self.into_record()? })
  }
}

/// Column values of one `products` row.
pub struct ProductRow {
  pub product_id:         String,
  pub genre_id:           i64,
  pub first_release_date: Option<String>,
  pub last_update_date:   Option<String>,
  pub status:             String,
}

impl ProductRow {
  pub fn encode(p: &ProductMeta) -> Self {
    Self {
      product_id:         p.product_id.clone(),
      genre_id:           p.genre_id,
      first_release_date: p.first_release_date.map(encode_date),
      last_update_date:   p.last_update_date.map(encode_date),
      status:             p.status.as_ref().to_owned(),
    }
  }

  pub fn into_product(self) -> Result<ProductMeta> {
    Ok(ProductMeta {
      product_id:         self.product_id,
      genre_id:           self.genre_id,
      first_release_date: self.first_release_date.as_deref().map(decode_date).transpose()?,
      last_update_date:   self.last_update_date.as_deref().map(decode_date).transpose()?,
      status:             decode_status(&self.status)?,
    })
  }
}
