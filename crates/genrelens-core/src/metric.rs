//! Output rows — one genre-level table per aggregator.
//!
//! Field order and naming are the externally visible contract. Every table
//! contains only the genres present in the input; no zero-filled rows are
//! synthesised for absent genres.

use serde::{Deserialize, Serialize};

use crate::record::GenreId;

/// Decimal places for ratio and float outputs.
pub const RATIO_PRECISION: i32 = 6;

/// Decimal places for the HHI score.
pub const HHI_PRECISION: i32 = 2;

/// Round half away from zero to `places` decimals. Non-finite input becomes
/// `0.0` so NaN never reaches a caller.
pub fn round_to(value: f64, places: i32) -> f64 {
  if !value.is_finite() {
    return 0.0;
  }
  let factor = 10f64.powi(places);
  let rounded = (value * factor).round() / factor;
  // Normalise -0.0.
  if rounded == 0.0 { 0.0 } else { rounded }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueMetric {
  pub genre_id:         GenreId,
  /// Distinct products with at least one record in the window.
  pub count_apps:       u64,
  pub count_download:   u64,
  /// Paid/organic download split. Not yet computed upstream; always `None`
  /// (serialised as `null`) until a data source provides it.
  pub paid_download:    Option<u64>,
  pub organic_download: Option<u64>,
  pub revenue:          u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetric {
  pub genre_id:     GenreId,
  pub active_users: f64,
  pub install_base: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMetric {
  pub genre_id: GenreId,
  pub rating:   f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionMetric {
  pub genre_id:      GenreId,
  pub big_version:   f64,
  pub small_version: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMetric {
  pub genre_id:    GenreId,
  pub new_entrant: u64,
  pub new_exit:    u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HhiMetric {
  pub genre_id: GenreId,
  pub hhi:      f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityMetric {
  pub genre_id:     GenreId,
  pub stability:    f64,
  pub stability_5:  f64,
  pub stability_10: f64,
  pub stability_20: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRank {
  pub rank:           u32,
  pub country_code:   String,
  pub count_download: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRankMetric {
  pub genre_id: GenreId,
  /// Descending by downloads; ranks run 1..=len with no gaps.
  pub rankings: Vec<CountryRank>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_to_fixed_places() {
    assert_eq!(round_to(0.123_456_789, 6), 0.123_457);
    assert_eq!(round_to(5800.000_000_1, 2), 5800.0);
    assert_eq!(round_to(2.0 / 3.0, 2), 0.67);
  }

  #[test]
  fn round_to_maps_non_finite_to_zero() {
    assert_eq!(round_to(f64::NAN, 6), 0.0);
    assert_eq!(round_to(f64::INFINITY, 2), 0.0);
  }

  #[test]
  fn round_to_never_returns_negative_zero() {
    let r = round_to(-0.000_000_1, 6);
    assert_eq!(r, 0.0);
    assert!(r.is_sign_positive());
  }

  #[test]
  fn revenue_split_serialises_as_null() {
    let row = RevenueMetric {
      genre_id:         7,
      count_apps:       1,
      count_download:   10,
      paid_download:    None,
      organic_download: None,
      revenue:          99,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert!(json["paid_download"].is_null());
    assert!(json["organic_download"].is_null());
    assert_eq!(json["revenue"], 99);
  }
}
