//! HHI Calculator — Herfindahl-Hirschman revenue concentration per genre.
//!
//! `HHI = 10000 × Σ sᵢ²` with `sᵢ = revenueᵢ / T`. Per-product revenue and
//! the genre total `T` come from the same record slice, so a product's
//! revenue is counted once in each. `T = 0` yields `0.0`.

use std::collections::BTreeMap;

use crate::{
  metric::{HHI_PRECISION, HhiMetric, round_to},
  record::{GenreId, TaggedRecord},
};

/// HHI of a set of per-product revenues, rounded to two places.
pub fn hhi<I>(revenues: I) -> f64
where
  I: IntoIterator<Item = u64>,
{
  let revenues: Vec<u64> = revenues.into_iter().collect();
  let total: u128 = revenues.iter().map(|&r| u128::from(r)).sum();
  if total == 0 {
    return 0.0;
  }
  let total = total as f64;
  let sum_sq: f64 = revenues
    .iter()
    .map(|&r| {
      let share = r as f64 / total;
      share * share
    })
    .sum();
  round_to(sum_sq * 10_000.0, HHI_PRECISION)
}

pub fn aggregate(records: &[TaggedRecord]) -> Vec<HhiMetric> {
  let mut by_genre: BTreeMap<GenreId, BTreeMap<&str, u64>> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let total = by_genre
      .entry(*genre_id)
      .or_default()
      .entry(record.product_id.as_str())
      .or_default();
    *total = total.saturating_add(record.revenue);
  }

  by_genre
    .into_iter()
    .map(|(genre_id, products)| HhiMetric { genre_id, hhi: hhi(products.into_values()) })
    .collect()
}
