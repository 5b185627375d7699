//! Version aggregator: average big/small version changes per product.
//!
//! A change is "big" when the new major segment exceeds the old one and
//! "small" when they are equal. A major-version decrease counts as neither.
//! Only products with at least one version-change event in the window are
//! averaged over.

use std::collections::BTreeMap;

use crate::{
  metric::{RATIO_PRECISION, VersionMetric, round_to},
  record::{GenreId, TaggedRecord, VersionChange},
};

/// How a single version change is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  Big,
  Small,
  /// Major version went down; excluded from both counts.
  Decrease,
}

/// Parse the segment before the first dot as an unsigned integer; anything
/// non-numeric (including an empty string) parses as 0.
pub fn major_segment(version: &str) -> u64 {
  version
    .split('.')
    .next()
    .and_then(|s| s.trim().parse().ok())
    .unwrap_or(0)
}

pub fn classify(change: &VersionChange) -> ChangeKind {
  let old = major_segment(&change.old);
  let new = major_segment(&change.new);
  match new.cmp(&old) {
    std::cmp::Ordering::Greater => ChangeKind::Big,
    std::cmp::Ordering::Equal => ChangeKind::Small,
    std::cmp::Ordering::Less => ChangeKind::Decrease,
  }
}

pub fn aggregate(records: &[TaggedRecord]) -> Vec<VersionMetric> {
  let mut by_product: BTreeMap<(GenreId, &str), (u64, u64)> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let Some(change) = &record.version_change else { continue };
    let (big, small) = by_product
      .entry((*genre_id, record.product_id.as_str()))
      .or_default();
    match classify(change) {
      ChangeKind::Big => *big += 1,
      ChangeKind::Small => *small += 1,
      ChangeKind::Decrease => {}
    }
  }

  let mut by_genre: BTreeMap<GenreId, (u64, u64, u64)> = BTreeMap::new();
  for ((genre_id, _), (big, small)) in by_product {
    let (products, big_total, small_total) = by_genre.entry(genre_id).or_default();
    *products += 1;
    *big_total += big;
    *small_total += small;
  }

  by_genre
    .into_iter()
    .map(|(genre_id, (products, big, small))| {
      let n = products as f64;
      VersionMetric {
        genre_id,
        big_version: round_to(big as f64 / n, RATIO_PRECISION),
        small_version: round_to(small as f64 / n, RATIO_PRECISION),
      }
    })
    .collect()
}
