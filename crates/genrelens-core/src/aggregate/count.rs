//! Count aggregator: new entrants and exits per genre.
//!
//! Works over the full product metadata set, not the windowed record tables,
//! so no country filter applies. Every genre with at least one product gets a
//! row, even when both counts are zero.

use std::collections::BTreeMap;

use crate::{
  metric::CountMetric,
  record::{GenreId, ProductMeta, ProductStatus},
  window::DateWindow,
};

pub fn aggregate(products: &[ProductMeta], window: &DateWindow) -> Vec<CountMetric> {
  let in_window = |date: Option<chrono::NaiveDate>| date.is_some_and(|d| window.contains(d));

  let mut by_genre: BTreeMap<GenreId, (u64, u64)> = BTreeMap::new();
  for p in products {
    let (entrants, exits) = by_genre.entry(p.genre_id).or_default();
    if in_window(p.first_release_date) {
      *entrants += 1;
    }
    if p.status == ProductStatus::Dead && in_window(p.last_update_date) {
      *exits += 1;
    }
  }

  by_genre
    .into_iter()
    .map(|(genre_id, (new_entrant, new_exit))| CountMetric { genre_id, new_entrant, new_exit })
    .collect()
}
