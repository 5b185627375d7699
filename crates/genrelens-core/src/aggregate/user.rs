//! User aggregator: summed active users and install base per genre.

use std::collections::BTreeMap;

use crate::{
  metric::{RATIO_PRECISION, UserMetric, round_to},
  record::{GenreId, TaggedRecord},
};

pub fn aggregate(records: &[TaggedRecord]) -> Vec<UserMetric> {
  let mut by_genre: BTreeMap<GenreId, (f64, f64)> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let (active, installed) = by_genre.entry(*genre_id).or_default();
    *active += record.active_users;
    *installed += record.install_base;
  }

  by_genre
    .into_iter()
    .map(|(genre_id, (active, installed))| UserMetric {
      genre_id,
      active_users: round_to(active, RATIO_PRECISION),
      install_base: round_to(installed, RATIO_PRECISION),
    })
    .collect()
}
