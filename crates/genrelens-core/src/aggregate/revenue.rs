//! Revenue aggregator: app count, downloads and revenue per genre.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
  metric::RevenueMetric,
  record::{GenreId, TaggedRecord},
};

#[derive(Default)]
struct Totals<'a> {
  products:  BTreeSet<&'a str>,
  downloads: u64,
  revenue:   u64,
}

pub fn aggregate(records: &[TaggedRecord]) -> Vec<RevenueMetric> {
  let mut by_genre: BTreeMap<GenreId, Totals<'_>> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let t = by_genre.entry(*genre_id).or_default();
    t.products.insert(record.product_id.as_str());
    t.downloads = t.downloads.saturating_add(record.downloads);
    t.revenue = t.revenue.saturating_add(record.revenue);
  }

  by_genre
    .into_iter()
    .map(|(genre_id, t)| RevenueMetric {
      genre_id,
      count_apps: t.products.len() as u64,
      count_download: t.downloads,
      paid_download: None,
      organic_download: None,
      revenue: t.revenue,
    })
    .collect()
}
