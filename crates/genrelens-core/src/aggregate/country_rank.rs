//! Country Ranking Builder — top countries by downloads per genre.

use std::collections::BTreeMap;

use crate::{
  metric::{CountryRank, CountryRankMetric},
  record::{GenreId, TaggedRecord},
  stats::rank_descending,
};

/// Maximum number of countries reported per genre.
pub const TOP_N: usize = 10;

/// Sum downloads per `(genre, country)`, sort each genre's countries by total
/// descending (ties by country code ascending), and keep the top ten with
/// ranks `1..=n`. Genres with fewer countries return fewer rows.
pub fn aggregate(records: &[TaggedRecord]) -> Vec<CountryRankMetric> {
  let mut by_genre: BTreeMap<GenreId, BTreeMap<&str, u64>> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records {
    let total = by_genre
      .entry(*genre_id)
      .or_default()
      .entry(record.country_code.as_str())
      .or_default();
    *total = total.saturating_add(record.downloads);
  }

  by_genre
    .into_iter()
    .map(|(genre_id, countries)| CountryRankMetric {
      genre_id,
      rankings: rank_descending(countries)
        .into_iter()
        .take(TOP_N)
        .map(|(country_code, rank, count_download)| CountryRank {
          rank,
          country_code: country_code.to_owned(),
          count_download,
        })
        .collect(),
    })
    .collect()
}
