//! Stability Correlator — rank persistence between two snapshots.
//!
//! For each genre, products are ranked by total downloads (summed across
//! countries) on the previous month's last day and again on the target
//! month's last day. Only products present in both snapshots are paired. The
//! Pearson correlation between the two rank series is reported unrestricted
//! and restricted to pairs where both ranks fall within the top 5, 10 and 20.
//!
//! Ties within a snapshot are broken by product id ascending. Any bucket with
//! fewer than two pairs, or with a constant rank series, reports `0.0`.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
  metric::{RATIO_PRECISION, StabilityMetric, round_to},
  record::{GenreId, TaggedRecord},
  stats::{pearson, rank_descending},
};

/// Rank cut-offs for the restricted correlations.
pub const THRESHOLDS: [u32; 3] = [5, 10, 20];

/// A product's rank at the previous month end and at the target month end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankPair {
  pub previous: u32,
  pub current:  u32,
}

/// Correlation over the pairs whose ranks are both `<= limit`, or over every
/// pair when `limit` is `None`.
pub fn correlate(pairs: &[RankPair], limit: Option<u32>) -> f64 {
  let points: Vec<(f64, f64)> = pairs
    .iter()
    .filter(|p| limit.is_none_or(|k| p.previous <= k && p.current <= k))
    .map(|p| (f64::from(p.previous), f64::from(p.current)))
    .collect();
  round_to(pearson(&points), RATIO_PRECISION)
}

/// Build the stability row for one genre from its joined rank pairs.
pub fn stability_row(genre_id: GenreId, pairs: &[RankPair]) -> StabilityMetric {
  let [top5, top10, top20] = THRESHOLDS.map(|k| correlate(pairs, Some(k)));
  StabilityMetric {
    genre_id,
    stability: correlate(pairs, None),
    stability_5: top5,
    stability_10: top10,
    stability_20: top20,
  }
}

/// Rank every product per genre within a single-day snapshot.
fn snapshot_ranks<'a>(
  records: &'a [TaggedRecord],
  date: NaiveDate,
) -> BTreeMap<GenreId, BTreeMap<&'a str, u32>> {
  let mut totals: BTreeMap<GenreId, BTreeMap<&'a str, u64>> = BTreeMap::new();
  for TaggedRecord { genre_id, record } in records.iter().filter(|r| r.record.date == date) {
    let total = totals
      .entry(*genre_id)
      .or_default()
      .entry(record.product_id.as_str())
      .or_default();
    *total = total.saturating_add(record.downloads);
  }

  totals
    .into_iter()
    .map(|(genre_id, products)| {
      let ranks = rank_descending(products)
        .into_iter()
        .map(|(product, rank, _)| (product, rank))
        .collect();
      (genre_id, ranks)
    })
    .collect()
}

/// `records` must cover both `previous_month_end` and `end_date`; records on
/// any other date are ignored.
pub fn aggregate(
  records: &[TaggedRecord],
  previous_month_end: NaiveDate,
  end_date: NaiveDate,
) -> Vec<StabilityMetric> {
  let previous = snapshot_ranks(records, previous_month_end);
  let mut current = snapshot_ranks(records, end_date);

  previous
    .into_iter()
    .filter_map(|(genre_id, prev_ranks)| {
      let cur_ranks = current.remove(&genre_id)?;
      let pairs: Vec<RankPair> = prev_ranks
        .iter()
        .filter_map(|(product, &previous)| {
          cur_ranks
            .get(product)
            .map(|&current| RankPair { previous, current })
        })
        .collect();
      if pairs.is_empty() {
        return None;
      }
      Some(stability_row(genre_id, &pairs))
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::aggregate::fixtures::downloads;

  fn prev() -> NaiveDate { NaiveDate::from_ymd_opt(2023, 5, 31).unwrap() }

  fn end() -> NaiveDate { NaiveDate::from_ymd_opt(2023, 6, 30).unwrap() }

  fn pairs(ranks: &[(u32, u32)]) -> Vec<RankPair> {
    ranks
      .iter()
      .map(|&(previous, current)| RankPair { previous, current })
      .collect()
  }

  #[test]
  fn identical_rankings_are_fully_stable() {
    let records = vec![
      downloads(1, "p1", "US", prev(), 300),
      downloads(1, "p2", "US", prev(), 200),
      downloads(1, "p3", "US", prev(), 100),
      downloads(1, "p1", "US", end(), 30),
      downloads(1, "p2", "US", end(), 20),
      downloads(1, "p3", "US", end(), 10),
    ];
    let rows = aggregate(&records, prev(), end());
    assert_eq!(
      rows,
      vec![StabilityMetric {
        genre_id:     1,
        stability:    1.0,
        stability_5:  1.0,
        stability_10: 1.0,
        stability_20: 1.0,
      }]
    );
  }

  #[test]
  fn downloads_are_summed_across_countries_before_ranking() {
    // Previous: p1 = 10+10 = 20 beats p2 = 15. End: p2 wins.
    let records = vec![
      downloads(1, "p1", "US", prev(), 10),
      downloads(1, "p1", "JP", prev(), 10),
      downloads(1, "p2", "US", prev(), 15),
      downloads(1, "p1", "US", end(), 1),
      downloads(1, "p2", "US", end(), 2),
    ];
    let rows = aggregate(&records, prev(), end());
    assert_eq!(rows[0].stability, -1.0);
  }

  #[test]
  fn extreme_download_totals_saturate_before_ranking() {
    let records = vec![
      downloads(1, "p1", "US", prev(), u64::MAX),
      downloads(1, "p1", "JP", prev(), u64::MAX),
      downloads(1, "p2", "US", prev(), 1),
      downloads(1, "p1", "US", end(), u64::MAX),
      downloads(1, "p2", "US", end(), 1),
    ];
    assert_eq!(aggregate(&records, prev(), end())[0].stability, 1.0);
  }

  #[test]
  fn products_missing_from_one_snapshot_are_excluded() {
    // p4 only exists at the end; p1..p3 keep their order.
    let records = vec![
      downloads(1, "p1", "US", prev(), 300),
      downloads(1, "p2", "US", prev(), 200),
      downloads(1, "p3", "US", prev(), 100),
      downloads(1, "p4", "US", end(), 999),
      downloads(1, "p1", "US", end(), 30),
      downloads(1, "p2", "US", end(), 20),
      downloads(1, "p3", "US", end(), 10),
    ];
    let rows = aggregate(&records, prev(), end());
    // Ranks shift by one at the end but stay perfectly correlated.
    assert_eq!(rows[0].stability, 1.0);
  }

  #[test]
  fn genre_present_in_one_snapshot_only_is_absent() {
    let records = vec![
      downloads(1, "p1", "US", prev(), 1),
      downloads(2, "p9", "US", end(), 1),
    ];
    assert!(aggregate(&records, prev(), end()).is_empty());
  }

  #[test]
  fn genre_with_no_shared_products_is_absent() {
    let records = vec![
      downloads(1, "p1", "US", prev(), 1),
      downloads(1, "p2", "US", end(), 1),
    ];
    assert!(aggregate(&records, prev(), end()).is_empty());
  }

  #[test]
  fn records_on_other_dates_are_ignored() {
    let mid = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
    let records = vec![
      downloads(1, "p1", "US", prev(), 2),
      downloads(1, "p2", "US", prev(), 1),
      downloads(1, "p2", "US", mid, 1_000),
      downloads(1, "p1", "US", end(), 2),
      downloads(1, "p2", "US", end(), 1),
    ];
    assert_eq!(aggregate(&records, prev(), end())[0].stability, 1.0);
  }

  #[test]
  fn threshold_buckets_only_use_pairs_inside_both_cut_offs() {
    // Top five swap pairwise; ranks 6..=8 are fully reversed.
    let ranks = pairs(&[(1, 2), (2, 1), (3, 4), (4, 3), (5, 5), (6, 8), (7, 7), (8, 6)]);
    let row = stability_row(1, &ranks);
    assert_eq!(row.stability_5, correlate(&pairs(&[(1, 2), (2, 1), (3, 4), (4, 3), (5, 5)]), None));
    assert_eq!(row.stability_10, row.stability);
    assert_eq!(row.stability_20, row.stability);
    assert!(row.stability_5 > 0.0 && row.stability_5 < 1.0);
  }

  #[test]
  fn pair_outside_cut_off_on_one_side_is_dropped() {
    // (3, 6) falls outside top-5 at the end, leaving two perfectly ordered pairs.
    let ranks = pairs(&[(1, 1), (2, 2), (3, 6)]);
    assert_eq!(correlate(&ranks, Some(5)), 1.0);
  }

  #[test]
  fn degenerate_buckets_are_zero() {
    assert_eq!(correlate(&pairs(&[(1, 1)]), None), 0.0);
    assert_eq!(correlate(&pairs(&[(6, 6), (7, 7)]), Some(5)), 0.0);
    assert_eq!(correlate(&[], Some(20)), 0.0);
  }

  #[test]
  fn single_shared_product_reports_zero_everywhere() {
    let records = vec![
      downloads(3, "p1", "US", prev(), 5),
      downloads(3, "p1", "US", end(), 5),
    ];
    let rows = aggregate(&records, prev(), end());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stability, 0.0);
    assert_eq!(rows[0].stability_20, 0.0);
  }
}
