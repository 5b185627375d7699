//! [`MetricsEngine`] — resolves a request window, performs one source read and
//! routes the records to exactly one aggregator.
//!
//! The engine holds no mutable state; any number of calls may run
//! concurrently with different windows.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
  aggregate::{count, country_rank, hhi, rating, revenue, stability, user, version},
  metric::{
    CountMetric, CountryRankMetric, HhiMetric, RatingMetric, RevenueMetric, StabilityMetric,
    UserMetric, VersionMetric,
  },
  record::{CountryAllowList, Genre, TaggedRecord},
  source::RecordSource,
  window::{self, DateWindow},
  Error, Result,
};

pub struct MetricsEngine<S> {
  source:    Arc<S>,
  countries: CountryAllowList,
}

impl<S: RecordSource> MetricsEngine<S> {
  pub fn new(source: Arc<S>, countries: CountryAllowList) -> Self { Self { source, countries } }

  /// Read the window's records, then re-apply the date and country filters so
  /// the aggregators never see anything outside them.
  async fn windowed(&self, window: DateWindow) -> Result<Vec<TaggedRecord>> {
    let mut records = self
      .source
      .records(window, &self.countries)
      .await
      .map_err(|e| {
        warn!(start = %window.start, end = %window.end, "record source failed: {e}");
        Error::upstream(e)
      })?;
    let fetched = records.len();
    records.retain(|r| {
      window.contains(r.record.date) && self.countries.contains(&r.record.country_code)
    });
    debug!(
      start = %window.start,
      end = %window.end,
      fetched,
      kept = records.len(),
      "loaded window records"
    );
    Ok(records)
  }

  pub async fn genres(&self) -> Result<Vec<Genre>> {
    self.source.genres().await.map_err(|e| {
      warn!("genre read failed: {e}");
      Error::upstream(e)
    })
  }

  pub async fn revenue(&self, year: i32, month: u32) -> Result<Vec<RevenueMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(revenue::aggregate(&records))
  }

  pub async fn user(&self, year: i32, month: u32) -> Result<Vec<UserMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(user::aggregate(&records))
  }

  pub async fn rating(&self, year: i32, month: u32) -> Result<Vec<RatingMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(rating::aggregate(&records))
  }

  pub async fn version(&self, year: i32, month: u32) -> Result<Vec<VersionMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(version::aggregate(&records))
  }

  /// Entrants and exits over the full product set; the allow-list does not
  /// apply.
  pub async fn count(&self, year: i32, month: u32) -> Result<Vec<CountMetric>> {
    let window = window::resolve(year, month)?;
    let products = self.source.products().await.map_err(|e| {
      warn!("product metadata read failed: {e}");
      Error::upstream(e)
    })?;
    debug!(products = products.len(), "loaded product metadata");
    Ok(count::aggregate(&products, &window))
  }

  pub async fn hhi(&self, year: i32, month: u32) -> Result<Vec<HhiMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(hhi::aggregate(&records))
  }

  /// Reads the span from the previous month end to the target month end and
  /// correlates the two end-point snapshots.
  pub async fn stability(&self, year: i32, month: u32) -> Result<Vec<StabilityMetric>> {
    let target = window::resolve(year, month)?;
    let previous_end = window::previous_month_end(year, month)?;
    let records = self.windowed(DateWindow::new(previous_end, target.end)).await?;
    Ok(stability::aggregate(&records, previous_end, target.end))
  }

  pub async fn country_rank(&self, year: i32, month: u32) -> Result<Vec<CountryRankMetric>> {
    let records = self.windowed(window::resolve(year, month)?).await?;
    Ok(country_rank::aggregate(&records))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use chrono::NaiveDate;

  use super::*;
  use crate::record::{ProductMeta, ProductStatus, RawRecord};

  #[derive(Debug, thiserror::Error)]
  #[error("source offline")]
  struct Offline;

  /// In-memory source that deliberately ignores the window and allow-list so
  /// the engine's own filtering is exercised.
  #[derive(Default)]
  struct VecSource {
    records:  Vec<TaggedRecord>,
    products: Vec<ProductMeta>,
    offline:  bool,
    reads:    AtomicUsize,
  }

  impl RecordSource for VecSource {
    type Error = Offline;

    async fn genres(&self) -> Result<Vec<Genre>, Offline> {
      if self.offline {
        return Err(Offline);
      }
      Ok(vec![Genre { id: 1, name: "Puzzle".into() }])
    }

    async fn records(
      &self,
      _window: DateWindow,
      _countries: &CountryAllowList,
    ) -> Result<Vec<TaggedRecord>, Offline> {
      self.reads.fetch_add(1, Ordering::SeqCst);
      if self.offline {
        return Err(Offline);
      }
      Ok(self.records.clone())
    }

    async fn products(&self) -> Result<Vec<ProductMeta>, Offline> {
      if self.offline {
        return Err(Offline);
      }
      Ok(self.products.clone())
    }
  }

  fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

  fn rec(genre_id: i64, product: &str, country: &str, date: NaiveDate, revenue: u64) -> TaggedRecord {
    let mut record = RawRecord::new(product, country, date);
    record.revenue = revenue;
    record.downloads = revenue;
    TaggedRecord { genre_id, record }
  }

  fn engine(source: VecSource) -> MetricsEngine<VecSource> {
    MetricsEngine::new(Arc::new(source), CountryAllowList::default())
  }

  #[tokio::test]
  async fn filters_out_of_window_and_disallowed_countries() {
    let e = engine(VecSource {
      records: vec![
        rec(1, "p1", "US", date(2023, 6, 10), 300),
        rec(1, "p2", "US", date(2023, 6, 11), 700),
        rec(1, "p3", "CA", date(2023, 6, 11), 5_000),
        rec(1, "p4", "US", date(2023, 7, 1), 9_000),
      ],
      ..Default::default()
    });

    let rows = e.hhi(2023, 6).await.unwrap();
    assert_eq!(rows, vec![HhiMetric { genre_id: 1, hhi: 5800.0 }]);

    let rows = e.revenue(2023, 6).await.unwrap();
    assert_eq!(rows[0].count_apps, 2);
    assert_eq!(rows[0].revenue, 1000);
  }

  #[tokio::test]
  async fn invalid_month_fails_before_reading_the_source() {
    let e = engine(VecSource::default());
    let err = e.revenue(2023, 13).await.unwrap_err();
    assert!(matches!(err, Error::InvalidWindow { year: 2023, month: 13 }));
    assert_eq!(e.source.reads.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn source_failure_is_upstream_unavailable() {
    let e = engine(VecSource { offline: true, ..Default::default() });
    assert!(matches!(e.country_rank(2023, 6).await, Err(Error::UpstreamUnavailable(_))));
    assert!(matches!(e.count(2023, 6).await, Err(Error::UpstreamUnavailable(_))));
    assert!(matches!(e.genres().await, Err(Error::UpstreamUnavailable(_))));
  }

  #[tokio::test]
  async fn stability_spans_previous_month_end() {
    let prev = date(2022, 12, 31);
    let end = date(2023, 1, 31);
    let e = engine(VecSource {
      records: vec![
        rec(1, "p1", "US", prev, 300),
        rec(1, "p2", "US", prev, 200),
        rec(1, "p3", "US", prev, 100),
        rec(1, "p1", "US", end, 30),
        rec(1, "p2", "US", end, 20),
        rec(1, "p3", "US", end, 10),
        // Outside the span entirely.
        rec(1, "p3", "US", date(2022, 12, 30), 1_000_000),
      ],
      ..Default::default()
    });
    let rows = e.stability(2023, 1).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].stability, 1.0);
    assert_eq!(rows[0].stability_5, 1.0);
    assert_eq!(rows[0].stability_10, 1.0);
    assert_eq!(rows[0].stability_20, 1.0);
  }

  #[tokio::test]
  async fn count_ignores_country_allow_list() {
    let e = engine(VecSource {
      products: vec![ProductMeta {
        product_id:         "p1".into(),
        genre_id:           4,
        first_release_date: Some(date(2023, 6, 2)),
        last_update_date:   None,
        status:             ProductStatus::Active,
      }],
      ..Default::default()
    });
    let rows = e.count(2023, 6).await.unwrap();
    assert_eq!(rows[0].new_entrant, 1);
    assert_eq!(rows[0].new_exit, 0);
  }

  #[tokio::test]
  async fn country_rank_never_reports_disallowed_countries() {
    let e = engine(VecSource {
      records: vec![
        rec(1, "p1", "US", date(2023, 6, 1), 5),
        rec(1, "p1", "CA", date(2023, 6, 1), 50),
      ],
      ..Default::default()
    });
    let rows = e.country_rank(2023, 6).await.unwrap();
    assert_eq!(rows[0].rankings.len(), 1);
    assert_eq!(rows[0].rankings[0].country_code, "US");
  }
}
