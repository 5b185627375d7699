//! Handlers for `/genre/{year}/{month}/{metric}` endpoints.
//!
//! Every handler checks the window against the configured [`WindowBounds`]
//! before the engine is called, so an out-of-range request never reaches the
//! record source.
//!
//! [`WindowBounds`]: crate::WindowBounds

use axum::{
  Json,
  extract::{Path, State, rejection::PathRejection},
};
use genrelens_core::{
  metric::{
    CountMetric, CountryRankMetric, HhiMetric, RatingMetric, RevenueMetric, StabilityMetric,
    UserMetric, VersionMetric,
  },
  source::RecordSource,
};
use tracing::debug;

use crate::{ApiState, Data, error::ApiError};

type MetricResponse<T> = Result<Json<Data<T>>, ApiError>;

/// Raw `{year}/{month}` segments. The month is extracted wide so a negative
/// value is reported as a window violation rather than a parse failure.
type WindowPath = Result<Path<(i32, i64)>, PathRejection>;

fn window<S>(state: &ApiState<S>, path: WindowPath) -> Result<(i32, u32), ApiError> {
  let Path((year, month)) = path?;
  let month = state.bounds.check(year, month)?;
  Ok((year, month))
}

fn respond<T>(metric: &'static str, year: i32, month: u32, rows: Vec<T>) -> MetricResponse<T> {
  debug!(metric, year, month, rows = rows.len(), "served genre metric");
  Ok(Json(Data::new(rows)))
}

/// `GET /genre/{year}/{month}/revenue`
pub async fn revenue<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<RevenueMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("revenue", year, month, state.engine.revenue(year, month).await?)
}

/// `GET /genre/{year}/{month}/user`
pub async fn user<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<UserMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("user", year, month, state.engine.user(year, month).await?)
}

/// `GET /genre/{year}/{month}/rating`
pub async fn rating<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<RatingMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("rating", year, month, state.engine.rating(year, month).await?)
}

/// `GET /genre/{year}/{month}/version`
pub async fn version<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<VersionMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("version", year, month, state.engine.version(year, month).await?)
}

/// `GET /genre/{year}/{month}/count`
pub async fn count<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<CountMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("count", year, month, state.engine.count(year, month).await?)
}

/// `GET /genre/{year}/{month}/hhi`
pub async fn hhi<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<HhiMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("hhi", year, month, state.engine.hhi(year, month).await?)
}

/// `GET /genre/{year}/{month}/stability`
pub async fn stability<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<StabilityMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("stability", year, month, state.engine.stability(year, month).await?)
}

/// `GET /genre/{year}/{month}/country_rank`
pub async fn country_rank<S>(
  State(state): State<ApiState<S>>,
  path: WindowPath,
) -> MetricResponse<CountryRankMetric>
where
  S: RecordSource,
{
  let (year, month) = window(&state, path)?;
  respond("country_rank", year, month, state.engine.country_rank(year, month).await?)
}
