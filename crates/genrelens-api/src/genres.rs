//! Handler for `GET /genre`.

use axum::{Json, extract::State};
use genrelens_core::{record::Genre, source::RecordSource};

use crate::{ApiState, Data, error::ApiError};

/// `GET /genre` — every known genre, ordered by id.
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Data<Genre>>, ApiError>
where
  S: RecordSource,
{
  let genres = state.engine.genres().await?;
  Ok(Json(Data::new(genres)))
}
