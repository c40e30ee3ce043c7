//! Handler for `GET /positions` — active positions for the check-in form.

use axum::{Json, extract::State};
use gatelog_core::{position::Position, store::CheckInStore};

use crate::{AppState, error::ApiError};

/// `GET /positions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Position>>, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  let positions = state
    .store
    .list_positions(true)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(positions))
}
