//! Handler for the public check-in endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/checkin` | Body: [`CheckInBody`]; no auth |

use axum::{Json, extract::State};
use gatelog_core::{
  checkin::{self, CheckInRequest, CheckInSummary},
  store::CheckInStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// JSON body accepted by `POST /checkin`. Every field is optional at the
/// deserialisation layer; presence rules are the check-in service's job, so
/// a missing field produces the contract's `{"error": …}` message instead
/// of a deserialiser rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInBody {
  #[serde(rename = "userIdNumber")]
  pub person_id: Option<String>,
  pub position:  Option<String>,
  pub full_name: Option<String>,
  pub purpose:   Option<String>,
  pub location:  Option<String>,
}

impl From<CheckInBody> for CheckInRequest {
  fn from(body: CheckInBody) -> Self {
    CheckInRequest {
      person_id: body.person_id.unwrap_or_default(),
      position:  body.position.unwrap_or_default(),
      full_name: body.full_name,
      purpose:   body.purpose,
      location:  body.location,
    }
  }
}

/// Response envelope for a successful check-in.
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
  pub message: String,
  pub record:  CheckInSummary,
}

/// `POST /checkin`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CheckInBody>,
) -> Result<Json<CheckInResponse>, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  let summary = checkin::check_in(state.store.as_ref(), CheckInRequest::from(body))
    .await
    .map_err(ApiError::from_check_in)?;

  Ok(Json(CheckInResponse {
    message: "Check-in successful".to_string(),
    record:  summary,
  }))
}
