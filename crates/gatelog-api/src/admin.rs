//! Handlers for `GET /admin` — the single admin query endpoint.
//!
//! The `action` query parameter selects the report:
//!
//! | `action` | Returns |
//! |----------|---------|
//! | `dashboard-stats` | today's aggregates |
//! | `current-on-campus` | all open sessions, newest first |
//! | `attendance-report` | filtered records plus recomputed aggregates |
//!
//! Anything else is a 400 `Invalid action`. Authentication happens before
//! dispatch, so an unauthenticated request never learns which actions
//! exist.

use axum::{
  Json,
  extract::{Query, State},
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use gatelog_core::{
  report,
  store::{CheckInStore, ReportFilter},
};
use serde::Deserialize;

use crate::{AppState, auth::AdminSession, error::ApiError};

// ─── Params ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct AdminParams {
  pub action: Option<String>,
  /// `YYYY-MM-DD`; attendance-report only.
  #[serde(rename = "startDate")]
  pub start_date:    Option<String>,
  /// `YYYY-MM-DD`; attendance-report only.
  #[serde(rename = "endDate")]
  pub end_date:      Option<String>,
  #[serde(rename = "positionType")]
  pub position_type: Option<String>,
  #[serde(rename = "userIdNumber")]
  pub person_id:     Option<String>,
}

/// Dates arrive as strings so a malformed value can produce a clean 400
/// instead of a deserialiser rejection. Empty means absent.
fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
  value
    .filter(|v| !v.is_empty())
    .map(|v| {
      NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation(format!("invalid {field}: expected YYYY-MM-DD"))
      })
    })
    .transpose()
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// `GET /admin?action=<action>[&startDate=…][&endDate=…][&positionType=…][&userIdNumber=…]`
pub async fn dispatch<S>(
  _session: AdminSession,
  State(state): State<AppState<S>>,
  Query(params): Query<AdminParams>,
) -> Result<Response, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  match params.action.as_deref() {
    Some("dashboard-stats") => dashboard_stats(&state).await,
    Some("current-on-campus") => current_on_campus(&state).await,
    Some("attendance-report") => attendance_report(&state, params).await,
    _ => Err(ApiError::InvalidAction),
  }
}

async fn dashboard_stats<S>(state: &AppState<S>) -> Result<Response, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  let stats = report::dashboard_stats(state.store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(stats).into_response())
}

async fn current_on_campus<S>(state: &AppState<S>) -> Result<Response, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  let records = report::current_on_campus(state.store.as_ref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records).into_response())
}

async fn attendance_report<S>(
  state: &AppState<S>,
  params: AdminParams,
) -> Result<Response, ApiError>
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  let filter = ReportFilter {
    start_date:    parse_date("startDate", params.start_date.as_deref())?,
    end_date:      parse_date("endDate", params.end_date.as_deref())?,
    position_type: params.position_type,
    // an empty person filter matches everything; treat it as absent
    person_id:     params.person_id.filter(|p| !p.is_empty()),
  };

  let report = report::attendance_report(state.store.as_ref(), &filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(report).into_response())
}
