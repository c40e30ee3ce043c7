//! The check-in service: validates a submission, enforces the
//! one-open-session rule, and records the visit.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  record::{CheckInRecord, NewCheckIn, PositionType},
  store::{CheckInStore, InsertOutcome},
};

/// Location stamped on records when the submission does not name one.
pub const DEFAULT_LOCATION: &str = "Main Entrance";

// ─── Request / Summary ───────────────────────────────────────────────────────

/// A raw check-in submission. `position` arrives as a string and is
/// validated into a [`PositionType`] here, at the service boundary; nothing
/// past this point handles unvalidated position values.
#[derive(Clone, Debug, Default)]
pub struct CheckInRequest {
  pub person_id: String,
  pub position:  String,
  pub full_name: Option<String>,
  pub purpose:   Option<String>,
  pub location:  Option<String>,
}

/// What a successful check-in returns: a summary of the stored record, not
/// the full document.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSummary {
  #[serde(rename = "id")]
  pub record_id:     Uuid,
  #[serde(rename = "userIdNumber")]
  pub person_id:     String,
  pub position:      PositionType,
  pub check_in_time: DateTime<Utc>,
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure modes of [`check_in`]. `Validation` and `Conflict` carry the
/// client-facing message; `Store` wraps the backend's own error.
#[derive(Debug, Error)]
pub enum CheckInError<E> {
  #[error("{0}")]
  Validation(String),

  #[error("User {person_id} is already checked in since {}", .since.to_rfc3339())]
  Conflict {
    person_id: String,
    /// `check_in_time` of the record that is already open.
    since:     DateTime<Utc>,
  },

  #[error("store error: {0}")]
  Store(#[source] E),
}

impl<E> CheckInError<E> {
  fn conflict(open: &CheckInRecord) -> Self {
    CheckInError::Conflict {
      person_id: open.person_id.clone(),
      since:     open.check_in_time,
    }
  }
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Validate `request` and record the check-in.
///
/// The order of checks is fixed: required fields, then position validity,
/// then the purpose rule, then the open-session check. The pre-read of the
/// open session exists to surface its timestamp in the conflict message;
/// the insert itself re-enforces the invariant, so a submission that loses
/// the race between read and insert still comes back as
/// [`CheckInError::Conflict`].
pub async fn check_in<S: CheckInStore>(
  store: &S,
  request: CheckInRequest,
) -> Result<CheckInSummary, CheckInError<S::Error>> {
  if request.person_id.is_empty() || request.position.is_empty() {
    return Err(CheckInError::Validation(
      "ID number and position are required".to_string(),
    ));
  }

  let position = request.position.parse::<PositionType>().map_err(|_| {
    CheckInError::Validation(format!(
      "unknown position type: {:?}",
      request.position
    ))
  })?;

  let has_purpose = request.purpose.as_deref().is_some_and(|p| !p.is_empty());
  if position.requires_purpose() && !has_purpose {
    return Err(CheckInError::Validation(
      "Purpose is required for Students and Visitors".to_string(),
    ));
  }

  if let Some(open) = store
    .find_open_session(&request.person_id)
    .await
    .map_err(CheckInError::Store)?
  {
    return Err(CheckInError::conflict(&open));
  }

  let new = NewCheckIn {
    person_id:     request.person_id,
    position,
    full_name:     request.full_name,
    purpose:       request.purpose,
    location:      request
      .location
      .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
    check_in_time: Utc::now(),
  };

  match store.insert_check_in(new).await.map_err(CheckInError::Store)? {
    InsertOutcome::Inserted(record) => Ok(CheckInSummary {
      record_id:     record.record_id,
      person_id:     record.person_id,
      position:      record.position,
      check_in_time: record.check_in_time,
    }),
    // A concurrent submission won between the pre-read and the insert.
    InsertOutcome::OpenSessionExists(open) => Err(CheckInError::conflict(&open)),
  }
}
