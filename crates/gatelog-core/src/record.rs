//! Check-in records.
//!
//! A record is created when a person checks in at an entrance. A record
//! whose `check_out_time` is absent is an *open session*: the person is
//! counted as currently on campus. No operation in the current design
//! closes a session; closed records can only predate this system or be
//! written by future tooling.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ─── Position Types ──────────────────────────────────────────────────────────

/// The role a person checks in under. Stored and transmitted as the
/// capitalised strings `"Student"`, `"Staff"`, and `"Visitor"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionType {
  Student,
  Staff,
  Visitor,
}

impl PositionType {
  pub const ALL: [PositionType; 3] =
    [PositionType::Student, PositionType::Staff, PositionType::Visitor];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Student => "Student",
      Self::Staff => "Staff",
      Self::Visitor => "Visitor",
    }
  }

  /// Whether a check-in under this position must state a purpose.
  /// Students and visitors explain their presence; staff do not.
  pub fn requires_purpose(self) -> bool {
    match self {
      Self::Student | Self::Visitor => true,
      Self::Staff => false,
    }
  }
}

impl FromStr for PositionType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Student" => Ok(Self::Student),
      "Staff" => Ok(Self::Staff),
      "Visitor" => Ok(Self::Visitor),
      other => Err(Error::UnknownPositionType(other.to_string())),
    }
  }
}

impl std::fmt::Display for PositionType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// One check-in event.
///
/// Serialises to the wire contract's camelCase names; `record_id` travels
/// as `id` and `person_id` as `userIdNumber`. Optional fields are omitted
/// from JSON when absent rather than sent as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
  #[serde(rename = "id")]
  pub record_id:      Uuid,
  #[serde(rename = "userIdNumber")]
  pub person_id:      String,
  pub position:       PositionType,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub full_name:      Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub purpose:        Option<String>,
  pub location:       String,
  pub check_in_time:  DateTime<Utc>,
  /// Absent while the session is open.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub check_out_time: Option<DateTime<Utc>>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl CheckInRecord {
  /// An open session is a record that has not been checked out.
  pub fn is_open(&self) -> bool {
    self.check_out_time.is_none()
  }
}

/// Input to [`crate::store::CheckInStore::insert_check_in`].
///
/// `check_in_time` is stamped by the check-in service; `record_id` and the
/// bookkeeping timestamps are assigned by the store.
#[derive(Clone, Debug)]
pub struct NewCheckIn {
  pub person_id:     String,
  pub position:      PositionType,
  pub full_name:     Option<String>,
  pub purpose:       Option<String>,
  pub location:      String,
  pub check_in_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn position_type_round_trips_through_str() {
    for position in PositionType::ALL {
      assert_eq!(position.as_str().parse::<PositionType>(), Ok(position));
    }
  }

  #[test]
  fn unknown_position_type_is_rejected() {
    assert_eq!(
      "Lecturer".parse::<PositionType>(),
      Err(Error::UnknownPositionType("Lecturer".to_string()))
    );
    // case matters; the wire strings are capitalised
    assert!("student".parse::<PositionType>().is_err());
  }

  #[test]
  fn purpose_rule_matches_the_rule_table() {
    assert!(PositionType::Student.requires_purpose());
    assert!(PositionType::Visitor.requires_purpose());
    assert!(!PositionType::Staff.requires_purpose());
  }

  #[test]
  fn record_serialises_with_wire_names() {
    let record = CheckInRecord {
      record_id:      Uuid::nil(),
      person_id:      "S100".to_string(),
      position:       PositionType::Student,
      full_name:      Some("Ada Lovelace".to_string()),
      purpose:        Some("Study".to_string()),
      location:       "Main Entrance".to_string(),
      check_in_time:  Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
      check_out_time: None,
      created_at:     Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
      updated_at:     Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap(),
    };

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    assert_eq!(json["userIdNumber"], "S100");
    assert_eq!(json["position"], "Student");
    assert_eq!(json["fullName"], "Ada Lovelace");
    assert_eq!(json["location"], "Main Entrance");
    assert!(json.get("checkInTime").is_some());
    // open session: the field is omitted, not null
    assert!(json.get("checkOutTime").is_none());
  }
}
