//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 UTC strings, which order the same
//! lexicographically as chronologically, so SQL range comparisons work on
//! the raw text. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use gatelog_core::{
  position::Position,
  record::{CheckInRecord, PositionType},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `check_ins` row.
pub struct RawCheckInRecord {
  pub record_id:      String,
  pub person_id:      String,
  pub position:       String,
  pub full_name:      Option<String>,
  pub purpose:        Option<String>,
  pub location:       String,
  pub check_in_time:  String,
  pub check_out_time: Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawCheckInRecord {
  /// Read one row; column order must match `RECORD_COLUMNS` in `store.rs`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:      row.get(0)?,
      person_id:      row.get(1)?,
      position:       row.get(2)?,
      full_name:      row.get(3)?,
      purpose:        row.get(4)?,
      location:       row.get(5)?,
      check_in_time:  row.get(6)?,
      check_out_time: row.get(7)?,
      created_at:     row.get(8)?,
      updated_at:     row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<CheckInRecord> {
    Ok(CheckInRecord {
      record_id:      decode_uuid(&self.record_id)?,
      person_id:      self.person_id,
      position:       self.position.parse::<PositionType>()?,
      full_name:      self.full_name,
      purpose:        self.purpose,
      location:       self.location,
      check_in_time:  decode_dt(&self.check_in_time)?,
      check_out_time: self
        .check_out_time
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `positions` row.
pub struct RawPosition {
  pub position_id:   String,
  pub name:          String,
  pub position_type: String,
  pub is_active:     bool,
}

impl RawPosition {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      position_id:   row.get(0)?,
      name:          row.get(1)?,
      position_type: row.get(2)?,
      is_active:     row.get(3)?,
    })
  }

  pub fn into_position(self) -> Result<Position> {
    Ok(Position {
      position_id:   decode_uuid(&self.position_id)?,
      name:          self.name,
      position_type: self.position_type.parse::<PositionType>()?,
      is_active:     self.is_active,
    })
  }
}
