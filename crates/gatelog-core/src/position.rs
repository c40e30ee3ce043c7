//! Position registry entries.
//!
//! Positions are the options offered on the check-in form, e.g. a
//! "Visiting Lecturer" entry of type `Staff`. A check-in record stores only
//! the position *type*, never a reference to a registry row, so editing the
//! registry cannot invalidate history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::PositionType;

/// A named position on the check-in form. Deactivation is a soft delete;
/// the row stays behind for historical display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
  #[serde(rename = "id")]
  pub position_id:   Uuid,
  pub name:          String,
  #[serde(rename = "type")]
  pub position_type: PositionType,
  pub is_active:     bool,
}

/// Input to [`crate::store::CheckInStore::create_position`].
#[derive(Clone, Debug)]
pub struct NewPosition {
  pub name:          String,
  pub position_type: PositionType,
}
