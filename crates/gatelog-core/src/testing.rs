//! In-memory [`CheckInStore`] used by the service tests.

use std::{collections::BTreeMap, sync::Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  Error,
  position::{NewPosition, Position},
  record::{CheckInRecord, NewCheckIn, PositionType},
  store::{CheckInStore, InsertOutcome, ReportFilter, TimeRange},
  time,
};

/// Store double backed by plain `Vec`s. Honours the same storage-level
/// open-session guarantee as a real backend; `hide_open_from_find`
/// simulates losing the check-then-insert race by making
/// `find_open_session` report nothing while the insert still refuses.
#[derive(Default)]
pub struct MemStore {
  pub records:             Mutex<Vec<CheckInRecord>>,
  pub positions:           Mutex<Vec<Position>>,
  pub hide_open_from_find: bool,
}

impl MemStore {
  /// Insert an open record directly, bypassing the check-in service.
  pub fn seed_record(
    &self,
    person_id: &str,
    position: PositionType,
    check_in_time: DateTime<Utc>,
  ) -> CheckInRecord {
    let record = CheckInRecord {
      record_id: Uuid::new_v4(),
      person_id: person_id.to_string(),
      position,
      full_name: None,
      purpose: Some("Study".to_string()),
      location: "Main Entrance".to_string(),
      check_in_time,
      check_out_time: None,
      created_at: check_in_time,
      updated_at: check_in_time,
    };
    self.records.lock().unwrap().push(record.clone());
    record
  }

  /// Close a session directly; no public operation does this.
  pub fn close_session(&self, record_id: Uuid) {
    let mut records = self.records.lock().unwrap();
    let record = records
      .iter_mut()
      .find(|r| r.record_id == record_id)
      .expect("close_session: unknown record");
    record.check_out_time = Some(Utc::now());
    record.updated_at = Utc::now();
  }
}

impl CheckInStore for MemStore {
  type Error = Error;

  async fn insert_check_in(&self, new: NewCheckIn) -> Result<InsertOutcome, Error> {
    let mut records = self.records.lock().unwrap();
    if let Some(open) =
      records.iter().find(|r| r.person_id == new.person_id && r.is_open())
    {
      return Ok(InsertOutcome::OpenSessionExists(open.clone()));
    }

    let now = Utc::now();
    let record = CheckInRecord {
      record_id: Uuid::new_v4(),
      person_id: new.person_id,
      position: new.position,
      full_name: new.full_name,
      purpose: new.purpose,
      location: new.location,
      check_in_time: new.check_in_time,
      check_out_time: None,
      created_at: now,
      updated_at: now,
    };
    records.push(record.clone());
    Ok(InsertOutcome::Inserted(record))
  }

  async fn find_open_session(
    &self,
    person_id: &str,
  ) -> Result<Option<CheckInRecord>, Error> {
    if self.hide_open_from_find {
      return Ok(None);
    }
    Ok(
      self
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.person_id == person_id && r.is_open())
        .cloned(),
    )
  }

  async fn find_by_filter(
    &self,
    filter: &ReportFilter,
  ) -> Result<Vec<CheckInRecord>, Error> {
    let since = filter.start_date.map(time::local_day_start);
    let until = filter.end_date.map(time::local_day_end);
    let needle = filter.person_id.as_deref().map(str::to_lowercase);

    let mut matched: Vec<CheckInRecord> = self
      .records
      .lock()
      .unwrap()
      .iter()
      .filter(|r| since.map_or(true, |s| r.check_in_time >= s))
      .filter(|r| until.map_or(true, |u| r.check_in_time < u))
      .filter(|r| filter.position().map_or(true, |p| r.position.as_str() == p))
      .filter(|r| {
        needle
          .as_deref()
          .map_or(true, |n| r.person_id.to_lowercase().contains(n))
      })
      .cloned()
      .collect();
    matched.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
    Ok(matched)
  }

  async fn count_checked_in_since(&self, since: DateTime<Utc>) -> Result<i64, Error> {
    let count = self
      .records
      .lock()
      .unwrap()
      .iter()
      .filter(|r| r.check_in_time >= since)
      .count();
    Ok(count as i64)
  }

  async fn count_open_sessions(&self) -> Result<i64, Error> {
    let count = self.records.lock().unwrap().iter().filter(|r| r.is_open()).count();
    Ok(count as i64)
  }

  async fn aggregate_count_by_position(
    &self,
    range: &TimeRange,
  ) -> Result<BTreeMap<String, i64>, Error> {
    let mut counts = BTreeMap::new();
    for record in self.records.lock().unwrap().iter() {
      if range.since.map_or(true, |s| record.check_in_time >= s)
        && range.until.map_or(true, |u| record.check_in_time < u)
      {
        *counts.entry(record.position.as_str().to_string()).or_insert(0) += 1;
      }
    }
    Ok(counts)
  }

  async fn list_open_sessions(&self) -> Result<Vec<CheckInRecord>, Error> {
    let mut open: Vec<CheckInRecord> = self
      .records
      .lock()
      .unwrap()
      .iter()
      .filter(|r| r.is_open())
      .cloned()
      .collect();
    open.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));
    Ok(open)
  }

  async fn list_positions(&self, active_only: bool) -> Result<Vec<Position>, Error> {
    Ok(
      self
        .positions
        .lock()
        .unwrap()
        .iter()
        .filter(|p| !active_only || p.is_active)
        .cloned()
        .collect(),
    )
  }

  async fn create_position(&self, new: NewPosition) -> Result<Position, Error> {
    let position = Position {
      position_id:   Uuid::new_v4(),
      name:          new.name,
      position_type: new.position_type,
      is_active:     true,
    };
    self.positions.lock().unwrap().push(position.clone());
    Ok(position)
  }

  async fn deactivate_position(&self, id: Uuid) -> Result<Position, Error> {
    let mut positions = self.positions.lock().unwrap();
    let position = positions
      .iter_mut()
      .find(|p| p.position_id == id)
      .ok_or(Error::PositionNotFound(id))?;
    position.is_active = false;
    Ok(position.clone())
  }
}
