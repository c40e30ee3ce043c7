//! [`SqliteStore`] — the SQLite implementation of [`CheckInStore`].

use std::{collections::BTreeMap, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gatelog_core::{
  position::{NewPosition, Position},
  record::{CheckInRecord, NewCheckIn},
  store::{CheckInStore, InsertOutcome, ReportFilter, TimeRange},
  time,
};

use crate::{
  encode::{encode_dt, encode_uuid, RawCheckInRecord, RawPosition},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gatelog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const RECORD_COLUMNS: &str = "record_id, person_id, position, full_name, \
   purpose, location, check_in_time, check_out_time, created_at, updated_at";

const POSITION_COLUMNS: &str = "position_id, name, type, is_active";

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// All open rows for `person_id`. The partial unique index caps this at
  /// one for rows written by this store; data imported from elsewhere may
  /// not comply, which is why callers still see a `Vec`.
  async fn open_rows_for_person(&self, person_id: String) -> Result<Vec<CheckInRecord>> {
    let raws: Vec<RawCheckInRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM check_ins
           WHERE person_id = ?1 AND check_out_time IS NULL"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawCheckInRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCheckInRecord::into_record).collect()
  }

  /// Close a session directly. Query tests need closed records and no
  /// public operation writes `check_out_time`.
  #[cfg(test)]
  pub(crate) async fn mark_checked_out(
    &self,
    record_id: Uuid,
    at: DateTime<Utc>,
  ) -> Result<()> {
    let id_str      = encode_uuid(record_id);
    let out_str     = encode_dt(at);
    let updated_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE check_ins SET check_out_time = ?1, updated_at = ?2
           WHERE record_id = ?3",
          rusqlite::params![out_str, updated_str, id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// True when an INSERT bounced off the partial unique index that guards the
/// one-open-session rule.
fn is_open_session_conflict(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(err, Some(msg))
      if err.code == rusqlite::ErrorCode::ConstraintViolation
        && msg.contains("person_id")
  )
}

// ─── CheckInStore impl ───────────────────────────────────────────────────────

impl CheckInStore for SqliteStore {
  type Error = Error;

  // ── Check-ins ─────────────────────────────────────────────────────────────

  async fn insert_check_in(&self, new: NewCheckIn) -> Result<InsertOutcome> {
    let now = Utc::now();
    let record = CheckInRecord {
      record_id:      Uuid::new_v4(),
      person_id:      new.person_id,
      position:       new.position,
      full_name:      new.full_name,
      purpose:        new.purpose,
      location:       new.location,
      check_in_time:  new.check_in_time,
      check_out_time: None,
      created_at:     now,
      updated_at:     now,
    };

    let id_str      = encode_uuid(record.record_id);
    let person_id   = record.person_id.clone();
    let position    = record.position.as_str().to_owned();
    let full_name   = record.full_name.clone();
    let purpose     = record.purpose.clone();
    let location    = record.location.clone();
    let in_str      = encode_dt(record.check_in_time);
    let created_str = encode_dt(record.created_at);
    let updated_str = encode_dt(record.updated_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let result = conn.execute(
          "INSERT INTO check_ins (
             record_id, person_id, position, full_name, purpose, location,
             check_in_time, check_out_time, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)",
          rusqlite::params![
            id_str,
            person_id,
            position,
            full_name,
            purpose,
            location,
            in_str,
            created_str,
            updated_str,
          ],
        );

        match result {
          Ok(_) => Ok(true),
          Err(e) if is_open_session_conflict(&e) => Ok(false),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    if inserted {
      return Ok(InsertOutcome::Inserted(record));
    }

    // Lost the race: another check-in holds the open slot for this person.
    match self.find_open_session(&record.person_id).await? {
      Some(open) => Ok(InsertOutcome::OpenSessionExists(open)),
      None => Err(Error::OpenSessionInvariant(record.person_id)),
    }
  }

  async fn find_open_session(&self, person_id: &str) -> Result<Option<CheckInRecord>> {
    let mut rows = self.open_rows_for_person(person_id.to_owned()).await?;
    match rows.len() {
      0 => Ok(None),
      1 => Ok(rows.pop()),
      _ => Err(Error::OpenSessionInvariant(person_id.to_owned())),
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_by_filter(&self, filter: &ReportFilter) -> Result<Vec<CheckInRecord>> {
    // Date bounds become UTC instants here; the SQL compares RFC 3339 text.
    let since_str  = filter.start_date.map(time::local_day_start).map(encode_dt);
    let until_str  = filter.end_date.map(time::local_day_end).map(encode_dt);
    let position   = filter.position().map(str::to_owned);
    let person_pat = filter.person_id.as_deref().map(|p| format!("%{p}%"));

    let raws: Vec<RawCheckInRecord> = self
      .conn
      .call(move |conn| {
        // Build WHERE clause and parameter list together.
        let mut conds: Vec<&'static str> = vec![];
        let mut params: Vec<&dyn rusqlite::ToSql> = vec![];
        if let Some(since) = &since_str {
          conds.push("check_in_time >= ?");
          params.push(since);
        }
        if let Some(until) = &until_str {
          conds.push("check_in_time < ?");
          params.push(until);
        }
        if let Some(position) = &position {
          conds.push("position = ?");
          params.push(position);
        }
        if let Some(pattern) = &person_pat {
          // LIKE is case-insensitive for ASCII
          conds.push("person_id LIKE ?");
          params.push(pattern);
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT {RECORD_COLUMNS} FROM check_ins
           {where_clause}
           ORDER BY check_in_time DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(&params[..], RawCheckInRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCheckInRecord::into_record).collect()
  }

  async fn count_checked_in_since(&self, since: DateTime<Utc>) -> Result<i64> {
    let since_str = encode_dt(since);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM check_ins WHERE check_in_time >= ?1",
          rusqlite::params![since_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count)
  }

  async fn count_open_sessions(&self) -> Result<i64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM check_ins WHERE check_out_time IS NULL",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count)
  }

  async fn aggregate_count_by_position(
    &self,
    range: &TimeRange,
  ) -> Result<BTreeMap<String, i64>> {
    let since_str = range.since.map(encode_dt);
    let until_str = range.until.map(encode_dt);

    let pairs: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        let mut params: Vec<&dyn rusqlite::ToSql> = vec![];
        if let Some(since) = &since_str {
          conds.push("check_in_time >= ?");
          params.push(since);
        }
        if let Some(until) = &until_str {
          conds.push("check_in_time < ?");
          params.push(until);
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT position, COUNT(*) FROM check_ins
           {where_clause}
           GROUP BY position"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(&params[..], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    Ok(pairs.into_iter().collect())
  }

  async fn list_open_sessions(&self) -> Result<Vec<CheckInRecord>> {
    let raws: Vec<RawCheckInRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS} FROM check_ins
           WHERE check_out_time IS NULL
           ORDER BY check_in_time DESC"
        ))?;
        let rows = stmt
          .query_map([], RawCheckInRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCheckInRecord::into_record).collect()
  }

  // ── Positions ─────────────────────────────────────────────────────────────

  async fn list_positions(&self, active_only: bool) -> Result<Vec<Position>> {
    let raws: Vec<RawPosition> = self
      .conn
      .call(move |conn| {
        let sql = if active_only {
          format!(
            "SELECT {POSITION_COLUMNS} FROM positions
             WHERE is_active = 1 ORDER BY name"
          )
        } else {
          format!("SELECT {POSITION_COLUMNS} FROM positions ORDER BY name")
        };

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPosition::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPosition::into_position).collect()
  }

  async fn create_position(&self, new: NewPosition) -> Result<Position> {
    let position = Position {
      position_id:   Uuid::new_v4(),
      name:          new.name,
      position_type: new.position_type,
      is_active:     true,
    };

    let id_str   = encode_uuid(position.position_id);
    let name     = position.name.clone();
    let type_str = position.position_type.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO positions (position_id, name, type, is_active)
           VALUES (?1, ?2, ?3, 1)",
          rusqlite::params![id_str, name, type_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(position)
  }

  async fn deactivate_position(&self, id: Uuid) -> Result<Position> {
    let id_str = encode_uuid(id);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE positions SET is_active = 0 WHERE position_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PositionNotFound(id));
    }

    let id_str = encode_uuid(id);
    let raw: Option<RawPosition> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1"),
              rusqlite::params![id_str],
              RawPosition::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some(raw) => raw.into_position(),
      None => Err(Error::PositionNotFound(id)),
    }
  }
}
