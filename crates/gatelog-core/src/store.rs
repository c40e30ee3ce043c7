//! The [`CheckInStore`] trait and its supporting query types.
//!
//! Storage backends implement this trait; the services in this crate and
//! the HTTP layer depend on the abstraction, never on a concrete backend.

use std::{collections::BTreeMap, future::Future};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  position::{NewPosition, Position},
  record::{CheckInRecord, NewCheckIn},
};

// ─── Query Types ─────────────────────────────────────────────────────────────

/// Independently optional predicates for the attendance report. Present
/// predicates AND-compose; an empty filter matches every record.
#[derive(Clone, Debug, Default)]
pub struct ReportFilter {
  /// Inclusive lower bound: records from local midnight of this date on.
  pub start_date:    Option<NaiveDate>,
  /// Inclusive upper bound: records strictly before the next local
  /// midnight, so the whole end date is covered.
  pub end_date:      Option<NaiveDate>,
  /// Exact match against the stored position string. `"All"` is a
  /// sentinel meaning "no filter"; see [`ReportFilter::position`].
  pub position_type: Option<String>,
  /// Case-insensitive substring match against person IDs.
  pub person_id:     Option<String>,
}

impl ReportFilter {
  /// The effective position predicate. Unset, empty, and the `"All"`
  /// sentinel all mean "no filter".
  pub fn position(&self) -> Option<&str> {
    match self.position_type.as_deref() {
      None | Some("") | Some("All") => None,
      Some(position) => Some(position),
    }
  }
}

/// A half-open window `[since, until)` over check-in times. Either bound
/// may be absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeRange {
  pub since: Option<DateTime<Utc>>,
  pub until: Option<DateTime<Utc>>,
}

impl TimeRange {
  pub fn since(since: DateTime<Utc>) -> Self {
    Self { since: Some(since), until: None }
  }
}

/// Result of an insert attempt. The one-open-session rule is enforced by
/// the store itself, so losing the check-then-insert race is a domain
/// outcome rather than a storage failure.
#[derive(Clone, Debug)]
pub enum InsertOutcome {
  Inserted(CheckInRecord),
  /// The person already has an open session. Carries the open record so
  /// the caller can surface its `check_in_time`.
  OpenSessionExists(CheckInRecord),
}

// ─── Store Trait ─────────────────────────────────────────────────────────────

/// Abstraction over a gatelog storage backend.
///
/// All methods return `Send` futures so implementations can be driven from
/// multi-threaded async runtimes.
pub trait CheckInStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new check-in, assigning `record_id` and the bookkeeping
  /// timestamps. Must atomically refuse a second open session for the
  /// same person and report it as [`InsertOutcome::OpenSessionExists`].
  fn insert_check_in(
    &self,
    new: NewCheckIn,
  ) -> impl Future<Output = Result<InsertOutcome, Self::Error>> + Send + '_;

  /// The open session for `person_id`, if any. At most one may exist;
  /// finding several is an invariant violation the backend must report as
  /// an error rather than resolve silently.
  fn find_open_session<'a>(
    &'a self,
    person_id: &'a str,
  ) -> impl Future<Output = Result<Option<CheckInRecord>, Self::Error>> + Send + 'a;

  /// Records matching `filter`, newest check-in first.
  fn find_by_filter<'a>(
    &'a self,
    filter: &'a ReportFilter,
  ) -> impl Future<Output = Result<Vec<CheckInRecord>, Self::Error>> + Send + 'a;

  /// Count of records with `check_in_time >= since`.
  fn count_checked_in_since(
    &self,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Count of open sessions, irrespective of when they started.
  fn count_open_sessions(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Record counts per stored position string, restricted to `range`.
  /// Positions with no records in range are absent from the map.
  fn aggregate_count_by_position<'a>(
    &'a self,
    range: &'a TimeRange,
  ) -> impl Future<Output = Result<BTreeMap<String, i64>, Self::Error>> + Send + 'a;

  /// All open sessions, newest check-in first.
  fn list_open_sessions(
    &self,
  ) -> impl Future<Output = Result<Vec<CheckInRecord>, Self::Error>> + Send + '_;

  /// List registry positions; with `active_only`, soft-deleted entries
  /// are skipped.
  fn list_positions(
    &self,
    active_only: bool,
  ) -> impl Future<Output = Result<Vec<Position>, Self::Error>> + Send + '_;

  /// Create a position. New positions start active.
  fn create_position(
    &self,
    new: NewPosition,
  ) -> impl Future<Output = Result<Position, Self::Error>> + Send + '_;

  /// Soft-delete a position, returning it as stored afterwards. Errors if
  /// `id` names no position.
  fn deactivate_position(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Position, Self::Error>> + Send + '_;
}
