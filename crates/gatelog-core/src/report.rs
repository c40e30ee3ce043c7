//! The attendance query service: read-only aggregates over the record
//! store. Everything here is derived at query time; neither the dashboard
//! counters nor "currently on campus" are ever stored.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  record::CheckInRecord,
  store::{CheckInStore, ReportFilter, TimeRange},
  time,
};

// ─── Result Types ────────────────────────────────────────────────────────────

/// Aggregates for the admin dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  /// Records with a check-in time at or after today's local midnight.
  pub total_check_ins_today: i64,
  /// Open sessions irrespective of date: a session left open yesterday
  /// still counts as on campus.
  pub current_on_campus:     i64,
  /// Today's records grouped by their stored position value.
  pub check_ins_by_position: BTreeMap<String, i64>,
}

/// A filtered slice of history. The aggregates are computed from
/// `records`, never from the whole store, so they always describe exactly
/// what the caller is looking at.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceReport {
  pub records:               Vec<CheckInRecord>,
  pub total_check_ins:       i64,
  pub current_on_campus:     i64,
  pub check_ins_by_position: BTreeMap<String, i64>,
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Dashboard aggregates: today's activity plus the all-time on-campus
/// count.
pub async fn dashboard_stats<S: CheckInStore>(
  store: &S,
) -> Result<DashboardStats, S::Error> {
  let today = time::start_of_today();

  let total_check_ins_today = store.count_checked_in_since(today).await?;
  let current_on_campus = store.count_open_sessions().await?;
  let check_ins_by_position = store
    .aggregate_count_by_position(&TimeRange::since(today))
    .await?;

  Ok(DashboardStats {
    total_check_ins_today,
    current_on_campus,
    check_ins_by_position,
  })
}

/// Everyone currently on campus, newest check-in first.
pub async fn current_on_campus<S: CheckInStore>(
  store: &S,
) -> Result<Vec<CheckInRecord>, S::Error> {
  store.list_open_sessions().await
}

/// Filtered history plus aggregates recomputed from the filtered set.
pub async fn attendance_report<S: CheckInStore>(
  store: &S,
  filter: &ReportFilter,
) -> Result<AttendanceReport, S::Error> {
  let records = store.find_by_filter(filter).await?;

  let total_check_ins = records.len() as i64;
  let current_on_campus = records.iter().filter(|r| r.is_open()).count() as i64;

  let mut check_ins_by_position = BTreeMap::new();
  for record in &records {
    *check_ins_by_position
      .entry(record.position.as_str().to_string())
      .or_insert(0) += 1;
  }

  Ok(AttendanceReport {
    records,
    total_check_ins,
    current_on_campus,
    check_ins_by_position,
  })
}
