//! Day-boundary helpers.
//!
//! Date-granularity comparisons (the dashboard's "today", the report's
//! start and end dates) are anchored to the server's local midnight and
//! converted to UTC instants for comparison against stored timestamps.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Local midnight at the start of `date`, as a UTC instant.
pub fn local_day_start(date: NaiveDate) -> DateTime<Utc> {
  let midnight = date.and_time(NaiveTime::MIN);
  match Local.from_local_datetime(&midnight) {
    LocalResult::Single(dt) => dt.with_timezone(&Utc),
    // DST fold: take the earlier reading.
    LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
    // DST gap: midnight does not exist locally; read it as UTC.
    LocalResult::None => Utc.from_utc_datetime(&midnight),
  }
}

/// Local midnight at the start of the day after `date`. Used as an
/// exclusive upper bound, which makes `date` itself fully included.
pub fn local_day_end(date: NaiveDate) -> DateTime<Utc> {
  date
    .checked_add_days(Days::new(1))
    .map(local_day_start)
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Start of the current local day.
pub fn start_of_today() -> DateTime<Utc> {
  local_day_start(Local::now().date_naive())
}
