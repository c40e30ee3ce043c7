//! Error type for `gatelog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] gatelog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Several open sessions for one person, or an open row that vanished
  /// mid-conflict. Either way the storage invariant does not hold.
  #[error("open-session invariant violated for person {0:?}")]
  OpenSessionInvariant(String),

  #[error("position not found: {0}")]
  PositionNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
