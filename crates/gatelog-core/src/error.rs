//! Error types for `gatelog-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unknown position type: {0:?}")]
  UnknownPositionType(String),

  #[error("position not found: {0}")]
  PositionNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
