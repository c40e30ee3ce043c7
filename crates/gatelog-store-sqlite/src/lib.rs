//! SQLite backend for the gatelog check-in store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The one-open-session rule is
//! enforced inside the database by a partial unique index, which makes the
//! insert the atomic arbiter of concurrent check-ins.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
