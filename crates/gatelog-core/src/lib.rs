//! Core types and services for the gatelog check-in tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the domain model ([`record`], [`position`]), the storage
//! abstraction ([`store::CheckInStore`]), and the two services that contain
//! all business rules: [`checkin`] for writes and [`report`] for reads.

pub mod checkin;
pub mod error;
pub mod position;
pub mod record;
pub mod report;
pub mod store;
pub mod time;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
