//! JSON HTTP API for the gatelog check-in tracker.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gatelog_core::store::CheckInStore`]: the public check-in endpoint, the
//! Basic-auth admin query endpoint, and the position listing. TLS and
//! deployment concerns are the caller's responsibility.

pub mod admin;
pub mod auth;
pub mod checkin;
pub mod error;
pub mod positions;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use gatelog_core::store::CheckInStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AdminAuth;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub admin_username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub admin_password_hash: String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: CheckInStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AdminAuth>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the gatelog API router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/checkin", post(checkin::create::<S>))
    .route("/admin", get(admin::dispatch::<S>))
    .route("/positions", get(positions::list::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ───────────────────────────────────────────────────────
