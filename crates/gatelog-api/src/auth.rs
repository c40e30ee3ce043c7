//! HTTP Basic-auth extractor for the admin surface.
//!
//! Requests carry `Authorization: Basic …` credentials, verified against a
//! configured argon2 hash. Handlers that take an [`AdminSession`] parameter
//! are unreachable without valid credentials.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::{AppState, error::ApiError};
use gatelog_core::store::CheckInStore;

/// Credentials accepted as the administrator for this server instance.
#[derive(Clone)]
pub struct AdminAuth {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Zero-size marker: present in a handler means the caller is the admin.
pub struct AdminSession;

/// Verify credentials directly from headers.
pub fn verify_session(headers: &HeaderMap, auth: &AdminAuth) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  if username != auth.username {
    return Err(ApiError::Unauthorized);
  }

  let parsed_hash =
    PasswordHash::new(&auth.password_hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for AdminSession
where
  S: CheckInStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_session(&parts.headers, &state.auth)?;
    Ok(AdminSession)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  use axum::http::{Request, header};

  use crate::AppState;

  // A minimal no-op store for testing auth only.
  #[derive(Clone)]
  struct NoopStore;

  impl CheckInStore for NoopStore {
    type Error = std::convert::Infallible;
    async fn insert_check_in(&self, _: gatelog_core::record::NewCheckIn) -> Result<gatelog_core::store::InsertOutcome, Self::Error> { unimplemented!() }
    async fn find_open_session(&self, _: &str) -> Result<Option<gatelog_core::record::CheckInRecord>, Self::Error> { unimplemented!() }
    async fn find_by_filter(&self, _: &gatelog_core::store::ReportFilter) -> Result<Vec<gatelog_core::record::CheckInRecord>, Self::Error> { unimplemented!() }
    async fn count_checked_in_since(&self, _: chrono::DateTime<chrono::Utc>) -> Result<i64, Self::Error> { unimplemented!() }
    async fn count_open_sessions(&self) -> Result<i64, Self::Error> { unimplemented!() }
    async fn aggregate_count_by_position(&self, _: &gatelog_core::store::TimeRange) -> Result<std::collections::BTreeMap<String, i64>, Self::Error> { unimplemented!() }
    async fn list_open_sessions(&self) -> Result<Vec<gatelog_core::record::CheckInRecord>, Self::Error> { unimplemented!() }
    async fn list_positions(&self, _: bool) -> Result<Vec<gatelog_core::position::Position>, Self::Error> { unimplemented!() }
    async fn create_position(&self, _: gatelog_core::position::NewPosition) -> Result<gatelog_core::position::Position, Self::Error> { unimplemented!() }
    async fn deactivate_position(&self, _: uuid::Uuid) -> Result<gatelog_core::position::Position, Self::Error> { unimplemented!() }
  }

  fn make_state(password: &str) -> AppState<NoopStore> {
    use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
    use rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(NoopStore),
      auth:  Arc::new(AdminAuth {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
    }
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<NoopStore>,
  ) -> Result<AdminSession, ApiError> {
    let (mut parts, _) = req.into_parts();
    AdminSession::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = make_state("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("admin", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(extract(req, &state).await.is_ok());
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = make_state("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("admin", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn wrong_username() {
    let state = make_state("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("root", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state("secret");
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = make_state("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(extract(req, &state).await, Err(ApiError::Unauthorized)));
  }
}
