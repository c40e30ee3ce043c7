//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client-facing failures carry their message into the `{"error": …}`
//! body. Backend failures are logged and reduced to a generic 500 so
//! internal details never reach a caller.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use gatelog_core::checkin::CheckInError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// A rejected check-in submission or malformed query parameter.
  #[error("{0}")]
  Validation(String),

  /// The person already has an open session.
  #[error("{0}")]
  Conflict(String),

  #[error("Unauthorized")]
  Unauthorized,

  /// `GET /admin` with a missing or unrecognised `action`.
  #[error("Invalid action")]
  InvalidAction,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a check-in service failure onto the HTTP taxonomy.
  pub fn from_check_in<E>(err: CheckInError<E>) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    match err {
      CheckInError::Validation(message) => ApiError::Validation(message),
      conflict @ CheckInError::Conflict { .. } => {
        ApiError::Conflict(conflict.to_string())
      }
      CheckInError::Store(e) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Validation(m) | ApiError::Conflict(m) => {
        (StatusCode::BAD_REQUEST, m)
      }
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "Unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"gatelog\""),
        );
        return res;
      }
      ApiError::InvalidAction => {
        (StatusCode::BAD_REQUEST, "Invalid action".to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "Internal server error".to_string(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
