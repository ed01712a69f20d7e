//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use safepath_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// Reason code for bodies and query strings that fail to decode.
pub const MALFORMED_BODY: &str = "malformed_body";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("missing or empty X-Authority-Id header")]
  Unauthorized,

  /// The body or query string could not be decoded into the expected shape.
  #[error("malformed request: {0}")]
  MalformedBody(String),

  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      ApiError::Core(e) => match e {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::ZoneNotFound(_) | CoreError::SubjectNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
        CoreError::OutOfOrderSample { .. } => StatusCode::CONFLICT,
        CoreError::CorruptZone { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!("request failed: {self}");
    }
    let body = match &self {
      ApiError::Core(CoreError::Validation(v)) => {
        json!({ "error": self.to_string(), "reason": v.reason() })
      }
      ApiError::MalformedBody(_) => {
        json!({ "error": self.to_string(), "reason": MALFORMED_BODY })
      }
      _ => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
