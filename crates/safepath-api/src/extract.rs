//! Request decoding helpers.
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the `Query` equivalent)
//! and pass it through these so decode failures answer with the same JSON
//! error body as every other rejection.

use axum::{
  Json,
  extract::{
    Query,
    rejection::{JsonRejection, QueryRejection},
  },
};

use crate::error::ApiError;

/// Unwrap a JSON body, mapping rejections to [`ApiError::MalformedBody`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  result
    .map(|Json(v)| v)
    .map_err(|err| ApiError::MalformedBody(err.body_text()))
}

/// Unwrap a query string, mapping rejections to [`ApiError::MalformedBody`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
  result
    .map(|Query(v)| v)
    .map_err(|err| ApiError::MalformedBody(err.body_text()))
}
