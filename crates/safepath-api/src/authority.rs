//! Authority identification via the `X-Authority-Id` header.
//!
//! Verifying that the caller really is that authority belongs to whatever sits
//! in front of this service; handlers only need the identifier.

use axum::{extract::FromRequestParts, http::request::Parts};
use safepath_core::zone::AuthorityId;

use crate::error::ApiError;

pub const AUTHORITY_HEADER: &str = "x-authority-id";

/// The calling authority. Rejects with 401 when the header is missing, blank,
/// or not valid UTF-8.
#[derive(Debug, Clone)]
pub struct Authority(pub AuthorityId);

impl<S> FromRequestParts<S> for Authority
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get(AUTHORITY_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|id| !id.is_empty())
      .map(|id| Authority(AuthorityId::new(id)))
      .ok_or(ApiError::Unauthorized)
  }
}
