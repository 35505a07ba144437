//! Error types for outbound providers and the open-answer surface.
//!
//! Provider errors are recovered locally (fallback content); only `MalformedInput`
//! ever reaches the client, as HTTP 400.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use reqwest::StatusCode as UpstreamStatus;

use crate::protocol::ErrorOut;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
  #[error("generation request timed out")]
  Timeout,

  #[error("upstream returned error: status={status} message={message}")]
  Upstream { status: UpstreamStatus, message: String },

  #[error("upstream returned no generated text")]
  EmptyGeneration,

  #[error("request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("invalid response JSON: {0}")]
  InvalidJson(#[from] serde_json::Error),
}

impl GenerationError {
  /// Map transport errors that are really deadline hits onto `Timeout`.
  pub fn from_transport(e: reqwest::Error) -> Self {
    if e.is_timeout() { GenerationError::Timeout } else { GenerationError::Request(e) }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum PlaybookError {
  #[error("malformed input: {0}")]
  MalformedInput(String),
}

impl IntoResponse for PlaybookError {
  fn into_response(self) -> Response {
    let status = match &self {
      PlaybookError::MalformedInput(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}
