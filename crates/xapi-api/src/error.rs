//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is a client error. The body names the failing field so a
//! caller can point at it:
//!
//! ```json
//! {
//!   "statusCode": 400,
//!   "error": "Bad Request",
//!   "message": "\"statementId\" must be a valid GUID",
//!   "validation": { "source": "query", "keys": ["statementId"] }
//! }
//! ```

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Which part of the request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPart {
  Query,
  Payload,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid {part:?}: {error}")]
  Validation {
    part:  RequestPart,
    #[source]
    error: xapi_core::Error,
  },

  #[error("malformed request body: {0}")]
  MalformedBody(String),
}

impl ApiError {
  pub fn query(error: xapi_core::Error) -> Self {
    Self::Validation {
      part: RequestPart::Query,
      error,
    }
  }

  pub fn payload(error: xapi_core::Error) -> Self {
    Self::Validation {
      part: RequestPart::Payload,
      error,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::MalformedBody(rejection.body_text())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = StatusCode::BAD_REQUEST;
    let (part, message, keys) = match &self {
      ApiError::Validation { part, error } => {
        let path = error.path();
        let keys = if path.is_root() {
          Vec::new()
        } else {
          vec![path.to_string()]
        };
        (*part, error.to_string(), keys)
      }
      ApiError::MalformedBody(m) => (RequestPart::Payload, m.clone(), Vec::new()),
    };
    let body = json!({
      "statusCode": status.as_u16(),
      "error": status.canonical_reason().unwrap_or("Bad Request"),
      "message": message,
      "validation": { "source": part, "keys": keys },
    });
    (status, Json(body)).into_response()
  }
}
