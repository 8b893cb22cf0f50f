//! Handler for `POST /actors`.
//!
//! Accepts any JSON body, resolves it as an Actor and returns the normalised
//! wire form (`objectType` filled in, only populated fields present).

use axum::{Json, extract::rejection::JsonRejection};
use serde_json::Value;
use xapi_core::Actor;

use crate::error::ApiError;

/// `POST /actors`, body: an Agent or Group object.
pub async fn normalize(
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Actor>, ApiError> {
  let Json(value) = body?;
  let actor = Actor::resolve(&value).map_err(|error| {
    tracing::debug!(
      path = %error.path(),
      kind = %error.kind(),
      "rejected actor: {error}"
    );
    ApiError::payload(error)
  })?;
  Ok(Json(actor))
}
