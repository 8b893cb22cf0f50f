//! Handler for `GET /statements`.
//!
//! Query parameters are validated by [`StatementQuery`]. Repeated keys
//! (`?verb=a&verb=b`) are collected into arrays; `agent` is JSON text.
//! Storage is not part of this service, so a valid query always answers with
//! an empty result page and the normalised query.

use axum::{Json, extract::Query};
use serde::Serialize;
use xapi_core::StatementQuery;

use crate::error::ApiError;

/// Response body for `GET /statements`.
#[derive(Debug, Serialize)]
pub struct StatementResult {
  pub statements: Vec<serde_json::Value>,
  /// IRL of the next page; empty when there is none.
  pub more:       String,
  /// The parameters after validation and defaulting.
  pub query:      StatementQuery,
}

/// `GET /statements[?statementId=...][&agent=...][&limit=...]...`
pub async fn list(
  Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<StatementResult>, ApiError> {
  let query = StatementQuery::from_pairs(pairs).map_err(|error| {
    tracing::debug!(
      path = %error.path(),
      kind = %error.kind(),
      "rejected statement query: {error}"
    );
    ApiError::query(error)
  })?;

  tracing::debug!(?query, "statement query accepted");
  Ok(Json(StatementResult {
    statements: Vec::new(),
    more: String::new(),
    query,
  }))
}
