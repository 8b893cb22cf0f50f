//! JSON HTTP boundary for the xAPI Actor validation engine.
//!
//! Exposes an axum [`Router`] that validates statement-listing queries and
//! normalises Actor bodies. Validation failures become 400 responses; TLS,
//! auth, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/xapi", xapi_api::api_router())
//! ```

pub mod actors;
pub mod error;
pub mod statements;

use axum::{
  Router,
  routing::{get, post},
};

pub use error::{ApiError, RequestPart};

/// Build the API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router() -> Router<()> {
  Router::new()
    .route("/statements", get(statements::list))
    .route("/actors", post(actors::normalize))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  async fn get_uri(uri: &str) -> Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    api_router().oneshot(req).await.unwrap()
  }

  async fn post_json(uri: &str, body: &str) -> Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    api_router().oneshot(req).await.unwrap()
  }

  async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  // ── GET /statements ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn statements_with_nothing_specified() {
    let resp = get_uri("/statements").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["statements"], json!([]));
    assert_eq!(body["query"]["format"], "exact");
    assert_eq!(body["query"]["limit"], 0);
  }

  #[tokio::test]
  async fn statements_with_invalid_statement_id() {
    let resp = get_uri("/statements?statementId=asdf").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({
      "statusCode": 400,
      "error": "Bad Request",
      "message": "\"statementId\" must be a valid GUID",
      "validation": { "source": "query", "keys": ["statementId"] }
    }));
  }

  #[tokio::test]
  async fn statements_with_repeated_ids() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let resp =
      get_uri(&format!("/statements?statementId={a}&statementId={b}")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["query"]["statementId"], json!([a, b]));
  }

  #[tokio::test]
  async fn statements_with_bad_second_registration() {
    let a = Uuid::new_v4();
    let resp =
      get_uri(&format!("/statements?registration={a}&registration=nope")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["validation"]["keys"], json!(["registration[1]"]));
  }

  #[tokio::test]
  async fn statements_with_agent_filter() {
    // agent={"mbox":"mailto:mal@serenity.org"}
    let resp = get_uri(
      "/statements?agent=%7B%22mbox%22%3A%22mailto%3Amal%40serenity.org%22%7D\
       &related_agents=true&limit=10&format=ids",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["query"]["agent"], json!({
      "objectType": "Agent",
      "mbox": "mailto:mal@serenity.org"
    }));
    assert_eq!(body["query"]["related_agents"], true);
    assert_eq!(body["query"]["limit"], 10);
    assert_eq!(body["query"]["format"], "ids");
  }

  #[tokio::test]
  async fn statements_with_anonymous_group_agent_filter() {
    // agent={"objectType":"Group","member":[]}
    let resp = get_uri(
      "/statements?agent=%7B%22objectType%22%3A%22Group%22%2C%22member%22%3A%5B%5D%7D",
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["validation"]["keys"], json!(["agent.member"]));
  }

  #[tokio::test]
  async fn statements_with_zero_limit() {
    let resp = get_uri("/statements?limit=0").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "\"limit\" must be a positive number");
  }

  #[tokio::test]
  async fn statements_with_unknown_parameter() {
    let resp = get_uri("/statements?page=2").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "\"page\" is not allowed");
    assert_eq!(body["validation"]["keys"], json!(["page"]));
  }

  // ── POST /actors ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn actors_normalizes_agent() {
    let resp =
      post_json("/actors", r#"{"mbox":"mailto:mal@serenity.org"}"#).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({
      "objectType": "Agent",
      "mbox": "mailto:mal@serenity.org"
    }));
  }

  #[tokio::test]
  async fn actors_normalizes_anonymous_group() {
    let resp = post_json(
      "/actors",
      r#"{"objectType":"Group","member":[{"mbox":"mailto:crew@serenity.org"}]}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["member"][0]["objectType"], "Agent");
  }

  #[tokio::test]
  async fn actors_rejects_conflicting_identifiers() {
    let resp = post_json(
      "/actors",
      r#"{"mbox":"mailto:a@b.org","mbox_sha1sum":"abc"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["validation"]["source"], "payload");
    assert_eq!(body["validation"]["keys"], json!([]));
    assert!(
      body["message"]
        .as_str()
        .unwrap()
        .contains("conflict between exclusive peers")
    );
  }

  #[tokio::test]
  async fn actors_reports_member_path() {
    let resp = post_json(
      "/actors",
      r#"{"objectType":"Group","member":[{"mbox":"jayne@serenity.org"}]}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["validation"]["keys"], json!(["member[0].mbox"]));
  }

  #[tokio::test]
  async fn actors_rejects_malformed_json() {
    let resp = post_json("/actors", "{not json").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["validation"]["source"], "payload");
  }
}
