//! HTTP handlers for the webhook server.

use axum::{
  body::Bytes,
  extract::State,
  http::{header, HeaderMap, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, Instrument};

use crate::error::PayloadError;
use crate::state::AppState;
use crate::types::{PushPayload, PushTarget};

const EVENT_HEADER: &str = "x-github-event";
const DELIVERY_HEADER: &str = "x-github-delivery";

pub async fn health() -> &'static str {
  "AI Unit Test Generator Platform is Running"
}

pub async fn webhook(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  body: Bytes,
) -> (StatusCode, String) {
  let delivery = header_str(&headers, DELIVERY_HEADER)
    .map(str::to_string)
    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
  let span = tracing::info_span!("webhook", %delivery);

  let body = match parse_body(&headers, &body) {
    Ok(v) => v,
    Err(e) => {
      error!(parent: &span, error = ?e, "rejecting webhook body");
      return (e.status(), e.to_string());
    }
  };

  let event = resolve_event(header_str(&headers, EVENT_HEADER), &body);
  if event != "push" {
    info!(parent: &span, %event, "ignoring event");
    return (StatusCode::OK, format!("Event {event} ignored"));
  }

  let target = match push_target(body) {
    Ok(t) => t,
    Err(e) => {
      error!(parent: &span, error = %e, "malformed push event");
      return (e.status(), e.to_string());
    }
  };

  // Spawned so a panic deep in the pipeline becomes a 500, not a dropped connection.
  let task = tokio::spawn(
    async move {
      let _guard = state.gate.lock().await;
      state.pipeline.process_push(&target).await
    }
    .instrument(span.clone()),
  );

  match task.await {
    Ok(report) => {
      info!(
        parent: &span,
        files = report.files.len(),
        skipped_commits = report.skipped_commits.len(),
        "webhook processed"
      );
      (StatusCode::OK, "Webhook processed successfully".into())
    }
    Err(e) => {
      error!(parent: &span, error = %e, "webhook processing aborted");
      (StatusCode::INTERNAL_SERVER_ERROR, "Error processing webhook".into())
    }
  }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
}

/// JSON body, or a form body whose `payload` field holds the JSON. Any JSON
/// shape is accepted here; only push events are held to `PushPayload`.
pub fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, PayloadError> {
  let is_form = header_str(headers, header::CONTENT_TYPE.as_str())
    .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

  if is_form {
    return match url::form_urlencoded::parse(body).find(|(k, _)| k == "payload") {
      Some((_, json)) => serde_json::from_str(&json).map_err(PayloadError::InvalidForm),
      None => Ok(Value::Null),
    };
  }

  if body.iter().all(u8::is_ascii_whitespace) {
    return Ok(Value::Null);
  }
  serde_json::from_slice(body).map_err(PayloadError::InvalidJson)
}

/// Event header, or `push` when absent and the body carries commits.
pub fn resolve_event(header: Option<&str>, body: &Value) -> String {
  match header {
    Some(event) => event.to_string(),
    None if body.get("commits").is_some_and(|c| !c.is_null()) => "push".into(),
    None => "unknown".into(),
  }
}

/// Validate a push body. Bodies that do not fit `PushPayload` at all are
/// malformed, same as ones missing the repository or commits.
pub fn push_target(body: Value) -> Result<PushTarget, PayloadError> {
  let payload: PushPayload = serde_json::from_value(body).map_err(|_| PayloadError::Malformed)?;
  let (Some(repository), Some(commits)) = (payload.repository, payload.commits) else {
    return Err(PayloadError::Malformed);
  };

  let owner = repository
    .owner
    .and_then(|o| o.login.or(o.name))
    .filter(|o| !o.is_empty());
  let repo = repository.name.filter(|r| !r.is_empty());

  match (owner, repo) {
    (Some(owner), Some(repo)) => Ok(PushTarget {
      owner,
      repo,
      commits: commits.into_iter().map(|c| c.id).collect(),
    }),
    _ => Err(PayloadError::MalformedDetails),
  }
}
