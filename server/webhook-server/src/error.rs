//! Structured error types for the webhook server.

use axum::http::StatusCode;
use thiserror::Error;

/// An external collaborator (source host, synthesizer, mailer) failed.
#[derive(Debug, Error)]
pub enum AdapterError {
  #[error("transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("{service} answered HTTP {status}: {body}")]
  Status {
    service: &'static str,
    status: u16,
    body: String,
  },

  #[error("decode: {0}")]
  Decode(String),

  #[error("missing credentials: {0}")]
  MissingCredentials(&'static str),
}

impl AdapterError {
  pub fn decode(msg: impl Into<String>) -> Self {
    Self::Decode(msg.into())
  }
}

/// A webhook body that cannot be processed. Each maps to a 400.
#[derive(Debug, Error)]
pub enum PayloadError {
  #[error("Invalid JSON in payload")]
  InvalidForm(#[source] serde_json::Error),

  #[error("Invalid JSON")]
  InvalidJson(#[source] serde_json::Error),

  #[error("Malformed payload")]
  Malformed,

  #[error("Malformed payload details")]
  MalformedDetails,
}

impl PayloadError {
  pub fn status(&self) -> StatusCode {
    StatusCode::BAD_REQUEST
  }
}
