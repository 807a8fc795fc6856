//! Notification adapter: mails the verdict for one file.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::config::{MailConfig, PLACEHOLDER_MAIL_KEY};
use crate::error::AdapterError;

#[async_trait]
pub trait Notifier: Send + Sync {
  async fn send_report(
    &self,
    file: &str,
    success: bool,
    output: &str,
    recipient: &str,
  ) -> Result<(), AdapterError>;
}

pub fn status_label(success: bool) -> &'static str {
  if success {
    "PASSED"
  } else {
    "FAILED"
  }
}

pub fn subject(file: &str, success: bool) -> String {
  format!("[TEST REPORT] {}: Unit Tests for {}", status_label(success), file)
}

fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      _ => out.push(c),
    }
  }
  out
}

/// MailerSend transactional email API.
pub struct MailerSendNotifier {
  http: Client,
  api_key: Option<String>,
  sender: String,
  endpoint: String,
}

impl MailerSendNotifier {
  pub fn new(config: &MailConfig) -> Self {
    Self {
      http: Client::new(),
      api_key: config.api_key.clone(),
      sender: config.sender.clone(),
      endpoint: "https://api.mailersend.com/v1/email".into(),
    }
  }

  pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
    self.endpoint = endpoint.into();
    self
  }

  pub fn body(&self, file: &str, success: bool, output: &str, recipient: &str) -> serde_json::Value {
    let status = status_label(success);
    let color = if success { "#28a745" } else { "#dc3545" };
    json!({
      "from": { "email": self.sender, "name": "AI Test Platform" },
      "to": [{ "email": recipient, "name": "Developer" }],
      "subject": subject(file, success),
      "text": format!("Unit tests for {file} have {status}.\n\nOutput:\n{output}"),
      "html": format!(
        "<h3>Test Report: <span style=\"color: {color};\">{status}</span></h3>\
         <p>Unit tests for <strong>{}</strong> have finished execution.</p>\
         <h4>Details:</h4>\
         <pre style=\"background-color: #f4f4f4; padding: 10px; border-radius: 5px; white-space: pre-wrap;\">{}</pre>",
        escape_html(file),
        escape_html(output),
      ),
    })
  }
}

#[async_trait]
impl Notifier for MailerSendNotifier {
  async fn send_report(
    &self,
    file: &str,
    success: bool,
    output: &str,
    recipient: &str,
  ) -> Result<(), AdapterError> {
    let api_key = match self.api_key.as_deref() {
      Some(k) if k != PLACEHOLDER_MAIL_KEY => k,
      _ => {
        warn!("mail API key not configured; skipping notification");
        return Ok(());
      }
    };

    let resp = self
      .http
      .post(&self.endpoint)
      .bearer_auth(api_key)
      .header("X-Requested-With", "XMLHttpRequest")
      .json(&self.body(file, success, output, recipient))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(AdapterError::Status {
        service: "mailersend",
        status: status.as_u16(),
        body,
      });
    }

    info!(file, recipient, status = status_label(success), "test report sent");
    Ok(())
  }
}
