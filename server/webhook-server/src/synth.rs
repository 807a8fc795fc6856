//! Test-synthesis adapter: asks a text-completion service for a test suite.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use test_harness::Language;

use crate::config::SynthConfig;
use crate::error::AdapterError;

pub const GEMINI_MODEL: &str = "gemini-flash-latest";
pub const OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[async_trait]
pub trait TestSynthesizer: Send + Sync {
  /// Test file text for `source`. No schema is promised: callers stage
  /// whatever comes back.
  async fn generate_tests(&self, source: &str, language: &Language) -> Result<String, AdapterError>;
}

/// Pick a provider from whichever key is configured.
pub fn from_config(config: &SynthConfig) -> Arc<dyn TestSynthesizer> {
  if let Some(key) = &config.gemini_api_key {
    Arc::new(GeminiSynthesizer::new(key.clone()))
  } else if let Some(key) = &config.openai_api_key {
    Arc::new(OpenAiSynthesizer::new(key.clone()))
  } else {
    Arc::new(Unconfigured)
  }
}

pub fn framework(language: &Language) -> &'static str {
  match language {
    Language::JavaScript => "Jest",
    Language::Python => "PyTest",
    _ => "JUnit 5",
  }
}

pub fn build_prompt(source: &str, language: &Language) -> String {
  format!(
    "You are an expert software tester.\n\
     Generate a comprehensive unit test suite for the following {language} code.\n\
     Include edge cases and verify logic coverage.\n\
     Use {framework} as the testing framework.\n\
     Return ONLY the code for the test file. Do not include markdown formatting or explanations.\n\
     \n\
     Code:\n\
     {source}\n",
    framework = framework(language),
  )
}

/// Drop Markdown fence lines (```lang and bare ```), keeping their contents.
pub fn strip_fences(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  let mut rest = text;
  while let Some(start) = rest.find("```") {
    out.push_str(&rest[..start]);
    let after = &rest[start + 3..];
    let tag_len = after
      .find(|c: char| !c.is_ascii_alphanumeric())
      .unwrap_or(after.len());
    let after = &after[tag_len..];
    rest = after.strip_prefix('\n').unwrap_or(after);
  }
  out.push_str(rest);
  out
}

/// Keep printable ASCII, CR, LF, and tab.
pub fn printable_ascii(text: &str) -> String {
  text
    .chars()
    .filter(|c| matches!(c, ' '..='~' | '\r' | '\n' | '\t'))
    .collect()
}

async fn post_json(
  req: reqwest::RequestBuilder,
  service: &'static str,
) -> Result<Value, AdapterError> {
  let resp = req.send().await?;
  let status = resp.status();
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(AdapterError::Status {
      service,
      status: status.as_u16(),
      body,
    });
  }
  Ok(resp.json().await?)
}

// ---------------------------------------------------------------------------
// Gemini
// ---------------------------------------------------------------------------

pub struct GeminiSynthesizer {
  http: Client,
  api_key: String,
  base_url: String,
}

impl GeminiSynthesizer {
  pub fn new(api_key: String) -> Self {
    Self {
      http: Client::new(),
      api_key,
      base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

#[async_trait]
impl TestSynthesizer for GeminiSynthesizer {
  async fn generate_tests(&self, source: &str, language: &Language) -> Result<String, AdapterError> {
    let url = format!("{}/models/{}:generateContent", self.base_url, GEMINI_MODEL);
    let body = json!({
      "contents": [{ "parts": [{ "text": build_prompt(source, language) }] }]
    });
    let req = self
      .http
      .post(url)
      .header("x-goog-api-key", &self.api_key)
      .json(&body);
    let v = post_json(req, "gemini").await?;

    let text = v
      .pointer("/candidates/0/content/parts/0/text")
      .and_then(Value::as_str)
      .ok_or_else(|| AdapterError::decode("gemini response has no text"))?;
    Ok(printable_ascii(&strip_fences(text)).trim().to_string())
  }
}

// ---------------------------------------------------------------------------
// OpenAI
// ---------------------------------------------------------------------------

pub struct OpenAiSynthesizer {
  http: Client,
  api_key: String,
  base_url: String,
}

impl OpenAiSynthesizer {
  pub fn new(api_key: String) -> Self {
    Self {
      http: Client::new(),
      api_key,
      base_url: "https://api.openai.com/v1".into(),
    }
  }

  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }
}

#[async_trait]
impl TestSynthesizer for OpenAiSynthesizer {
  async fn generate_tests(&self, source: &str, language: &Language) -> Result<String, AdapterError> {
    let body = json!({
      "model": OPENAI_MODEL,
      "messages": [{ "role": "user", "content": build_prompt(source, language) }]
    });
    let req = self
      .http
      .post(format!("{}/chat/completions", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&body);
    let v = post_json(req, "openai").await?;

    let text = v
      .pointer("/choices/0/message/content")
      .and_then(Value::as_str)
      .ok_or_else(|| AdapterError::decode("openai response has no message content"))?;
    Ok(strip_fences(text))
  }
}

// ---------------------------------------------------------------------------
// No provider
// ---------------------------------------------------------------------------

/// Fails every request; used when no API key is configured.
pub struct Unconfigured;

#[async_trait]
impl TestSynthesizer for Unconfigured {
  async fn generate_tests(&self, _source: &str, _language: &Language) -> Result<String, AdapterError> {
    Err(AdapterError::MissingCredentials("GEMINI_API_KEY or OPENAI_API_KEY"))
  }
}
