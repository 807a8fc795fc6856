//! Source-hosting adapter: commit file lists and file contents at a commit.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::error::AdapterError;
use crate::types::CommitDetails;

#[async_trait]
pub trait SourceHost: Send + Sync {
  async fn commit_details(&self, owner: &str, repo: &str, sha: &str)
    -> Result<CommitDetails, AdapterError>;

  async fn file_content(
    &self,
    owner: &str,
    repo: &str,
    path: &str,
    sha: &str,
  ) -> Result<String, AdapterError>;
}

/// GitHub REST API client.
#[derive(Debug, Clone)]
pub struct GithubClient {
  http: Client,
  api_url: String,
  token: Option<String>,
}

#[derive(Deserialize)]
struct ContentResponse {
  content: String,
  #[serde(default)]
  encoding: Option<String>,
}

impl GithubClient {
  pub fn new(config: &GithubConfig) -> Self {
    Self {
      http: Client::new(),
      api_url: config.api_url.trim_end_matches('/').to_string(),
      token: config.token.clone(),
    }
  }

  fn get(&self, path: &str) -> RequestBuilder {
    let mut req = self
      .http
      .get(format!("{}{}", self.api_url, path))
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", concat!("pushtest/", env!("CARGO_PKG_VERSION")));
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }
    req
  }
}

async fn read_json<T: serde::de::DeserializeOwned>(
  req: RequestBuilder,
) -> Result<T, AdapterError> {
  let resp = req.send().await?;
  let status = resp.status();
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(AdapterError::Status {
      service: "github",
      status: status.as_u16(),
      body,
    });
  }
  Ok(resp.json().await?)
}

#[async_trait]
impl SourceHost for GithubClient {
  async fn commit_details(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
  ) -> Result<CommitDetails, AdapterError> {
    read_json(self.get(&format!("/repos/{owner}/{repo}/commits/{sha}"))).await
  }

  async fn file_content(
    &self,
    owner: &str,
    repo: &str,
    path: &str,
    sha: &str,
  ) -> Result<String, AdapterError> {
    let req = self
      .get(&format!("/repos/{owner}/{repo}/contents/{path}"))
      .query(&[("ref", sha)]);
    let body: ContentResponse = read_json(req).await?;
    if let Some(enc) = body.encoding.as_deref().filter(|e| *e != "base64") {
      return Err(AdapterError::decode(format!("unexpected content encoding {enc}")));
    }
    decode_content(&body.content)
  }
}

/// Contents API bodies are base64 wrapped at 60 columns.
pub fn decode_content(encoded: &str) -> Result<String, AdapterError> {
  let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
  let bytes = base64::engine::general_purpose::STANDARD
    .decode(compact)
    .map_err(|e| AdapterError::decode(format!("base64: {e}")))?;
  String::from_utf8(bytes).map_err(|e| AdapterError::decode(format!("utf-8: {e}")))
}
