//! Webhook payload and source-host types (JSON contracts).

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Push webhook payload (only the fields the pipeline reads)
// ---------------------------------------------------------------------------

/// Push event body. Unknown fields are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
  #[serde(default)]
  pub repository: Option<Repository>,
  #[serde(default)]
  pub commits: Option<Vec<PushCommit>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub owner: Option<Owner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
  #[serde(default)]
  pub login: Option<String>,
  #[serde(default)]
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushCommit {
  pub id: String,
}

/// Validated push target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
  pub owner: String,
  pub repo: String,
  pub commits: Vec<String>,
}

// ---------------------------------------------------------------------------
// Source host responses
// ---------------------------------------------------------------------------

/// Files touched by one commit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitDetails {
  #[serde(default)]
  pub files: Vec<CommitFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitFile {
  pub filename: String,
  pub status: String,
}

impl CommitFile {
  /// Only new or changed files get tests; removed/renamed ones do not.
  pub fn is_eligible(&self) -> bool {
    matches!(self.status.as_str(), "modified" | "added")
  }
}
