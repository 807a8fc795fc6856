//! Core types for the test harness (JSON contracts + staged layout).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Language tag
// ---------------------------------------------------------------------------

/// Language of a modified file. Unrecognized tags are kept verbatim so the
/// caller can report them; only the first three are runnable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
  JavaScript,
  Python,
  Java,
  Other(String),
}

impl Language {
  pub fn from_tag(tag: &str) -> Self {
    match tag.to_ascii_lowercase().as_str() {
      "javascript" | "js" => Self::JavaScript,
      "python" | "py" => Self::Python,
      "java" => Self::Java,
      _ => Self::Other(tag.to_string()),
    }
  }

  /// Classify a repository path by extension. Unknown extensions yield `None`.
  pub fn from_path(path: &str) -> Option<Self> {
    match Path::new(path).extension().and_then(|e| e.to_str()) {
      Some("js") => Some(Self::JavaScript),
      Some("py") => Some(Self::Python),
      Some("java") => Some(Self::Java),
      _ => None,
    }
  }

  pub fn tag(&self) -> &str {
    match self {
      Self::JavaScript => "javascript",
      Self::Python => "python",
      Self::Java => "java",
      Self::Other(tag) => tag,
    }
  }

  pub fn is_supported(&self) -> bool {
    !matches!(self, Self::Other(_))
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.tag())
  }
}

impl Serialize for Language {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.tag())
  }
}

impl<'de> Deserialize<'de> for Language {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let tag = String::deserialize(deserializer)?;
    Ok(Self::from_tag(&tag))
  }
}

// ---------------------------------------------------------------------------
// Inbound request
// ---------------------------------------------------------------------------

/// One unit of work: a modified file plus the test generated for it.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionRequest {
  /// Bare file name, e.g. `AddTwoVariable.java`.
  pub file_name: String,
  pub language: Language,
  #[serde(default)]
  pub source_code: Option<String>,
  pub test_code: String,
}

impl ExecutionRequest {
  pub fn new(
    file_name: impl Into<String>,
    language: Language,
    source_code: Option<String>,
    test_code: impl Into<String>,
  ) -> Self {
    Self {
      file_name: file_name.into(),
      language,
      source_code,
      test_code: test_code.into(),
    }
  }

  /// Source text worth writing: absent and empty are treated alike.
  pub fn source(&self) -> Option<&str> {
    self.source_code.as_deref().filter(|s| !s.is_empty())
  }
}

// ---------------------------------------------------------------------------
// Staged layout
// ---------------------------------------------------------------------------

/// Where the staging area put things for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPaths {
  /// `None` when no source companion was written.
  pub source_file: Option<PathBuf>,
  pub test_file: PathBuf,
  /// Runner selector: path relative to the test root for script languages,
  /// fully-qualified class name for Java.
  pub qualified_test_name: String,
}

// ---------------------------------------------------------------------------
// Outbound result
// ---------------------------------------------------------------------------

/// Verdict of one execution. `success` is true iff every step exited 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
  pub success: bool,
  pub output: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
  #[serde(default)]
  pub timed_out: bool,
  #[serde(default)]
  pub duration_ms: u64,
}

impl ExecutionResult {
  pub fn passed(output: String) -> Self {
    Self {
      success: true,
      output,
      error: None,
      timed_out: false,
      duration_ms: 0,
    }
  }

  pub fn failed(output: String, error: impl Into<String>) -> Self {
    Self {
      success: false,
      output,
      error: Some(error.into()),
      timed_out: false,
      duration_ms: 0,
    }
  }

  /// Output followed by the error text on its own line, as sent in reports.
  pub fn combined_output(&self) -> String {
    match &self.error {
      Some(err) => format!("{}\n{}", self.output, err),
      None => self.output.clone(),
    }
  }
}

/// Error line emitted by the binary when an input line cannot be handled.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
  pub error: String,
}

impl ErrorOutput {
  pub fn new(error: impl Into<String>) -> Self {
    Self { error: error.into() }
  }
}
