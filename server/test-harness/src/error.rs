//! Structured error types for the test harness.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fetching the JVM test-launcher archive failed.
#[derive(Debug, Error)]
pub enum ProvisionError {
  #[error("provision: io at {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("provision: transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("provision: {url} answered HTTP {status}")]
  Status { url: String, status: u16 },
}

impl ProvisionError {
  pub fn io(path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      path: path.to_path_buf(),
      source,
    }
  }
}

/// Writing into a staging root failed.
#[derive(Debug, Error)]
pub enum StagingError {
  #[error("staging: create dir {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("staging: remove stale {path}: {source}")]
  Remove {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("staging: write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// No runnable command exists for a request.
#[derive(Debug, Error)]
pub enum CommandError {
  #[error("Unsupported language")]
  UnsupportedLanguage(String),

  #[error("Toolchain unavailable: {}", .0.display())]
  ToolchainUnavailable(PathBuf),
}
