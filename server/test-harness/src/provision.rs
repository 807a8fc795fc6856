//! Toolchain provisioning: makes sure the JUnit console launcher archive is
//! on disk before any Java run.
//!
//! The archive is fetched once and never verified. Callers must not provision
//! concurrently; the existence check and the download are not atomic together.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::HarnessConfig;
use crate::error::ProvisionError;

/// What `ensure` had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
  AlreadyPresent,
  Downloaded { bytes: u64 },
}

/// Location and origin of the test-launcher archive.
#[derive(Debug, Clone)]
pub struct Toolchain {
  lib_dir: PathBuf,
  archive: PathBuf,
  url: String,
}

impl Toolchain {
  pub fn new(lib_dir: impl Into<PathBuf>, archive_name: &str, url: impl Into<String>) -> Self {
    let lib_dir = lib_dir.into();
    Self {
      archive: lib_dir.join(archive_name),
      lib_dir,
      url: url.into(),
    }
  }

  pub fn from_config(config: &HarnessConfig) -> Self {
    Self::new(
      &config.lib_dir,
      &config.toolchain_archive,
      config.toolchain_url.clone(),
    )
  }

  pub fn archive_path(&self) -> &Path {
    &self.archive
  }

  /// True once the archive is on disk, however it got there.
  pub fn is_ready(&self) -> bool {
    self.archive.is_file()
  }

  /// Create the lib directory and download the archive if it is missing.
  pub async fn ensure(&self) -> Result<ProvisionOutcome, ProvisionError> {
    fs::create_dir_all(&self.lib_dir)
      .await
      .map_err(|e| ProvisionError::io(&self.lib_dir, e))?;

    if self.is_ready() {
      info!(archive = %self.archive.display(), "toolchain already present");
      return Ok(ProvisionOutcome::AlreadyPresent);
    }

    info!(url = %self.url, "downloading toolchain");
    let bytes = self.download().await?;
    info!(archive = %self.archive.display(), bytes, "toolchain downloaded");
    Ok(ProvisionOutcome::Downloaded { bytes })
  }

  /// Stream the archive into `<archive>.part`, then move it into place.
  async fn download(&self) -> Result<u64, ProvisionError> {
    let mut response = reqwest::get(&self.url).await?;
    let status = response.status();
    if !status.is_success() {
      return Err(ProvisionError::Status {
        url: self.url.clone(),
        status: status.as_u16(),
      });
    }

    let partial = self.archive.with_extension("jar.part");
    let mut file = fs::File::create(&partial)
      .await
      .map_err(|e| ProvisionError::io(&partial, e))?;

    let mut written = 0u64;
    let streamed: Result<(), ProvisionError> = async {
      while let Some(chunk) = response.chunk().await? {
        file
          .write_all(&chunk)
          .await
          .map_err(|e| ProvisionError::io(&partial, e))?;
        written += chunk.len() as u64;
      }
      file.flush().await.map_err(|e| ProvisionError::io(&partial, e))
    }
    .await;
    drop(file);

    if let Err(e) = streamed {
      let _ = fs::remove_file(&partial).await;
      return Err(e);
    }

    fs::rename(&partial, &self.archive)
      .await
      .map_err(|e| ProvisionError::io(&self.archive, e))?;
    Ok(written)
  }
}
