//! Harness facade: stage, synthesize, execute for one modified file.

use tracing::{info, warn};

use crate::command::{self, TestCommand};
use crate::config::HarnessConfig;
use crate::error::{CommandError, ProvisionError};
use crate::executor::Executor;
use crate::provision::{ProvisionOutcome, Toolchain};
use crate::staging::StagingArea;
use crate::types::{ExecutionRequest, ExecutionResult, Language, StagedPaths};

/// Owns the staging area, the toolchain location, and the executor.
///
/// Staging paths are shared across calls; drive one request at a time.
#[derive(Debug, Clone)]
pub struct Harness {
  config: HarnessConfig,
  staging: StagingArea,
  toolchain: Toolchain,
  executor: Executor,
}

impl Harness {
  pub fn new(config: HarnessConfig) -> Self {
    Self {
      staging: StagingArea::new(&config.source_root, &config.test_root),
      toolchain: Toolchain::from_config(&config),
      executor: Executor::new(config.exec_timeout),
      config,
    }
  }

  pub fn toolchain(&self) -> &Toolchain {
    &self.toolchain
  }

  /// Fetch the JVM launcher archive if missing.
  pub async fn provision(&self) -> Result<ProvisionOutcome, ProvisionError> {
    self.toolchain.ensure().await
  }

  /// Stage, build, and run the generated test for one file.
  ///
  /// Never fails: every problem becomes `ExecutionResult { success: false }`.
  pub async fn process_modified_file(&self, req: &ExecutionRequest) -> ExecutionResult {
    if !req.language.is_supported() {
      warn!(file = %req.file_name, language = %req.language, "unsupported language");
      return ExecutionResult::failed(
        String::new(),
        CommandError::UnsupportedLanguage(req.language.tag().to_string()).to_string(),
      );
    }

    let staged = match self.staging.stage(req) {
      Ok(s) => s,
      Err(e) => {
        warn!(file = %req.file_name, error = %e, "staging failed");
        return ExecutionResult::failed(String::new(), e.to_string());
      }
    };

    let command = match self.command_for(&req.language, &staged) {
      Ok(c) => c,
      Err(e) => {
        warn!(file = %req.file_name, error = %e, "no runnable command");
        return ExecutionResult::failed(String::new(), e.to_string());
      }
    };

    info!(file = %req.file_name, command = %command, "running tests");
    let result = self.executor.execute(&command).await;
    info!(
      file = %req.file_name,
      success = result.success,
      timed_out = result.timed_out,
      duration_ms = result.duration_ms,
      "tests finished"
    );
    result
  }

  fn command_for(
    &self,
    language: &Language,
    staged: &StagedPaths,
  ) -> Result<TestCommand, CommandError> {
    if *language == Language::Java && !self.toolchain.is_ready() {
      return Err(CommandError::ToolchainUnavailable(
        self.toolchain.archive_path().to_path_buf(),
      ));
    }
    command::build_command(
      language,
      staged,
      &self.staging,
      self.toolchain.archive_path(),
      &self.config.runners,
    )
  }
}
