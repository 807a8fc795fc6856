//! Pipeline coordinator: commit -> eligible files -> tests -> verdict -> report.
//!
//! Per file: fetch -> synthesize -> stage/run (harness) -> notify. A failure at
//! any step ends that file only; the next file and the next commit still run.
//! Everything is sequential: the harness reuses staging paths per file name.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use test_harness::{ExecutionRequest, Harness, Language};
use tracing::{error, info, warn};

use crate::github::SourceHost;
use crate::notify::Notifier;
use crate::synth::TestSynthesizer;
use crate::types::{CommitFile, PushTarget};

/// Step at which a file dropped out of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailedAt {
  Fetch,
  Synthesize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FileOutcome {
  /// Tests ran; `notified` is false when no report went out.
  Executed { success: bool, notified: bool },
  Failed { stage: FailedAt, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
  pub commit: String,
  pub path: String,
  pub language: String,
  pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PushReport {
  pub files: Vec<FileReport>,
  /// Commits whose file list could not be fetched.
  pub skipped_commits: Vec<String>,
}

/// Explicitly wired collaborators; nothing is looked up globally.
#[derive(Clone)]
pub struct Pipeline {
  source: Arc<dyn SourceHost>,
  synthesizer: Arc<dyn TestSynthesizer>,
  notifier: Arc<dyn Notifier>,
  harness: Harness,
  recipient: Option<String>,
}

/// Language of an eligible file, or `None` when the file is not ours.
pub fn classify(file: &CommitFile) -> Option<Language> {
  if !file.is_eligible() {
    return None;
  }
  Language::from_path(&file.filename)
}

impl Pipeline {
  pub fn new(
    source: Arc<dyn SourceHost>,
    synthesizer: Arc<dyn TestSynthesizer>,
    notifier: Arc<dyn Notifier>,
    harness: Harness,
    recipient: Option<String>,
  ) -> Self {
    Self {
      source,
      synthesizer,
      notifier,
      harness,
      recipient,
    }
  }

  /// Run every commit of a push, in order.
  pub async fn process_push(&self, target: &PushTarget) -> PushReport {
    info!(owner = %target.owner, repo = %target.repo, commits = target.commits.len(), "processing push");
    let mut report = PushReport::default();

    for sha in &target.commits {
      match self.source.commit_details(&target.owner, &target.repo, sha).await {
        Ok(details) => {
          let files = self
            .process_commit(&target.owner, &target.repo, sha, &details.files)
            .await;
          report.files.extend(files);
        }
        Err(e) => {
          error!(commit = %sha, error = %e, "could not fetch commit details; skipping commit");
          report.skipped_commits.push(sha.clone());
        }
      }
    }

    report
  }

  /// Run the eligible files of one commit, in order.
  pub async fn process_commit(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
    files: &[CommitFile],
  ) -> Vec<FileReport> {
    info!(commit = %sha, files = files.len(), "processing commit");
    let mut reports = Vec::new();

    for file in files {
      let Some(language) = classify(file) else {
        continue;
      };
      let outcome = self.process_file(owner, repo, sha, &file.filename, &language).await;
      reports.push(FileReport {
        commit: sha.to_string(),
        path: file.filename.clone(),
        language: language.tag().to_string(),
        outcome,
      });
    }

    reports
  }

  async fn process_file(
    &self,
    owner: &str,
    repo: &str,
    sha: &str,
    path: &str,
    language: &Language,
  ) -> FileOutcome {
    info!(file = %path, %language, "generating tests");

    let source = match self.source.file_content(owner, repo, path, sha).await {
      Ok(s) => s,
      Err(e) => return failed(path, FailedAt::Fetch, e.to_string()),
    };

    let tests = match self.synthesizer.generate_tests(&source, language).await {
      Ok(t) => t,
      Err(e) => return failed(path, FailedAt::Synthesize, e.to_string()),
    };

    let file_name = Path::new(path)
      .file_name()
      .and_then(|n| n.to_str())
      .unwrap_or(path);
    let req = ExecutionRequest::new(file_name, language.clone(), Some(source), tests);
    let result = self.harness.process_modified_file(&req).await;

    if result.success {
      info!(file = %path, "tests PASSED");
    } else {
      warn!(
        file = %path,
        error = result.error.as_deref().unwrap_or(""),
        output = %result.output,
        "tests FAILED"
      );
    }

    let notified = match &self.recipient {
      Some(recipient) => {
        match self
          .notifier
          .send_report(path, result.success, &result.combined_output(), recipient)
          .await
        {
          Ok(()) => true,
          Err(e) => {
            error!(file = %path, error = %e, "notification failed");
            false
          }
        }
      }
      None => false,
    };

    FileOutcome::Executed {
      success: result.success,
      notified,
    }
  }
}

fn failed(path: &str, stage: FailedAt, reason: String) -> FileOutcome {
  error!(file = %path, ?stage, error = %reason, "file skipped");
  FileOutcome::Failed { stage, reason }
}
