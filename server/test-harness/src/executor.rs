//! Process executor: runs a synthesized command and captures the verdict.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::{CommandStep, TestCommand};
use crate::types::ExecutionResult;

/// Runs command steps one after another, capturing stdout/stderr in full.
#[derive(Debug, Clone, Default)]
pub struct Executor {
  timeout: Option<Duration>,
}

enum StepOutcome {
  Exited {
    success: bool,
    stdout: String,
    stderr: String,
    code: Option<i32>,
  },
  SpawnFailed(String),
  TimedOut(Duration),
}

impl Executor {
  pub fn new(timeout: Option<Duration>) -> Self {
    Self { timeout }
  }

  /// Execute `command`. Success iff every step exits 0; a failing step stops
  /// the run and later steps never start.
  pub async fn execute(&self, command: &TestCommand) -> ExecutionResult {
    let started = Instant::now();
    let mut output = String::new();

    let mut result = 'steps: {
      for step in &command.steps {
        match self.run_step(step).await {
          StepOutcome::Exited {
            success: true,
            stdout,
            ..
          } => output.push_str(&stdout),
          StepOutcome::Exited {
            stdout,
            stderr,
            code,
            ..
          } => {
            output.push_str(&stdout);
            let error = if stderr.is_empty() {
              format!("Command failed: {} (exit {})", step.program, exit_label(code))
            } else {
              stderr
            };
            break 'steps ExecutionResult::failed(output, error);
          }
          StepOutcome::SpawnFailed(message) => {
            break 'steps ExecutionResult::failed(output, message);
          }
          StepOutcome::TimedOut(limit) => {
            let mut r = ExecutionResult::failed(output, format!("Timed out after {limit:?}"));
            r.timed_out = true;
            break 'steps r;
          }
        }
      }
      ExecutionResult::passed(output)
    };

    result.duration_ms = started.elapsed().as_millis() as u64;
    result
  }

  async fn run_step(&self, step: &CommandStep) -> StepOutcome {
    debug!(program = %step.program, args = ?step.args, "spawning");

    let mut cmd = Command::new(&step.program);
    cmd
      .args(&step.args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true);

    let output = match self.timeout {
      Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
        Ok(res) => res,
        Err(_) => {
          warn!(program = %step.program, secs = limit.as_secs(), "step timed out; killed");
          return StepOutcome::TimedOut(limit);
        }
      },
      None => cmd.output().await,
    };

    match output {
      Ok(out) => StepOutcome::Exited {
        success: out.status.success(),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        code: out.status.code(),
      },
      Err(e) => StepOutcome::SpawnFailed(format!("Failed to start {}: {}", step.program, e)),
    }
  }
}

fn exit_label(code: Option<i32>) -> String {
  match code {
    Some(c) => c.to_string(),
    None => "signal".into(),
  }
}

#[cfg(all(test, unix))]
mod tests {
  use super::*;

  fn step(program: &str, args: &[&str]) -> CommandStep {
    CommandStep {
      program: program.into(),
      args: args.iter().map(|s| s.to_string()).collect(),
    }
  }

  fn command(steps: Vec<CommandStep>) -> TestCommand {
    TestCommand { steps }
  }

  #[tokio::test]
  async fn zero_exit_is_success_with_stdout() {
    let r = Executor::default()
      .execute(&command(vec![step("sh", &["-c", "echo all passed"])]))
      .await;
    assert!(r.success);
    assert_eq!(r.output, "all passed\n");
    assert!(r.error.is_none());
    assert!(!r.timed_out);
  }

  #[tokio::test]
  async fn nonzero_exit_keeps_stdout_and_stderr() {
    let r = Executor::default()
      .execute(&command(vec![step(
        "sh",
        &["-c", "echo '1 failed'; echo 'AssertionError' >&2; exit 1"],
      )]))
      .await;
    assert!(!r.success);
    assert_eq!(r.output, "1 failed\n");
    assert_eq!(r.error.as_deref(), Some("AssertionError\n"));
  }

  #[tokio::test]
  async fn silent_failure_reports_exit_code() {
    let r = Executor::default()
      .execute(&command(vec![step("sh", &["-c", "exit 3"])]))
      .await;
    assert!(!r.success);
    assert_eq!(r.error.as_deref(), Some("Command failed: sh (exit 3)"));
  }

  #[tokio::test]
  async fn failing_first_step_skips_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("ran");
    let touch = format!("touch {}", marker.display());
    let r = Executor::default()
      .execute(&command(vec![
        step("sh", &["-c", "echo 'error: cannot find symbol' >&2; exit 1"]),
        step("sh", &["-c", &touch]),
      ]))
      .await;
    assert!(!r.success);
    assert!(r.error.unwrap().contains("cannot find symbol"));
    assert!(!marker.exists());
  }

  #[tokio::test]
  async fn spawn_failure_has_no_output() {
    let r = Executor::default()
      .execute(&command(vec![step("definitely-not-a-runner-xyz", &[])]))
      .await;
    assert!(!r.success);
    assert!(r.output.is_empty());
    assert!(r.error.unwrap().starts_with("Failed to start definitely-not-a-runner-xyz"));
  }

  #[tokio::test]
  async fn deadline_kills_hung_step() {
    let r = Executor::new(Some(Duration::from_secs(1)))
      .execute(&command(vec![step("sleep", &["5"])]))
      .await;
    assert!(!r.success);
    assert!(r.timed_out);
    assert_eq!(r.error.as_deref(), Some("Timed out after 1s"));
    assert!(r.duration_ms < 5000);
  }
}
