//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an ExecutionRequest. Output lines are either:
//! - An ExecutionResult (one per request, in input order)
//! - An ErrorOutput (when the line is not a valid request)
//!
//! Logs go to stderr. The toolchain archive is fetched before the first line
//! is read; a failed fetch is logged and only Java requests are affected.

use std::io::{self, BufRead, Write};

use test_harness::types::ErrorOutput;
use test_harness::{ExecutionRequest, Harness, HarnessConfig};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("test_harness=info,warn")),
    )
    .with_writer(io::stderr)
    .with_target(false)
    .init();

  let harness = Harness::new(HarnessConfig::from_env());
  if let Err(e) = harness.provision().await {
    warn!(error = %e, "toolchain provisioning failed; Java requests will fail");
  }

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        error!(error = %e, "read error");
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let req: ExecutionRequest = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        let err = ErrorOutput::new(format!("json parse: {}", e));
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
        let _ = out.flush();
        continue;
      }
    };

    let result = harness.process_modified_file(&req).await;
    let _ = serde_json::to_writer(&mut out, &result);
    let _ = writeln!(out);
    let _ = out.flush();
  }

  let _ = out.flush();
}
