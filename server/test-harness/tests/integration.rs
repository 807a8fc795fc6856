//! Integration tests for the test harness.
//!
//! Real runners (jest, pytest, javac) are swapped for POSIX utilities so the
//! full stage -> command -> execute path runs without language toolchains.

#![cfg(unix)]

use std::fs;

use test_harness::{ExecutionRequest, Harness, HarnessConfig, Language};

fn harness_with(dir: &tempfile::TempDir, js: &[&str], py: &[&str]) -> Harness {
  let mut config = HarnessConfig::rooted_at(dir.path());
  config.runners.javascript = js.iter().map(|s| s.to_string()).collect();
  config.runners.python = py.iter().map(|s| s.to_string()).collect();
  Harness::new(config)
}

fn fixture_request() -> ExecutionRequest {
  let json = r#"{
    "file_name": "calc.js",
    "language": "javascript",
    "source_code": "module.exports.add = (a, b) => a + b;",
    "test_code": "const { add } = require('../temp_src/calc');\ntest('adds', () => expect(add(1, 2)).toBe(3));"
  }"#;
  serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn javascript_request_is_staged_and_run() {
  let dir = tempfile::tempdir().unwrap();
  // `cat` echoes the staged test back, proving the runner got the right path.
  let harness = harness_with(&dir, &["cat"], &["false"]);

  let result = harness.process_modified_file(&fixture_request()).await;

  assert!(result.success, "error: {:?}", result.error);
  assert!(result.error.is_none());
  assert!(result.output.contains("expect(add(1, 2)).toBe(3)"));
  assert!(dir.path().join("tests/calc.test.js").is_file());
  assert_eq!(
    fs::read_to_string(dir.path().join("temp_src/calc.js")).unwrap(),
    "module.exports.add = (a, b) => a + b;"
  );
}

#[tokio::test]
async fn failing_runner_yields_failed_verdict() {
  let dir = tempfile::tempdir().unwrap();
  let harness = harness_with(&dir, &["cat"], &["sh", "-c", "echo '1 failed' && echo 'assert 2 == 3' >&2 && exit 1", "pytest"]);
  let req = ExecutionRequest::new("dims.py", Language::Python, None, "def test_dims(): assert 2 == 3");

  let result = harness.process_modified_file(&req).await;

  assert!(!result.success);
  assert_eq!(result.output, "1 failed\n");
  assert_eq!(result.error.as_deref(), Some("assert 2 == 3\n"));
  assert_eq!(result.combined_output(), "1 failed\n\nassert 2 == 3\n");
  assert!(dir.path().join("tests/test_dims.py").is_file());
}

#[tokio::test]
async fn missing_runner_is_reported_as_spawn_failure() {
  let dir = tempfile::tempdir().unwrap();
  let harness = harness_with(&dir, &["no-such-jest-binary"], &["false"]);

  let result = harness.process_modified_file(&fixture_request()).await;

  assert!(!result.success);
  assert!(result.output.is_empty());
  assert!(result.error.unwrap().contains("no-such-jest-binary"));
}

#[tokio::test]
async fn java_with_package_mismatch_stages_each_side_independently() {
  let dir = tempfile::tempdir().unwrap();
  let harness = harness_with(&dir, &["cat"], &["false"]);
  let req = ExecutionRequest::new(
    "AddTwoVariable.java",
    Language::Java,
    Some("package Variables;\npublic class AddTwoVariable { public int add(int a, int b) { return a + b; } }".into()),
    "import org.junit.jupiter.api.Test;\nclass AddTwoVariableTest { @Test void adds() {} }",
  );

  let result = harness.process_modified_file(&req).await;

  // No launcher archive was provisioned, so the run stops before javac.
  assert!(!result.success);
  assert!(result.error.unwrap().starts_with("Toolchain unavailable"));
  assert!(dir.path().join("temp_src/Variables/AddTwoVariable.java").is_file());
  assert!(dir.path().join("tests/AddTwoVariableTest.java").is_file());
}

#[tokio::test]
async fn java_runs_compile_then_launch_once_toolchain_present() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = HarnessConfig::rooted_at(dir.path());
  fs::create_dir_all(&config.lib_dir).unwrap();
  fs::write(config.toolchain_path(), b"jar").unwrap();
  // javac stand-in succeeds; java stand-in prints its arguments.
  config.runners.javac = "true".into();
  config.runners.java = "echo".into();
  let harness = Harness::new(config);
  assert!(harness.toolchain().is_ready());

  let req = ExecutionRequest::new(
    "Calc.java",
    Language::Java,
    None,
    "package com.example;\nclass CalcTest {}",
  );
  let result = harness.process_modified_file(&req).await;

  assert!(result.success, "error: {:?}", result.error);
  assert!(result
    .output
    .contains("org.junit.platform.console.ConsoleLauncher --select-class com.example.CalcTest"));
  assert!(dir.path().join("tests/com/example/CalcTest.java").is_file());
}

#[tokio::test]
async fn compile_failure_short_circuits_launch() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = HarnessConfig::rooted_at(dir.path());
  fs::create_dir_all(&config.lib_dir).unwrap();
  fs::write(config.toolchain_path(), b"jar").unwrap();
  config.runners.javac = "false".into();
  config.runners.java = "echo".into();
  let harness = Harness::new(config);

  let req = ExecutionRequest::new("Calc.java", Language::Java, None, "class CalcTest {");
  let result = harness.process_modified_file(&req).await;

  assert!(!result.success);
  assert!(result.output.is_empty());
  assert_eq!(result.error.as_deref(), Some("Command failed: false (exit 1)"));
}

#[tokio::test]
async fn restaging_same_file_keeps_one_copy() {
  let dir = tempfile::tempdir().unwrap();
  let harness = harness_with(&dir, &["cat"], &["false"]);
  let mut req = fixture_request();

  harness.process_modified_file(&req).await;
  req.test_code = "test('second', () => {});".into();
  let result = harness.process_modified_file(&req).await;

  assert_eq!(result.output, "test('second', () => {});");
  let staged: Vec<_> = fs::read_dir(dir.path().join("tests")).unwrap().collect();
  assert_eq!(staged.len(), 1);
}
