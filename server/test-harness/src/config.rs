//! Harness configuration with sane defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const JUNIT_ARCHIVE_NAME: &str = "junit-platform-console-standalone.jar";
pub const JUNIT_ARCHIVE_URL: &str = "https://repo1.maven.org/maven2/org/junit/platform/junit-platform-console-standalone/1.9.3/junit-platform-console-standalone-1.9.3.jar";
pub const JUNIT_LAUNCHER_CLASS: &str = "org.junit.platform.console.ConsoleLauncher";

/// Programs used to run each language's tests. Each script runner is a
/// program followed by leading arguments; the staged test path is appended.
#[derive(Debug, Clone)]
pub struct Runners {
  pub javascript: Vec<String>,
  pub python: Vec<String>,
  pub javac: String,
  pub java: String,
}

impl Default for Runners {
  fn default() -> Self {
    Self {
      javascript: vec!["npx".into(), "jest".into()],
      python: vec!["pytest".into()],
      javac: "javac".into(),
      java: "java".into(),
    }
  }
}

/// Filesystem layout, toolchain location, and execution limits.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
  /// Scratch root for the file under test.
  pub source_root: PathBuf,
  /// Scratch root for generated tests.
  pub test_root: PathBuf,
  /// Directory holding the JUnit console launcher archive.
  pub lib_dir: PathBuf,
  pub toolchain_archive: String,
  pub toolchain_url: String,
  pub runners: Runners,
  /// Deadline per execution step. `None` waits forever.
  pub exec_timeout: Option<Duration>,
}

impl Default for HarnessConfig {
  fn default() -> Self {
    Self {
      source_root: PathBuf::from("temp_src"),
      test_root: PathBuf::from("tests"),
      lib_dir: PathBuf::from("lib"),
      toolchain_archive: JUNIT_ARCHIVE_NAME.into(),
      toolchain_url: JUNIT_ARCHIVE_URL.into(),
      runners: Runners::default(),
      exec_timeout: Some(Duration::from_secs(600)),
    }
  }
}

impl HarnessConfig {
  /// Defaults overlaid with `HARNESS_*` environment variables.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(v) = std::env::var("HARNESS_SOURCE_ROOT") {
      config.source_root = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("HARNESS_TEST_ROOT") {
      config.test_root = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("HARNESS_LIB_DIR") {
      config.lib_dir = PathBuf::from(v);
    }
    if let Some(secs) = std::env::var("HARNESS_EXEC_TIMEOUT_SECS")
      .ok()
      .and_then(|v| v.trim().parse::<u64>().ok())
    {
      config.exec_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    config
  }

  /// Same layout rooted under `base`; handy for tests and sandboxes.
  pub fn rooted_at(base: impl Into<PathBuf>) -> Self {
    let base = base.into();
    Self {
      source_root: base.join("temp_src"),
      test_root: base.join("tests"),
      lib_dir: base.join("lib"),
      ..Self::default()
    }
  }

  pub fn toolchain_path(&self) -> PathBuf {
    self.lib_dir.join(&self.toolchain_archive)
  }
}
