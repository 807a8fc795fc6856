//! Command synthesis: turns a staged request into the runner invocation.
//!
//! Commands are argument vectors, never shell strings, so file and package
//! names reach the runner untouched.

use std::fmt;
use std::path::Path;

use crate::config::{Runners, JUNIT_LAUNCHER_CLASS};
use crate::error::CommandError;
use crate::staging::StagingArea;
use crate::types::{Language, StagedPaths};

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// One process to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
  pub program: String,
  pub args: Vec<String>,
}

impl CommandStep {
  fn from_argv(argv: &[String], extra: impl IntoIterator<Item = String>) -> Self {
    let (program, rest) = match argv.split_first() {
      Some((program, rest)) => (program.clone(), rest.to_vec()),
      None => (String::new(), Vec::new()),
    };
    let mut args = rest;
    args.extend(extra);
    Self { program, args }
  }
}

/// Steps run in order; the first failing step ends the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCommand {
  pub steps: Vec<CommandStep>,
}

impl fmt::Display for TestCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, step) in self.steps.iter().enumerate() {
      if i > 0 {
        f.write_str(" && ")?;
      }
      f.write_str(&step.program)?;
      for arg in &step.args {
        write!(f, " {arg}")?;
      }
    }
    Ok(())
  }
}

/// Build the invocation for `language` against what `staging` produced.
pub fn build_command(
  language: &Language,
  staged: &StagedPaths,
  staging: &StagingArea,
  toolchain: &Path,
  runners: &Runners,
) -> Result<TestCommand, CommandError> {
  let test_path = || staging.test_root().join(&staged.qualified_test_name).display().to_string();

  let steps = match language {
    Language::JavaScript => vec![CommandStep::from_argv(&runners.javascript, [test_path()])],
    Language::Python => vec![CommandStep::from_argv(&runners.python, [test_path()])],
    Language::Java => {
      let classpath = [
        toolchain,
        staging.source_root(),
        staging.test_root(),
        Path::new("."),
      ]
      .iter()
      .map(|p| p.display().to_string())
      .collect::<Vec<_>>()
      .join(CLASSPATH_SEPARATOR);

      vec![
        CommandStep {
          program: runners.javac.clone(),
          args: vec![
            "-cp".into(),
            classpath.clone(),
            staged.test_file.display().to_string(),
          ],
        },
        CommandStep {
          program: runners.java.clone(),
          args: vec![
            "-cp".into(),
            classpath,
            JUNIT_LAUNCHER_CLASS.into(),
            "--select-class".into(),
            staged.qualified_test_name.clone(),
          ],
        },
      ]
    }
    Language::Other(tag) => return Err(CommandError::UnsupportedLanguage(tag.clone())),
  };

  Ok(TestCommand { steps })
}
