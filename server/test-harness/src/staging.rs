//! Staging area: writes the file under test and its generated test into the
//! two scratch roots, in the places each language's runner expects them.
//!
//! Paths are keyed only by file name, so a second request for the same name
//! overwrites the first. Callers must not stage two requests concurrently.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StagingError;
use crate::package;
use crate::types::{ExecutionRequest, Language, StagedPaths};

/// The two scratch roots.
#[derive(Debug, Clone)]
pub struct StagingArea {
  source_root: PathBuf,
  test_root: PathBuf,
}

impl StagingArea {
  pub fn new(source_root: impl Into<PathBuf>, test_root: impl Into<PathBuf>) -> Self {
    Self {
      source_root: source_root.into(),
      test_root: test_root.into(),
    }
  }

  pub fn source_root(&self) -> &Path {
    &self.source_root
  }

  pub fn test_root(&self) -> &Path {
    &self.test_root
  }

  /// Write both files for `req` and report where they went.
  pub fn stage(&self, req: &ExecutionRequest) -> Result<StagedPaths, StagingError> {
    create_dir(&self.source_root)?;
    create_dir(&self.test_root)?;

    let test_name = test_file_name(&req.file_name, &req.language);
    let mut source_dir = self.source_root.clone();
    let mut test_dir = self.test_root.clone();
    let mut qualified_test_name = test_name.clone();

    if req.language == Language::Java {
      if let Some(pkg) = req.source().and_then(package::declared_package) {
        source_dir.push(package::package_dir(&pkg));
        create_dir(&source_dir)?;
      }

      let class_name = test_name.strip_suffix(".java").unwrap_or(&test_name);
      qualified_test_name = match package::declared_package(&req.test_code) {
        Some(pkg) => {
          test_dir.push(package::package_dir(&pkg));
          create_dir(&test_dir)?;
          format!("{pkg}.{class_name}")
        }
        None => class_name.to_string(),
      };
    }

    let test_file = test_dir.join(&test_name);
    replace_file(&test_file, &req.test_code)?;

    let source_file = match req.source() {
      Some(code) => {
        let path = source_dir.join(&req.file_name);
        replace_file(&path, code)?;
        Some(path)
      }
      None => None,
    };

    debug!(
      test_file = %test_file.display(),
      qualified = %qualified_test_name,
      "staged"
    );

    Ok(StagedPaths {
      source_file,
      test_file,
      qualified_test_name,
    })
  }
}

/// Test file name by each runner's discovery convention.
pub fn test_file_name(file_name: &str, language: &Language) -> String {
  match language {
    Language::JavaScript => match file_name.strip_suffix(".js") {
      Some(stem) => format!("{stem}.test.js"),
      None => format!("{file_name}.test.js"),
    },
    Language::Java => match file_name.strip_suffix(".java") {
      Some(stem) => format!("{stem}Test.java"),
      None => format!("{file_name}Test.java"),
    },
    Language::Python if file_name.starts_with("test_") => file_name.to_string(),
    Language::Python | Language::Other(_) => format!("test_{file_name}"),
  }
}

fn create_dir(path: &Path) -> Result<(), StagingError> {
  fs::create_dir_all(path).map_err(|source| StagingError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

/// Remove whatever a previous run left at `path`, then write `content`.
fn replace_file(path: &Path, content: &str) -> Result<(), StagingError> {
  match fs::remove_file(path) {
    Ok(()) => debug!(path = %path.display(), "removed stale file"),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
    Err(source) => {
      return Err(StagingError::Remove {
        path: path.to_path_buf(),
        source,
      })
    }
  }
  fs::write(path, content).map_err(|source| StagingError::Write {
    path: path.to_path_buf(),
    source,
  })
}
