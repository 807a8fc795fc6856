//! PushTest Test Harness: commit-to-verdict core.
//!
//! Stages a modified file and its generated test into per-language scratch
//! roots, synthesizes the runner invocation (jest, pytest, or javac plus the
//! JUnit console launcher), runs it, and reports `{ success, output, error }`.
//!
//! Staging paths are keyed by file name only; drive one request at a time.

pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod harness;
pub mod package;
pub mod provision;
pub mod staging;
pub mod types;

pub use config::HarnessConfig;
pub use error::{CommandError, ProvisionError, StagingError};
pub use harness::Harness;
pub use provision::{ProvisionOutcome, Toolchain};
pub use types::{ExecutionRequest, ExecutionResult, Language, StagedPaths};
