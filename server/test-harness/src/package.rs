//! Java package declarations: find them and map them onto directories.

use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

fn package_pattern() -> Option<&'static Regex> {
  static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
  PATTERN
    .get_or_init(|| Regex::new(r"\bpackage\s+([^;]*);").ok())
    .as_ref()
}

fn is_identifier(segment: &str) -> bool {
  let mut chars = segment.chars();
  chars
    .next()
    .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
    && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// First `package a.b.c;` declaration in `code`, whitespace removed.
///
/// The first textual match wins, including one inside a comment. If that
/// match is not a dotted identifier (`package ..;`) the code has no package;
/// later declarations are not consulted.
pub fn declared_package(code: &str) -> Option<String> {
  let caps = package_pattern()?.captures(code)?;
  let segments: Vec<&str> = caps[1].split('.').map(str::trim).collect();
  segments
    .iter()
    .all(|s| is_identifier(s))
    .then(|| segments.join("."))
}

/// `com.example.util` -> `com/example/util`.
pub fn package_dir(package: &str) -> PathBuf {
  package.split('.').collect()
}
