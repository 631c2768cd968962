//! Extension traits for diff processing.

use std::path::PathBuf;

/// Extension trait for git2::DiffDelta to get file paths.
///
/// libgit2 marks a side that does not exist (the old side of an added
/// file, the new side of a deleted one) on the `DiffFile` itself; these
/// accessors fold that marker into `None` so callers never compare
/// against a sentinel path.
pub trait DiffDeltaPath {
  fn old_path(&self) -> Option<PathBuf>;
  fn new_path(&self) -> Option<PathBuf>;

  /// The path of the side that exists, preferring the new one.
  fn path(&self) -> PathBuf {
    self
      .new_path()
      .or_else(|| self.old_path())
      .unwrap_or_default()
  }
}

impl DiffDeltaPath for git2::DiffDelta<'_> {
  fn old_path(&self) -> Option<PathBuf> {
    let file = self.old_file();
    if file.exists() {
      file.path().map(PathBuf::from)
    } else {
      None
    }
  }

  fn new_path(&self) -> Option<PathBuf> {
    let file = self.new_file();
    if file.exists() {
      file.path().map(PathBuf::from)
    } else {
      None
    }
  }
}

/// Extension trait for converting bytes to UTF-8 strings
pub trait Utf8String {
  fn to_utf8(&self) -> String;
}

impl Utf8String for [u8] {
  fn to_utf8(&self) -> String {
    // Fast path for valid UTF-8 (most common case)
    if let Ok(s) = std::str::from_utf8(self) {
      return s.to_string();
    }
    // Fallback for invalid UTF-8
    String::from_utf8_lossy(self).into_owned()
  }
}
