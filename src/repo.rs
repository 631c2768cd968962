//! Thin extension layer over git2 for diff formatting and blob access.
//!
//! Everything the record layer needs from the version-control library
//! goes through this trait, so the git plumbing stays in one place.

use std::path::Path;

use anyhow::{Context, Result};
use git2::{DiffFormat, DiffOptions, ErrorCode, Repository, Tree};

use crate::diff::Utf8String;

pub trait DiffRepository {
  /// Formats the diff between two trees as unified-diff text, restricted
  /// to the given pathspecs. `None` for the old tree diffs against the
  /// empty tree, which is how a root commit's changes are rendered.
  fn format_file_diff(&self, old_tree: Option<&Tree<'_>>, new_tree: &Tree<'_>, pathspecs: &[&Path]) -> Result<String>;

  /// Reads the blob at `path` inside `tree` and decodes it as UTF-8.
  /// A path that does not exist in the tree, or one that does not point
  /// at a locatable blob, yields `None` rather than an error.
  fn blob_text(&self, tree: &Tree<'_>, path: &Path) -> Result<Option<String>>;
}

impl DiffRepository for Repository {
  fn format_file_diff(&self, old_tree: Option<&Tree<'_>>, new_tree: &Tree<'_>, pathspecs: &[&Path]) -> Result<String> {
    profile!("Format file diff");

    let mut opts = DiffOptions::new();
    for pathspec in pathspecs {
      opts.pathspec(pathspec);
    }

    let mut diff = self
      .diff_tree_to_tree(old_tree, Some(new_tree), Some(&mut opts))
      .context("Failed to diff trees")?;

    // Collapse delete/add pairs back into renames so a renamed file
    // formats as the single entry its change descriptor describes.
    diff.find_similar(None).context("Failed to detect renames")?;

    let mut text = String::new();
    diff
      .print(DiffFormat::Patch, |_delta, _hunk, line| {
        // Content lines carry their origin out of band; re-attach it so
        // the output is the unified-diff text the parser expects.
        match line.origin() {
          '+' | '-' | ' ' => text.push(line.origin()),
          _ => {}
        }
        text.push_str(&line.content().to_utf8());
        true
      })
      .context("Failed to format diff")?;

    Ok(text)
  }

  fn blob_text(&self, tree: &Tree<'_>, path: &Path) -> Result<Option<String>> {
    profile!("Read blob content");

    let entry = match tree.get_path(path) {
      Ok(entry) => entry,
      Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
      Err(err) => return Err(err).with_context(|| format!("Failed to walk tree for {}", path.display()))
    };

    let blob = match self.find_blob(entry.id()) {
      Ok(blob) => blob,
      Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
      Err(err) => return Err(err).with_context(|| format!("Failed to read blob for {}", path.display()))
    };

    Ok(Some(blob.content().to_utf8()))
  }
}
