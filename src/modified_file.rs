//! A single file's change within one commit.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use git2::{Delta, DiffDelta, Oid, Repository, Tree};
use serde::Serialize;

use crate::diff::{parse_diff, DiffDeltaPath, ParsedDiff};
use crate::repo::DiffRepository;

/// Kind of change a file underwent in a commit.
///
/// Derived from the underlying git status; every status maps to exactly
/// one kind, with anything unrecognized folding to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChangeKind {
  Added,
  Copied,
  Renamed,
  Deleted,
  Modified,
  Unknown
}

impl From<Delta> for ChangeKind {
  fn from(status: Delta) -> Self {
    match status {
      Delta::Added => ChangeKind::Added,
      Delta::Copied => ChangeKind::Copied,
      Delta::Renamed => ChangeKind::Renamed,
      Delta::Deleted => ChangeKind::Deleted,
      Delta::Modified => ChangeKind::Modified,
      _ => ChangeKind::Unknown
    }
  }
}

/// Owned snapshot of a git2 delta, taken at construction so the record
/// outlives the diff it was enumerated from.
#[derive(Debug, Clone)]
pub struct ChangeDescriptor {
  status:   Delta,
  old_path: Option<PathBuf>,
  new_path: Option<PathBuf>
}

impl From<&DiffDelta<'_>> for ChangeDescriptor {
  fn from(delta: &DiffDelta<'_>) -> Self {
    Self {
      status:   delta.status(),
      old_path: DiffDeltaPath::old_path(delta),
      new_path: DiffDeltaPath::new_path(delta)
    }
  }
}

/// A function or method found in the file by a source-code analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
  pub name:       String,
  pub long_name:  String,
  pub start_line: u32,
  pub end_line:   u32
}

/// One file's change inside one commit.
///
/// The record is constructed once per (commit, changed path) pair by
/// whatever enumerates a commit's changes, and is immutable from then
/// on. Identity accessors (`change_kind`, paths) are pure; content
/// accessors (`diff_text`, `source_code`, `source_code_before`,
/// `parsed_diff`) re-open the repository for the duration of the call
/// and recompute their result every time, which is sound because commit
/// data never changes after construction.
#[derive(Debug)]
pub struct ModifiedFile {
  change:    ChangeDescriptor,
  repo_path: PathBuf,
  tree_id:   Oid,
  parent:    Option<Oid>,

  // Filled in by an external source-code analyzer, not computed here.
  pub nloc:           Option<u32>,
  pub complexity:     Option<u32>,
  pub token_count:    Option<u32>,
  pub methods:        Vec<Method>,
  pub methods_before: Vec<Method>
}

impl ModifiedFile {
  /// Creates a record for one delta of a commit's diff.
  ///
  /// `tree_id` is the tree of the commit being inspected (the "after"
  /// state); `parent` is absent exactly for a root commit.
  pub fn new(delta: &DiffDelta<'_>, repo_path: impl Into<PathBuf>, tree_id: Oid, parent: Option<Oid>) -> Self {
    Self {
      change: ChangeDescriptor::from(delta),
      repo_path: repo_path.into(),
      tree_id,
      parent,
      nloc: None,
      complexity: None,
      token_count: None,
      methods: Vec::new(),
      methods_before: Vec::new()
    }
  }

  pub fn change_kind(&self) -> ChangeKind {
    ChangeKind::from(self.change.status)
  }

  /// Old path of the file. `None` if the file was added.
  pub fn old_path(&self) -> Option<&Path> {
    self.change.old_path.as_deref()
  }

  /// New path of the file. `None` if the file was deleted.
  pub fn new_path(&self) -> Option<&Path> {
    self.change.new_path.as_deref()
  }

  /// The full path of the file, taken from the new side when it exists.
  ///
  /// Every change touches at least one side, so a descriptor with
  /// neither path is corrupt and this panics.
  pub fn filepath(&self) -> &Path {
    self
      .new_path()
      .or_else(|| self.old_path())
      .expect("change descriptor has neither an old nor a new path")
  }

  /// The last component of [`filepath`](Self::filepath), e.g.
  /// `src/main.rs` becomes `main.rs`.
  pub fn filename(&self) -> String {
    let path = self.filepath();
    path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| path.to_string_lossy().into_owned())
  }

  /// The unified-diff text for this file's change.
  ///
  /// Fails if the repository cannot be opened or the commit's trees can
  /// no longer be resolved.
  pub fn diff_text(&self) -> Result<String> {
    profile!("Generate diff text");
    log::debug!("Formatting diff for {}", self.filepath().display());

    let repo = self.open_repository()?;
    let new_tree = repo
      .find_tree(self.tree_id)
      .context("Failed to resolve commit tree")?;
    let old_tree = self.parent_tree(&repo)?;

    let pathspecs: Vec<&Path> = [self.old_path(), self.new_path()].into_iter().flatten().collect();

    repo.format_file_diff(old_tree.as_ref(), &new_tree, &pathspecs)
  }

  /// The file's content before the change, or `None` when no prior
  /// version exists (an added file, or a path missing from the parent
  /// tree).
  pub fn source_code_before(&self) -> Result<Option<String>> {
    profile!("Read source before change");

    let repo = self.open_repository()?;
    let tree = match self.parent_tree(&repo)? {
      Some(tree) => tree,
      None => {
        repo
          .find_tree(self.tree_id)
          .context("Failed to resolve commit tree")?
      }
    };

    let path = self.old_path().unwrap_or_else(|| self.filepath()).to_path_buf();
    repo.blob_text(&tree, &path)
  }

  /// The file's content after the change, or `None` when the path no
  /// longer exists (a deleted file).
  pub fn source_code(&self) -> Result<Option<String>> {
    profile!("Read source after change");

    let repo = self.open_repository()?;
    let tree = repo
      .find_tree(self.tree_id)
      .context("Failed to resolve commit tree")?;

    let path = self.new_path().unwrap_or_else(|| self.filepath()).to_path_buf();
    repo.blob_text(&tree, &path)
  }

  /// The diff text parsed into line-numbered deletions and additions.
  pub fn parsed_diff(&self) -> Result<ParsedDiff> {
    profile!("Parse diff text");
    parse_diff(&self.diff_text()?).map_err(Into::into)
  }

  fn open_repository(&self) -> Result<Repository> {
    Repository::open(&self.repo_path).with_context(|| format!("Failed to open repository at {}", self.repo_path.display()))
  }

  /// The parent commit's tree, or `None` for a root commit.
  fn parent_tree<'repo>(&self, repo: &'repo Repository) -> Result<Option<Tree<'repo>>> {
    match self.parent {
      Some(parent_id) => {
        let commit = repo
          .find_commit(parent_id)
          .context("Failed to resolve parent commit")?;
        Ok(Some(commit.tree().context("Failed to resolve parent tree")?))
      }
      None => Ok(None)
    }
  }
}

impl std::fmt::Display for ModifiedFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:?}({})", self.change_kind(), self.filepath().display())
  }
}
