#![allow(dead_code)]

use std::fs;

use anyhow::Result;
use git2::{Commit, IndexAddOption, Oid, Repository, Signature};
use tempfile::TempDir;

use driller::ModifiedFile;

pub fn init_logs() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// A throwaway git repository for exercising record accessors.
pub struct TestRepo {
  pub repo: Repository,
  pub dir:  TempDir
}

impl Default for TestRepo {
  fn default() -> Self {
    let dir = TempDir::new().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    Self { repo, dir }
  }
}

impl TestRepo {
  pub fn write_file(&self, name: &str, content: &str) -> Result<()> {
    let path = self.dir.path().join(name);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
  }

  pub fn delete_file(&self, name: &str) -> Result<()> {
    fs::remove_file(self.dir.path().join(name))?;
    Ok(())
  }

  pub fn rename_file(&self, from: &str, to: &str) -> Result<()> {
    fs::rename(self.dir.path().join(from), self.dir.path().join(to))?;
    Ok(())
  }

  /// Stages everything in the working tree, deletions included, and
  /// commits it on HEAD.
  pub fn commit_all(&self, message: &str) -> Result<Oid> {
    let mut index = self.repo.index()?;
    index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
    index.update_all(["*"], None)?;
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = self.repo.find_tree(tree_id)?;

    let signature = Signature::now("Test User", "test@example.com")?;
    let parent = self.repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    Ok(
      self
        .repo
        .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?
    )
  }

  /// Enumerates a commit's changes the way a mining layer would: diff
  /// the parent tree (or the empty tree for a root commit) against the
  /// commit tree and build one record per delta.
  pub fn modified_files(&self, commit_id: Oid) -> Result<Vec<ModifiedFile>> {
    let commit = self.repo.find_commit(commit_id)?;
    let tree = commit.tree()?;
    let parent = commit.parents().next();
    let parent_tree = parent.as_ref().map(|parent| parent.tree()).transpose()?;

    let mut diff = self
      .repo
      .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    diff.find_similar(None)?;

    Ok(
      diff
        .deltas()
        .map(|delta| ModifiedFile::new(&delta, self.dir.path(), tree.id(), parent.as_ref().map(|parent| parent.id())))
        .collect()
    )
  }
}
