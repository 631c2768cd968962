//! Unified-diff text parsing.

use serde::Serialize;
use thiserror::Error;

// Error definitions
#[derive(Error, Debug)]
pub enum DiffError {
  #[error("Malformed hunk header: {0:?}")]
  MalformedHunkHeader(String)
}

/// The line-numbered result of parsing one file's unified diff.
///
/// Line numbers are 1-based: `deleted` entries are numbered against the
/// old version of the file, `added` entries against the new one. Both
/// sequences preserve the order the lines appear in the diff text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDiff {
  pub deleted: Vec<(u32, String)>,
  pub added:   Vec<(u32, String)>
}

impl ParsedDiff {
  pub fn is_empty(&self) -> bool {
    self.deleted.is_empty() && self.added.is_empty()
  }
}

/// Parse unified-diff text into deleted and added lines.
///
/// Walks the diff line by line keeping one running line counter per side.
/// Every line advances both counters; a hunk header resets them to the
/// start numbers it declares; a `-` line records against the old file and
/// rolls the addition counter back (the line has no position in the new
/// file), and a `+` line does the symmetric thing. The `---`/`+++` file
/// headers are recognized by their exact 3-character prefix and never
/// recorded as content.
///
/// # Errors
///
/// A hunk header whose range fields do not parse is fatal: every line
/// number after it would be wrong, so the parser refuses to continue
/// rather than silently skipping the header.
pub fn parse_diff(diff: &str) -> Result<ParsedDiff, DiffError> {
  log::debug!("Parsing diff with {} lines", diff.lines().count());

  let mut parsed = ParsedDiff::default();
  let mut deletion_line: i64 = 0;
  let mut addition_line: i64 = 0;

  for line in diff.lines() {
    deletion_line += 1;
    addition_line += 1;

    if line.starts_with("@@") {
      let (old_start, new_start) = hunk_start_lines(line)?;
      deletion_line = old_start - 1;
      addition_line = new_start - 1;
    }

    if line.starts_with('-') && !line.starts_with("---") {
      parsed.deleted.push((deletion_line as u32, line[1..].to_string()));
      addition_line -= 1;
    }

    if line.starts_with('+') && !line.starts_with("+++") {
      parsed.added.push((addition_line as u32, line[1..].to_string()));
      deletion_line -= 1;
    }
  }

  Ok(parsed)
}

/// Extracts the old and new start line numbers from a hunk header such as
/// `@@ -10,3 +10,4 @@ fn main()`. The `,count` suffix is optional and
/// ignored; only the start numbers matter.
fn hunk_start_lines(header: &str) -> Result<(i64, i64), DiffError> {
  let malformed = || DiffError::MalformedHunkHeader(header.to_string());

  let mut fields = header.split(' ');
  let old_range = fields.nth(1).ok_or_else(malformed)?;
  let new_range = fields.next().ok_or_else(malformed)?;

  let old_start = start_number(old_range, '-').ok_or_else(malformed)?;
  let new_start = start_number(new_range, '+').ok_or_else(malformed)?;

  Ok((old_start, new_start))
}

fn start_number(range: &str, sign: char) -> Option<i64> {
  let range = range.strip_prefix(sign)?;
  let start = range.split(',').next()?;
  start.parse().ok()
}
