#[macro_export]
macro_rules! profile {
  ($name:expr) => {{
    let _span = tracing::span!(tracing::Level::DEBUG, $name);
    let _enter = _span.enter();
  }};
}

pub mod diff;
pub mod modified_file;
pub mod repo;

// Re-exports
pub use diff::{parse_diff, DiffError, ParsedDiff};
pub use modified_file::{ChangeKind, ModifiedFile};
pub use repo::DiffRepository;
