//! Storage Module
//!
//! Line-oriented record stores used as the cache's persistence capability.
//! Every operation re-reads or rewrites the whole store, which keeps the
//! contract simple for stores bounded to a few hundred lines.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt::Debug;

use crate::error::{Result, StatsError};

// == Record Store ==
/// Ordered sequence of raw lines, oldest first.
pub trait RecordStore: Send + Debug {
    /// Returns every non-blank line in written order.
    fn read_all(&self) -> Result<Vec<String>>;

    /// Appends one line; the store adds the terminator.
    fn append(&mut self, line: &str) -> Result<()>;

    /// Empties the store. Subsequent reads see zero lines.
    fn truncate(&mut self) -> Result<()>;

    /// Replaces the full content in one step: readers see either the old
    /// lines or the new ones, never a mix.
    fn replace_all(&mut self, lines: &[String]) -> Result<()>;
}

/// Rejects lines that would split into several records.
pub(crate) fn check_line(line: &str) -> Result<()> {
    if line.contains('\n') || line.contains('\r') {
        return Err(StatsError::InvalidRequest(
            "record lines cannot contain line terminators".to_string(),
        ));
    }
    Ok(())
}
