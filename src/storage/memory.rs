//! In-process record store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{check_line, RecordStore};
use crate::error::Result;

// == Memory Store ==
/// Non-durable store. Clones share the same lines, so a test can keep a
/// handle while the cache owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with raw lines, oldest first.
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Arc::new(Mutex::new(lines.into_iter().map(Into::into).collect())),
        }
    }

    /// Snapshot of the raw lines.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<String>> {
        Ok(self
            .guard()
            .iter()
            .filter(|line| !line.trim().is_empty())
            .cloned()
            .collect())
    }

    fn append(&mut self, line: &str) -> Result<()> {
        check_line(line)?;
        self.guard().push(line.to_string());
        Ok(())
    }

    fn truncate(&mut self) -> Result<()> {
        self.guard().clear();
        Ok(())
    }

    fn replace_all(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            check_line(line)?;
        }
        *self.guard() = lines.to_vec();
        Ok(())
    }
}
