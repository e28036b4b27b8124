//! File-backed record store.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{check_line, RecordStore};
use crate::error::Result;

// == File Store ==
/// Durable store: one UTF-8 line per record, `\n` terminated.
///
/// Bytes that are not UTF-8 are read back lossily, so such a line surfaces
/// as an unreadable record instead of failing the whole read.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    // == Constructor ==
    /// Opens a store at `path`, creating missing parent directories.
    ///
    /// The file itself is created lazily on first write; a missing file
    /// reads as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl RecordStore for FileStore {
    fn read_all(&self) -> Result<Vec<String>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        // Decode per line so one damaged record cannot hide the others
        Ok(content
            .split(|&byte| byte == b'\n')
            .map(|raw| raw.strip_suffix(b"\r").unwrap_or(raw))
            .enumerate()
            .filter_map(|(index, raw)| {
                let line = match std::str::from_utf8(raw) {
                    Ok(line) => line.to_string(),
                    Err(err) => {
                        warn!(
                            "Line {} of {} is not valid UTF-8: {}",
                            index + 1,
                            self.path.display(),
                            err
                        );
                        String::from_utf8_lossy(raw).into_owned()
                    }
                };
                (!line.trim().is_empty()).then_some(line)
            })
            .collect())
    }

    fn append(&mut self, line: &str) -> Result<()> {
        check_line(line)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn truncate(&mut self) -> Result<()> {
        self.replace_all(&[])
    }

    fn replace_all(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            check_line(line)?;
        }

        // Write beside the target so the rename stays on one filesystem
        let mut temp = NamedTempFile::new_in(self.dir())?;
        for line in lines {
            writeln!(temp, "{line}")?;
        }
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|err| err.error)?;

        debug!(
            "Rewrote {} with {} lines",
            self.path.display(),
            lines.len()
        );
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatsError;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("cache.txt")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_append_and_read_in_order() {
        let (_dir, mut store) = temp_store();

        store.append("first").unwrap();
        store.append("second").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["first", "second"]);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "first\nsecond\n");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "a\n\n  \nb\n").unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_fail_read() {
        let (_dir, store) = temp_store();
        let mut raw = b"1700000000 -//- {\"name\":\"St".to_vec();
        raw.push(0xFF);
        raw.extend_from_slice(b"eve\"}\r\nvalid line\n");
        fs::write(store.path(), raw).unwrap();

        let lines = store.read_all().unwrap();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains('\u{FFFD}'));
        assert_eq!(lines[1], "valid line");
    }

    #[test]
    fn test_truncate_empties_store() {
        let (_dir, mut store) = temp_store();

        store.append("entry").unwrap();
        store.truncate().unwrap();

        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn test_replace_all_swaps_content() {
        let (dir, mut store) = temp_store();

        store.append("old1").unwrap();
        store.append("old2").unwrap();
        store
            .replace_all(&["new1".to_string(), "new2".to_string()])
            .unwrap();

        assert_eq!(store.read_all().unwrap(), vec!["new1", "new2"]);

        // No temporary files left behind
        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("cache.txt");

        let mut store = FileStore::open(&nested).unwrap();
        store.append("x").unwrap();

        assert!(nested.exists());
    }

    #[test]
    fn test_append_rejects_embedded_newline() {
        let (_dir, mut store) = temp_store();

        let result = store.append("one\ntwo");
        assert!(matches!(result, Err(StatsError::InvalidRequest(_))));
        assert!(store.read_all().unwrap().is_empty());
    }
}
