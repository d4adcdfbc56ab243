//! File loading and location tracking.
//!
//! `SourceManager` owns every source buffer the compiler touches and hands out
//! dense `FileId`s in return. `SourceLocation`/`SourceRange` are opaque byte
//! offsets into a file's buffer; (line, column) is derived on demand rather
//! than stored, so hot paths that never render a diagnostic never pay for it.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Dense integer identifying a loaded file. `FileId(0)` is reserved invalid so
/// a default-constructed location can never alias a real file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(u32);

impl FileId {
    pub const INVALID: FileId = FileId(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// An opaque offset into a single file's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: FileId,
    pub offset: u32,
}

impl SourceLocation {
    pub fn invalid() -> Self {
        Self {
            file: FileId::INVALID,
            offset: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.file.is_valid()
    }
}

/// A half-open byte range within a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub file: FileId,
    pub start: u32,
    pub end: u32,
}

impl SourceRange {
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    pub fn start_location(&self) -> SourceLocation {
        SourceLocation {
            file: self.file,
            offset: self.start,
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// 1-based line/column, resolved lazily from a `SourceLocation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

struct FileEntry {
    name: String,
    path: Option<PathBuf>,
    buffer: String,
    /// Byte offset of the start of each line, computed once on insertion.
    line_starts: Vec<u32>,
}

#[derive(Debug, Error)]
pub enum SourceLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Owns every file buffer loaded during a compilation instance.
#[derive(Default)]
pub struct SourceManager {
    files: Vec<FileEntry>,
    by_path: HashMap<PathBuf, FileId>,
}

impl SourceManager {
    pub fn new() -> Self {
        // index 0 is the reserved invalid FileId; push a placeholder so
        // `files[id.0 - 1]` indexing stays simple everywhere else.
        Self {
            files: Vec::new(),
            by_path: HashMap::new(),
        }
    }

    /// Load a file from disk, or return the existing `FileId` if it was
    /// already loaded under the same canonical-ish path.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<FileId, SourceLoadError> {
        let path = path.as_ref();
        if let Some(id) = self.by_path.get(path) {
            return Ok(*id);
        }
        let buffer = fs::read_to_string(path).map_err(|source| SourceLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.add_buffer(path.display().to_string(), Some(path.to_path_buf()), buffer))
    }

    /// Register an in-memory buffer (used by the LSP, where the client sends
    /// document text directly instead of a file on disk).
    pub fn add_virtual_file(&mut self, name: impl Into<String>, buffer: impl Into<String>) -> FileId {
        self.add_buffer(name.into(), None, buffer.into())
    }

    fn add_buffer(&mut self, name: String, path: Option<PathBuf>, buffer: String) -> FileId {
        let line_starts = compute_line_starts(&buffer);
        self.files.push(FileEntry {
            name,
            path: path.clone(),
            buffer,
            line_starts,
        });
        let id = FileId(self.files.len() as u32);
        if let Some(p) = path {
            self.by_path.insert(p, id);
        }
        id
    }

    pub fn file_name(&self, id: FileId) -> &str {
        self.entry(id).map(|e| e.name.as_str()).unwrap_or("<unknown>")
    }

    pub fn file_path(&self, id: FileId) -> Option<&Path> {
        self.entry(id).and_then(|e| e.path.as_deref())
    }

    pub fn buffer(&self, id: FileId) -> &str {
        self.entry(id).map(|e| e.buffer.as_str()).unwrap_or("")
    }

    fn entry(&self, id: FileId) -> Option<&FileEntry> {
        if !id.is_valid() {
            return None;
        }
        self.files.get(id.0 as usize - 1)
    }

    /// Resolve a `SourceLocation` to 1-based (line, column) via binary search
    /// over pre-computed line starts.
    pub fn line_col(&self, loc: SourceLocation) -> LineCol {
        let Some(entry) = self.entry(loc.file) else {
            return LineCol { line: 0, column: 0 };
        };
        let offset = loc.offset;
        let line_idx = match entry.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = entry.line_starts.get(line_idx).copied().unwrap_or(0);
        LineCol {
            line: line_idx + 1,
            column: (offset - line_start) as usize + 1,
        }
    }

    pub fn line_text(&self, file: FileId, line: usize) -> Option<&str> {
        let entry = self.entry(file)?;
        let start = *entry.line_starts.get(line.checked_sub(1)?)? as usize;
        let end = entry
            .line_starts
            .get(line)
            .copied()
            .map(|o| o as usize)
            .unwrap_or(entry.buffer.len());
        Some(entry.buffer[start..end].trim_end_matches(['\n', '\r']))
    }
}

fn compute_line_starts(buffer: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, b) in buffer.bytes().enumerate() {
        if b == b'\n' {
            starts.push(i as u32 + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_file_id_is_zero() {
        assert!(!FileId::INVALID.is_valid());
    }

    #[test]
    fn line_col_round_trip() {
        let mut sm = SourceManager::new();
        let id = sm.add_virtual_file("t.yu", "abc\ndef\nghi");
        assert_eq!(
            sm.line_col(SourceLocation { file: id, offset: 0 }),
            LineCol { line: 1, column: 1 }
        );
        assert_eq!(
            sm.line_col(SourceLocation { file: id, offset: 4 }),
            LineCol { line: 2, column: 1 }
        );
        assert_eq!(
            sm.line_col(SourceLocation { file: id, offset: 9 }),
            LineCol { line: 3, column: 2 }
        );
    }

    #[test]
    fn duplicate_path_returns_same_id() {
        let mut sm = SourceManager::new();
        let a = sm.add_virtual_file("a.yu", "x");
        // add_virtual_file never dedups (no path key); load_file does. This
        // just documents that distinct virtual files get distinct ids.
        let b = sm.add_virtual_file("a.yu", "y");
        assert_ne!(a, b);
    }
}
