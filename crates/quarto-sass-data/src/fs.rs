//! File access used by resolution and loading.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! The resolver only needs existence checks and the loader only needs whole
//! file reads, so the seam is two methods wide. `NativeFs` goes to `std::fs`;
//! `MemoryFs` serves files registered up front, which lets hosts without a
//! real file system (and tests) drive the importers.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

/// File system operations needed by the data importers.
pub trait ImportFs: Debug + Send + Sync {
    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Read the whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The host file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeFs;

impl ImportFs for NativeFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// An in-memory file system keyed by absolute path.
#[derive(Debug, Default, Clone)]
pub struct MemoryFs {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, builder style.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl ImportFs for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_serves_registered_files() {
        let fs = MemoryFs::new().with_file("/data/vars.yml", "color: red");

        assert!(fs.is_file(Path::new("/data/vars.yml")));
        assert!(!fs.is_file(Path::new("/data")));
        assert_eq!(fs.read(Path::new("/data/vars.yml")).unwrap(), b"color: red");
    }

    #[test]
    fn test_memory_fs_missing_file_is_not_found() {
        let fs = MemoryFs::new();
        let err = fs.read(Path::new("/nope.yml")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_native_fs_distinguishes_files_from_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vars.json");
        std::fs::write(&file, "{}").unwrap();

        assert!(NativeFs.is_file(&file));
        assert!(!NativeFs.is_file(dir.path()));
        assert_eq!(NativeFs.read(&file).unwrap(), b"{}");
    }
}
