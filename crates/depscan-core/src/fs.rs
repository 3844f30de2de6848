//! File system view handed to the scanning engine.
//!
//! A worker is bound to one [`FileSystem`] for its lifetime. Hosts that scan
//! the real disk use [`PhysicalFileSystem`]; tests and embedders with
//! in-memory overlays supply their own.

use std::fmt::Debug;
use std::io;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// Read-only file system operations the engine needs.
pub trait FileSystem: Send + Sync + Debug {
    /// Read a file's contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Check whether a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check whether a path is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Resolve `path` against `working_directory` and normalize `.` / `..`.
    fn resolve(&self, working_directory: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            working_directory.join(path).clean()
        }
    }
}

/// The host's physical file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhysicalFileSystem;

impl PhysicalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for PhysicalFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
