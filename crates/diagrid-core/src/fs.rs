//! Filesystem abstraction for loading diagram files.
//!
//! Persistence is owned by the host application; this module only covers the
//! read side needed to turn a path into a [`File`](crate::File) record.
//!
//! Production code uses `RealFileSystem`:
//!
//! ```ignore
//! let file = File::load(&RealFileSystem::default(), Path::new("order.bpmn"))?;
//! ```
//!
//! Tests use `MockFileSystem`:
//!
//! ```ignore
//! let mut mock = MockFileSystem::new();
//! mock.add_file("diagrams/order.bpmn", "<bpmn:definitions ...>");
//! let file = File::load(&mock, Path::new("diagrams/order.bpmn"))?;
//! ```

use crate::error::{TabsError, TabsResult};
use std::io;
use std::path::{Path, PathBuf};

/// Default upper bound for files opened in the editor (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Trait abstracting the filesystem reads performed when opening files.
pub trait FileSystem: Send + Sync + std::fmt::Debug {
    /// Read the contents of a file as a UTF-8 string.
    ///
    /// Implementations reject non-regular files and oversized files.
    fn read_file(&self, path: &Path) -> TabsResult<String>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Absolute, normalized form of `path`.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// Real filesystem implementation backed by `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct RealFileSystem {
    max_file_size: u64,
}

impl RealFileSystem {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> TabsResult<String> {
        let metadata = std::fs::metadata(path).map_err(|e| TabsError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_file() {
            return Err(TabsError::FileNotRegular {
                path: path.to_path_buf(),
            });
        }

        if metadata.len() > self.max_file_size {
            return Err(TabsError::FileTooBig {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit: self.max_file_size,
            });
        }

        std::fs::read_to_string(path).map_err(|e| TabsError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

pub mod mock {
    //! In-memory filesystem for tests.

    use super::*;
    use std::collections::HashMap;

    /// Mock filesystem holding files in memory.
    ///
    /// # Example
    ///
    /// ```
    /// use diagrid_core::fs::{FileSystem, mock::MockFileSystem};
    /// use std::path::Path;
    ///
    /// let mut mock = MockFileSystem::new();
    /// mock.add_file("/work/a.dmn", "<definitions/>");
    ///
    /// assert!(mock.exists(Path::new("/work/a.dmn")));
    /// assert_eq!(mock.read_file(Path::new("/work/./a.dmn")).unwrap(), "<definitions/>");
    /// ```
    #[derive(Debug, Default)]
    pub struct MockFileSystem {
        files: HashMap<PathBuf, String>,
    }

    impl MockFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a file with the given content.
        pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
            self.files.insert(normalize_path(path.as_ref()), content.into());
        }
    }

    impl FileSystem for MockFileSystem {
        fn read_file(&self, path: &Path) -> TabsResult<String> {
            self.files
                .get(&normalize_path(path))
                .cloned()
                .ok_or_else(|| TabsError::FileRead {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::NotFound, "file not found in mock"),
                })
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(&normalize_path(path))
        }

        fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
            Ok(normalize_path(path))
        }
    }

    /// Drop `.` components and resolve `..` lexically.
    fn normalize_path(path: &Path) -> PathBuf {
        use std::path::Component;

        let mut result = PathBuf::new();
        for component in path.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    result.pop();
                }
                other => result.push(other.as_os_str()),
            }
        }
        result
    }

}
