//! The file record handed to resolution and wrapped by a tab.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::TabsResult;
use crate::fs::FileSystem;

/// A file opened from disk or created by a "new file" action.
///
/// `contents == None` means the file was never materialized; resolution
/// tolerates this and tab construction fills in default contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    #[serde(default)]
    pub contents: Option<String>,
    /// Absolute location, `None` while unsaved.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl File {
    /// An unsaved file with no contents.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: None,
            path: None,
        }
    }

    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Read `path` through `fs` into a saved file record.
    ///
    /// The name is the last path component; the stored path is canonical
    /// when the filesystem can canonicalize it.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> TabsResult<Self> {
        let contents = fs.read_file(path)?;
        let path = fs.canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            name,
            contents: Some(contents),
            path: Some(path),
        })
    }

    /// Contents as a string slice, empty when absent.
    pub fn contents_str(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }

    /// `true` when there are no contents or they are empty.
    pub fn is_empty(&self) -> bool {
        self.contents.as_deref().is_none_or(str::is_empty)
    }

    pub fn is_saved(&self) -> bool {
        self.path.is_some()
    }
}
