//! Error types for provider resolution and session construction

use std::path::PathBuf;
use thiserror::Error;

pub type TabsResult<T> = Result<T, TabsError>;

/// Errors raised by the registry, the session factory and capability loading.
///
/// Resolution itself never fails: an unrecognized file is reported as `None`
/// by [`resolve`](crate::resolve) and [`SessionFactory::create_tab`](crate::SessionFactory::create_tab).
/// The variants below cover wiring mistakes, capability loading, I/O and
/// configuration files.
#[derive(Error, Debug)]
pub enum TabsError {
    /// `create_file` was asked for a type that is not registered.
    ///
    /// Only internal menu wiring can trigger this, so callers should treat it
    /// as a programming error.
    #[error("Unknown provider type: {provider_type}")]
    UnknownProviderType { provider_type: String },

    /// The provider exists but declares no default filename.
    #[error("Provider '{provider_type}' does not support creating new files")]
    NotCreatable { provider_type: String },

    #[error("Provider type registered twice: {provider_type}")]
    DuplicateProvider { provider_type: String },

    #[error("Failed to load editor component for '{provider_type}': {message}")]
    CapabilityLoad {
        provider_type: String,
        message: String,
    },

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a regular file: {path}")]
    FileNotRegular { path: PathBuf },

    #[error("File too large: {path} ({size} bytes, limit {limit} bytes)")]
    FileTooBig {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Invalid configuration in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

impl TabsError {
    /// Returns `true` for errors caused by wiring mistakes rather than input data.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            TabsError::UnknownProviderType { .. }
                | TabsError::NotCreatable { .. }
                | TabsError::DuplicateProvider { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_message_names_type() {
        let err = TabsError::UnknownProviderType {
            provider_type: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown provider type: foo");
        assert!(err.is_precondition_violation());
    }

    #[test]
    fn test_capability_load_is_not_precondition() {
        let err = TabsError::CapabilityLoad {
            provider_type: "bpmn".to_string(),
            message: "chunk missing".to_string(),
        };
        assert!(!err.is_precondition_violation());
        assert!(err.to_string().contains("chunk missing"));
    }

    #[test]
    fn test_file_read_keeps_source() {
        use std::error::Error as _;

        let err = TabsError::FileRead {
            path: PathBuf::from("a.bpmn"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Failed to read file: a.bpmn");
    }
}
