//! Editor configuration (`diagrid.toml`) and startup feature flags.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builtin::{FLAG_DISABLE_CMMN, FLAG_DISABLE_DMN};
use crate::error::{TabsError, TabsResult};
use crate::fs::{DEFAULT_MAX_FILE_SIZE, FileSystem, RealFileSystem};

/// Flags understood by the built-in provider table.
pub const KNOWN_FLAGS: &[&str] = &[FLAG_DISABLE_CMMN, FLAG_DISABLE_DMN];

/// Named boolean feature flags consulted once at registry construction.
///
/// A flag that was never set falls back to the default supplied by the
/// caller, so gates can be "on unless configured otherwise".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Flags(BTreeMap<String, bool>);

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, or `default` when unset.
    pub fn get(&self, name: &str, default: bool) -> bool {
        self.0.get(name).copied().unwrap_or(default)
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Parse a `name`, `name=true` or `name=false` command line override.
    pub fn parse_override(raw: &str) -> Option<(String, bool)> {
        let (name, value) = match raw.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (raw.trim(), "true"),
        };

        if name.is_empty() {
            return None;
        }

        let value = match value.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => return None,
        };

        Some((name.to_string(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Flags {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Usage-statistics settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TelemetryConfig {
    /// Whether `diagramOpened` events are produced.
    #[serde(default)]
    #[schemars(description = "Produce diagramOpened usage events")]
    pub enabled: bool,
}

/// Top-level configuration.
///
/// # Example
///
/// ```
/// use diagrid_core::TabsConfig;
///
/// let config: TabsConfig = toml::from_str(r#"
/// max_file_size = 1048576
///
/// [flags]
/// disable-cmmn = false
/// "#).unwrap();
///
/// assert!(!config.flags.get("disable-cmmn", true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TabsConfig {
    /// Startup feature flags (e.g. `disable-cmmn`, `disable-dmn`).
    #[serde(default)]
    #[schemars(description = "Startup feature flags gating built-in providers")]
    pub flags: Flags,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Largest file, in bytes, that will be opened.
    #[serde(default = "default_max_file_size")]
    #[schemars(description = "Largest file in bytes that will be opened")]
    pub max_file_size: u64,
}

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            flags: Flags::default(),
            telemetry: TelemetryConfig::default(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl TabsConfig {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> TabsResult<Self> {
        let path = path.as_ref();
        let content = RealFileSystem::default().read_file(path)?;
        toml::from_str(&content).map_err(|e| TabsError::ConfigParse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    /// Load config or use default, returning any load warning.
    ///
    /// A broken config file must not keep the editor from starting, but the
    /// caller should surface the warning instead of silently using defaults.
    pub fn load_or_default(path: Option<&PathBuf>) -> (Self, Option<String>) {
        match path {
            Some(p) => match Self::load(p) {
                Ok(config) => (config, None),
                Err(e) => (
                    Self::default(),
                    Some(format!(
                        "Failed to load config from {}: {}. Using defaults.",
                        p.display(),
                        e
                    )),
                ),
            },
            None => (Self::default(), None),
        }
    }

    /// Filesystem honoring `max_file_size`.
    pub fn filesystem(&self) -> RealFileSystem {
        RealFileSystem::new(self.max_file_size)
    }

    /// Semantic checks beyond what TOML parsing enforces.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, _) in self.flags.iter() {
            if !KNOWN_FLAGS.contains(&name) {
                warnings.push(ConfigWarning {
                    field: format!("flags.{}", name),
                    message: format!("Unknown flag '{}'", name),
                    suggestion: Some(format!("Known flags: {}", KNOWN_FLAGS.join(", "))),
                });
            }
        }

        if self.max_file_size == 0 {
            warnings.push(ConfigWarning {
                field: "max_file_size".to_string(),
                message: "max_file_size is 0, every file will be rejected".to_string(),
                suggestion: Some(format!("Use the default of {} bytes", DEFAULT_MAX_FILE_SIZE)),
            });
        }

        warnings
    }
}

/// Non-fatal configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    /// The field path that has the issue (e.g., "flags.disable-bpmn")
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Generate a JSON Schema for `diagrid.toml`.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(TabsConfig)
}
