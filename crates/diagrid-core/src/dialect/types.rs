//! Dialect enum returned by the content classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Document dialect detected from file contents.
///
/// The classifier never consults file names, so the same dialect can be
/// claimed by several providers (e.g. a standard and a cloud BPMN editor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// BPMN 2.0 process diagrams
    Bpmn,
    /// DMN decision models (1.1 through 1.3)
    Dmn,
    /// CMMN 1.1 case models
    Cmmn,
    /// Anything else, including empty or malformed text
    Unknown,
}

impl Dialect {
    /// Lowercase tag used in provider configuration and telemetry.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Bpmn => "bpmn",
            Dialect::Dmn => "dmn",
            Dialect::Cmmn => "cmmn",
            Dialect::Unknown => "unknown",
        }
    }

    /// Returns `true` unless this is [`Dialect::Unknown`].
    #[must_use]
    pub fn is_known(self) -> bool {
        !matches!(self, Dialect::Unknown)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        for dialect in [Dialect::Bpmn, Dialect::Dmn, Dialect::Cmmn, Dialect::Unknown] {
            assert_eq!(dialect.to_string(), dialect.as_str());
        }
    }

    #[test]
    fn only_unknown_is_not_known() {
        assert!(Dialect::Bpmn.is_known());
        assert!(Dialect::Dmn.is_known());
        assert!(Dialect::Cmmn.is_known());
        assert!(!Dialect::Unknown.is_known());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Dialect::Cmmn).unwrap(), "\"cmmn\"");
    }
}
