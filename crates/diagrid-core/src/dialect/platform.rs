//! Execution platform metadata written by the modeler onto the root element.

use serde::{Deserialize, Serialize};

use super::namespace::NAMESPACE_MODELER;
use super::xml::root_element;

/// Target engine recorded in a diagram (`modeler:executionPlatform*`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_platform_version: Option<String>,
}

impl EngineProfile {
    pub fn is_empty(&self) -> bool {
        self.execution_platform.is_none() && self.execution_platform_version.is_none()
    }
}

/// Read the execution platform attributes from the root element.
///
/// The attributes are looked up under whichever prefix binds the modeler
/// namespace. Returns `None` when the document has no root element or
/// carries neither attribute.
pub fn parse_execution_platform(text: &str) -> Option<EngineProfile> {
    let root = root_element(text)?;

    let prefix = root.attributes.iter().find_map(|(name, value)| {
        (*value == NAMESPACE_MODELER)
            .then(|| name.strip_prefix("xmlns:"))
            .flatten()
    })?;

    let profile = EngineProfile {
        execution_platform: root
            .attribute(&format!("{}:executionPlatform", prefix))
            .map(str::to_string),
        execution_platform_version: root
            .attribute(&format!("{}:executionPlatformVersion", prefix))
            .map(str::to_string),
    };

    (!profile.is_empty()).then_some(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_platform_and_version() {
        let text = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:modeler="http://camunda.org/schema/modeler/1.0" modeler:executionPlatform="Camunda Cloud" modeler:executionPlatformVersion="8.2.0">"#;
        let profile = parse_execution_platform(text).unwrap();
        assert_eq!(profile.execution_platform.as_deref(), Some("Camunda Cloud"));
        assert_eq!(profile.execution_platform_version.as_deref(), Some("8.2.0"));
    }

    #[test]
    fn honours_custom_prefix() {
        let text = r#"<definitions xmlns:m="http://camunda.org/schema/modeler/1.0" m:executionPlatform="Camunda Platform">"#;
        let profile = parse_execution_platform(text).unwrap();
        assert_eq!(profile.execution_platform.as_deref(), Some("Camunda Platform"));
        assert_eq!(profile.execution_platform_version, None);
    }

    #[test]
    fn missing_metadata_is_none() {
        assert_eq!(parse_execution_platform("<definitions/>"), None);
        assert_eq!(parse_execution_platform(""), None);
        assert_eq!(
            parse_execution_platform(r#"<definitions xmlns:modeler="http://camunda.org/schema/modeler/1.0">"#),
            None
        );
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let profile = EngineProfile {
            execution_platform: Some("Camunda Cloud".to_string()),
            execution_platform_version: None,
        };
        assert_eq!(
            serde_json::to_string(&profile).unwrap(),
            r#"{"executionPlatform":"Camunda Cloud"}"#
        );
    }
}
