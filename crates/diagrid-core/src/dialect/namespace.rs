//! Namespace usage detection.
//!
//! Used to tell sub-variants of one dialect apart, e.g. a BPMN file that
//! carries Zeebe extension elements versus a plain Camunda BPMN file.

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Zeebe (cloud execution) extension namespace.
pub const NAMESPACE_ZEEBE: &str = "http://camunda.org/schema/zeebe/1.0";

/// Camunda Platform BPMN extension namespace.
pub const NAMESPACE_CAMUNDA: &str = "http://camunda.org/schema/1.0/bpmn";

/// Camunda Modeler metadata namespace.
pub const NAMESPACE_MODELER: &str = "http://camunda.org/schema/modeler/1.0";

/// A namespace declaration whose prefix is used in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceUsage {
    pub prefix: String,
    pub uri: String,
    /// Number of element or attribute names carrying the prefix.
    pub occurrences: usize,
}

static DECLARATION_PATTERN: OnceLock<Regex> = OnceLock::new();
static QUALIFIED_NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn declaration_pattern() -> &'static Regex {
    DECLARATION_PATTERN.get_or_init(|| {
        Regex::new(r#"xmlns:([A-Za-z_][\w.\-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("declaration pattern is valid")
    })
}

/// Prefix of an element or attribute name, after `<`, `</` or whitespace.
fn qualified_name_pattern() -> &'static Regex {
    QUALIFIED_NAME_PATTERN.get_or_init(|| {
        Regex::new(r"(?:</|<|\s)([A-Za-z_][\w.\-]*):[A-Za-z_]").expect("qualified name pattern is valid")
    })
}

/// Find where `namespace_uri` is declared and actually used in `text`.
///
/// A declaration alone is not a usage: modelers commonly keep unused
/// `xmlns:` attributes around after the last extension element is removed.
/// When several prefixes bind the same URI, the first one in use wins.
pub fn find_namespace_usage(text: &str, namespace_uri: &str) -> Option<NamespaceUsage> {
    if text.is_empty() || namespace_uri.is_empty() || !text.contains(namespace_uri) {
        return None;
    }

    let prefixes: Vec<&str> = declaration_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let uri = caps.get(2).or_else(|| caps.get(3))?.as_str();
            if uri != namespace_uri {
                return None;
            }
            Some(caps.get(1)?.as_str())
        })
        .collect();
    if prefixes.is_empty() {
        return None;
    }

    let mut occurrences: HashMap<&str, usize> = HashMap::new();
    for caps in qualified_name_pattern().captures_iter(text) {
        if let Some(prefix) = caps.get(1).map(|m| m.as_str())
            && prefixes.contains(&prefix)
        {
            *occurrences.entry(prefix).or_default() += 1;
        }
    }

    prefixes.into_iter().find_map(|prefix| {
        let count = occurrences.get(prefix).copied().unwrap_or(0);
        (count > 0).then(|| NamespaceUsage {
            prefix: prefix.to_string(),
            uri: namespace_uri.to_string(),
            occurrences: count,
        })
    })
}

/// Boolean form of [`find_namespace_usage`].
pub fn has_namespace_usage(text: &str, namespace_uri: &str) -> bool {
    find_namespace_usage(text, namespace_uri).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZEEBE_DIAGRAM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:zeebe="http://camunda.org/schema/zeebe/1.0" id="Definitions_1">
  <bpmn:process id="Process_1" isExecutable="true">
    <bpmn:serviceTask id="Task_1">
      <bpmn:extensionElements>
        <zeebe:taskDefinition type="payment" />
      </bpmn:extensionElements>
    </bpmn:serviceTask>
  </bpmn:process>
</bpmn:definitions>"#;

    #[test]
    fn finds_used_namespace() {
        let usage = find_namespace_usage(ZEEBE_DIAGRAM, NAMESPACE_ZEEBE).unwrap();
        assert_eq!(usage.prefix, "zeebe");
        assert_eq!(usage.uri, NAMESPACE_ZEEBE);
        assert_eq!(usage.occurrences, 1);
    }

    #[test]
    fn declaration_without_usage_is_ignored() {
        let text = r#"<bpmn:definitions xmlns:bpmn="x" xmlns:zeebe="http://camunda.org/schema/zeebe/1.0"><bpmn:process/></bpmn:definitions>"#;
        assert!(!has_namespace_usage(text, NAMESPACE_ZEEBE));
    }

    #[test]
    fn attribute_usage_counts() {
        let text = r#"<definitions xmlns:z="http://camunda.org/schema/zeebe/1.0"><task z:modelerTemplate="t"/></definitions>"#;
        let usage = find_namespace_usage(text, NAMESPACE_ZEEBE).unwrap();
        assert_eq!(usage.prefix, "z");
    }

    #[test]
    fn missing_namespace_returns_none() {
        assert!(find_namespace_usage(ZEEBE_DIAGRAM, NAMESPACE_CAMUNDA).is_none());
        assert!(find_namespace_usage("", NAMESPACE_ZEEBE).is_none());
        assert!(find_namespace_usage("<<<", NAMESPACE_ZEEBE).is_none());
    }

    #[test]
    fn first_used_prefix_wins_among_aliases() {
        let text = r#"<a xmlns:y="urn:z" xmlns:z="urn:z"><z:item/><z:item/></a>"#;
        let usage = find_namespace_usage(text, "urn:z").unwrap();
        assert_eq!(usage.prefix, "z");
        assert_eq!(usage.occurrences, 2);
    }

    #[test]
    fn similar_prefix_is_not_a_usage() {
        let text = r#"<a xmlns:z="urn:z" xmlns:zz="urn:other"><zz:item/></a>"#;
        assert!(!has_namespace_usage(text, "urn:z"));
    }

    #[test]
    fn closing_tags_count_as_usage() {
        let text = r#"<a xmlns:z="urn:z"></z:item></a>"#;
        assert_eq!(find_namespace_usage(text, "urn:z").unwrap().occurrences, 1);
    }

    #[test]
    fn uri_with_regex_metacharacters_is_escaped() {
        let text = r#"<a xmlns:q="urn:a+b(c)"><q:item/></a>"#;
        assert!(has_namespace_usage(text, "urn:a+b(c)"));
    }
}
