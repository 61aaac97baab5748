//! Structural dialect detection from file contents.

use super::types::Dialect;
use super::xml::root_element;

/// BPMN 2.0 model namespace.
pub const NAMESPACE_BPMN: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";

/// DMN namespaces, oldest first (DMN 1.1, 1.2, 1.3).
pub const NAMESPACES_DMN: &[&str] = &[
    "http://www.omg.org/spec/DMN/20151101/dmn.xsd",
    "http://www.omg.org/spec/DMN/20180521/MODEL/",
    "https://www.omg.org/spec/DMN/20191111/MODEL/",
];

/// CMMN 1.1 model namespace.
pub const NAMESPACE_CMMN: &str = "http://www.omg.org/spec/CMMN/20151109/MODEL";

/// Classify raw text by inspecting its root element.
///
/// All three dialects use a `definitions` root; the namespace bound to the
/// root's prefix decides which one it is. Empty, partial or malformed text
/// yields [`Dialect::Unknown`].
///
/// # Examples
///
/// ```
/// use diagrid_core::dialect::{classify, Dialect};
///
/// let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL"/>"#;
/// assert_eq!(classify(xml), Dialect::Bpmn);
/// assert_eq!(classify("not xml"), Dialect::Unknown);
/// ```
pub fn classify(text: &str) -> Dialect {
    let Some(root) = root_element(text) else {
        return Dialect::Unknown;
    };

    if root.local_name() != "definitions" {
        return Dialect::Unknown;
    }

    match root.namespace() {
        Some(ns) => dialect_for_namespace(ns),
        None => Dialect::Unknown,
    }
}

/// Map a model namespace URI to its dialect.
pub fn dialect_for_namespace(namespace: &str) -> Dialect {
    if namespace == NAMESPACE_BPMN {
        Dialect::Bpmn
    } else if NAMESPACES_DMN.contains(&namespace) {
        Dialect::Dmn
    } else if namespace == NAMESPACE_CMMN {
        Dialect::Cmmn
    } else {
        Dialect::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(prefix: &str, ns: &str) -> String {
        if prefix.is_empty() {
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<definitions xmlns=\"{}\" id=\"d\">\n</definitions>",
                ns
            )
        } else {
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<{p}:definitions xmlns:{p}=\"{ns}\" id=\"d\">\n</{p}:definitions>",
                p = prefix,
                ns = ns
            )
        }
    }

    #[test]
    fn detects_bpmn_with_prefix() {
        assert_eq!(classify(&definitions("bpmn", NAMESPACE_BPMN)), Dialect::Bpmn);
        assert_eq!(classify(&definitions("bpmn2", NAMESPACE_BPMN)), Dialect::Bpmn);
    }

    #[test]
    fn detects_bpmn_default_namespace() {
        assert_eq!(classify(&definitions("", NAMESPACE_BPMN)), Dialect::Bpmn);
    }

    #[test]
    fn detects_every_dmn_revision() {
        for ns in NAMESPACES_DMN {
            assert_eq!(classify(&definitions("", ns)), Dialect::Dmn, "{}", ns);
        }
    }

    #[test]
    fn detects_cmmn() {
        assert_eq!(classify(&definitions("cmmn", NAMESPACE_CMMN)), Dialect::Cmmn);
    }

    #[test]
    fn namespace_must_be_bound_to_root_prefix() {
        // BPMN namespace declared, but under another prefix than the root's
        let text = format!(
            "<foo:definitions xmlns:foo=\"urn:other\" xmlns:bpmn=\"{}\"/>",
            NAMESPACE_BPMN
        );
        assert_eq!(classify(&text), Dialect::Unknown);
    }

    #[test]
    fn other_root_elements_are_unknown() {
        let text = format!("<bpmn:process xmlns:bpmn=\"{}\"/>", NAMESPACE_BPMN);
        assert_eq!(classify(&text), Dialect::Unknown);
    }

    #[test]
    fn malformed_input_is_unknown() {
        assert_eq!(classify(""), Dialect::Unknown);
        assert_eq!(classify("{\"json\": true}"), Dialect::Unknown);
        assert_eq!(classify("<bpmn:definitions xmlns:bpmn=\"http://www.omg"), Dialect::Unknown);
        assert_eq!(classify("\0\u{1}<<<>>>"), Dialect::Unknown);
    }

    #[test]
    fn unknown_namespace_is_unknown() {
        assert_eq!(classify(&definitions("x", "urn:nope")), Dialect::Unknown);
    }
}
