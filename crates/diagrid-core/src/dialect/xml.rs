//! Minimal root-element scanner shared by the content sniffers.
//!
//! This is not an XML parser. It only locates the first start tag of a
//! document and splits its attributes, which is all the sniffers need.

use regex::Regex;
use std::sync::OnceLock;

static ATTRIBUTE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn attribute_pattern() -> &'static Regex {
    ATTRIBUTE_PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_][\w.\-]*(?::[A-Za-z_][\w.\-]*)?)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("attribute pattern is valid")
    })
}

/// The first start tag of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RootElement<'a> {
    /// Qualified name as written, e.g. `bpmn:definitions`.
    pub name: &'a str,
    /// Attributes in document order.
    pub attributes: Vec<(&'a str, &'a str)>,
}

impl<'a> RootElement<'a> {
    /// Namespace prefix of the element name, if any.
    pub fn prefix(&self) -> Option<&'a str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Element name without its prefix.
    pub fn local_name(&self) -> &'a str {
        self.name
            .split_once(':')
            .map_or(self.name, |(_, local)| local)
    }

    /// Namespace URI bound to `prefix` on this element (`None` = default namespace).
    pub fn namespace_for(&self, prefix: Option<&str>) -> Option<&'a str> {
        self.attributes.iter().find_map(|(name, value)| {
            let matches = match prefix {
                Some(p) => name.strip_prefix("xmlns:") == Some(p),
                None => *name == "xmlns",
            };
            matches.then_some(*value)
        })
    }

    /// Namespace URI of the element itself.
    pub fn namespace(&self) -> Option<&'a str> {
        self.namespace_for(self.prefix())
    }

    /// Value of the attribute named `name`.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find_map(|(n, v)| (*n == name).then_some(*v))
    }
}

/// Locate the root element of `text`.
///
/// Skips a byte order mark, the XML declaration, processing instructions,
/// comments, DOCTYPE and whitespace. Returns `None` for empty or truncated
/// input and for anything that does not start with markup.
pub(crate) fn root_element(text: &str) -> Option<RootElement<'_>> {
    let mut rest = text.trim_start_matches('\u{feff}');

    loop {
        rest = rest.trim_start();

        if let Some(after) = rest.strip_prefix("<?") {
            rest = &after[after.find("?>")? + 2..];
        } else if let Some(after) = rest.strip_prefix("<!--") {
            rest = &after[after.find("-->")? + 3..];
        } else if let Some(after) = rest.strip_prefix("<!") {
            rest = &after[after.find('>')? + 1..];
        } else {
            break;
        }
    }

    let body = rest.strip_prefix('<')?;
    let end = tag_end(body)?;
    let tag = body[..end].trim_end_matches('/');

    let name_end = tag
        .find(|c: char| c.is_whitespace())
        .unwrap_or(tag.len());
    let name = &tag[..name_end];

    if name.is_empty() || !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return None;
    }

    let attributes = attribute_pattern()
        .captures_iter(&tag[name_end..])
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect();

    Some(RootElement { name, attributes })
}

/// Byte offset of the `>` closing the tag, ignoring `>` inside quoted values.
fn tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;

    for (idx, c) in body.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(idx),
            _ => {}
        }
    }

    None
}
