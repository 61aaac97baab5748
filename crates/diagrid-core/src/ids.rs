//! Unique identifier generation and template id regeneration.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn placeholder_pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        Regex::new(r"\{\{\s*ID(?::([A-Za-z0-9_\-]+))?\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Source of unique identifiers, used once per tab and once per template id.
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self) -> String;
}

/// Random identifiers backed by UUID v4, rendered without dashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic identifiers: `{prefix}{n}` with `n` starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }
}

/// Replace id placeholders in a template with fresh identifiers.
///
/// - `{{ ID }}` receives a new identifier at every occurrence.
/// - `{{ ID:name }}` receives one identifier per distinct `name`, so a
///   template can reference the same element from several places.
///
/// # Example
///
/// ```
/// use diagrid_core::ids::{SequentialIdGenerator, replace_ids};
///
/// let ids = SequentialIdGenerator::new("x");
/// let out = replace_ids(
///     r#"<process id="Process_{{ ID:p }}"/><shape bpmnElement="Process_{{ ID:p }}" id="{{ ID }}"/>"#,
///     &ids,
/// );
/// assert_eq!(out, r#"<process id="Process_x1"/><shape bpmnElement="Process_x1" id="x2"/>"#);
/// ```
pub fn replace_ids(template: &str, ids: &dyn IdGenerator) -> String {
    let mut named: HashMap<String, String> = HashMap::new();

    placeholder_pattern()
        .replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
            Some(name) => named
                .entry(name.as_str().to_string())
                .or_insert_with(|| ids.generate_id())
                .clone(),
            None => ids.generate_id(),
        })
        .into_owned()
}
