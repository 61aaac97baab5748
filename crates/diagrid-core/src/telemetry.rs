//! Payload of the `diagramOpened` usage event.
//!
//! Only the data is built here. Sending it, and retrying with
//! [`DiagramOpenedEvent::without_element_templates`] when the collector
//! answers `413 Payload Too Large`, is up to the host.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use crate::builtin::{BPMN, CLOUD_BPMN, CMMN, DMN};
use crate::dialect::{
    EngineProfile, NAMESPACE_CAMUNDA, NAMESPACE_ZEEBE, find_namespace_usage, parse_execution_platform,
};
use crate::session::Tab;

pub const EVENT_NAME: &str = "diagramOpened";

/// Status code after which the event is re-sent without element templates.
pub const HTTP_STATUS_PAYLOAD_TOO_BIG: u16 = 413;

const BINDING_TYPE_PROPERTY: &str = "property";

static USER_TASK_PATTERN: OnceLock<Regex> = OnceLock::new();
static MAPPING_PATTERN: OnceLock<Regex> = OnceLock::new();
static ATTRIBUTE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn user_task_pattern() -> &'static Regex {
    USER_TASK_PATTERN.get_or_init(|| {
        Regex::new(r"<(?:([A-Za-z_][\w.\-]*):)?userTask\b([^>]*?)(/?)>").expect("user task pattern is valid")
    })
}

fn mapping_pattern() -> &'static Regex {
    MAPPING_PATTERN.get_or_init(|| {
        Regex::new(r"<([A-Za-z_][\w.\-]*):(input|output|in|out)\b([^>]*)>").expect("mapping pattern is valid")
    })
}

fn attribute_pattern() -> &'static Regex {
    ATTRIBUTE_PATTERN.get_or_init(|| {
        Regex::new(r#"([\w:.\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
    })
}

fn attribute<'a>(attributes: &'a str, name: &str) -> Option<&'a str> {
    attribute_pattern().captures_iter(attributes).find_map(|caps| {
        if caps.get(1)?.as_str() != name {
            return None;
        }
        caps.get(2).or_else(|| caps.get(3)).map(|m| m.as_str())
    })
}

/// The `diagramOpened` event body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramOpenedEvent {
    /// `bpmn`, `dmn` or `cmmn`; both BPMN flavours report `bpmn`.
    pub diagram_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_templates: Option<Vec<ElementTemplateSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_template_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_metrics: Option<DiagramMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_profile: Option<EngineProfile>,
}

impl DiagramOpenedEvent {
    /// Event for a freshly displayed tab.
    ///
    /// `element_templates` are the raw element-template JSON documents
    /// configured for the tab's file; they are summarized for Camunda BPMN
    /// diagrams only. Returns `None` for tabs that are not diagrams.
    pub fn for_tab(tab: &Tab, element_templates: &[serde_json::Value]) -> Option<Self> {
        let contents = tab.contents();

        let event = match tab.provider_type() {
            BPMN => {
                let summaries: Vec<ElementTemplateSummary> = element_templates
                    .iter()
                    .filter_map(ElementTemplateSummary::from_template)
                    .collect();
                Self {
                    element_template_count: Some(summaries.len()),
                    element_templates: Some(summaries),
                    ..Self::bpmn(contents)
                }
            }
            CLOUD_BPMN => Self::bpmn(contents),
            DMN | CMMN => Self::bare(tab.provider_type()),
            _ => return None,
        };

        Some(event)
    }

    fn bare(diagram_type: &str) -> Self {
        Self {
            diagram_type: diagram_type.to_string(),
            element_templates: None,
            element_template_count: None,
            diagram_metrics: None,
            engine_profile: None,
        }
    }

    fn bpmn(contents: &str) -> Self {
        Self {
            diagram_metrics: Some(DiagramMetrics::from_contents(contents)),
            engine_profile: Some(parse_execution_platform(contents).unwrap_or_default()),
            ..Self::bare(BPMN)
        }
    }

    /// Reduced payload for a retry after [`HTTP_STATUS_PAYLOAD_TOO_BIG`].
    ///
    /// Drops the template summaries and keeps their count.
    pub fn without_element_templates(&self) -> Self {
        Self {
            element_templates: None,
            ..self.clone()
        }
    }
}

/// Counts extracted from BPMN contents.
///
/// Both fields are absent for a diagram without contents, which serializes
/// as an empty object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_variables_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<TaskMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetrics {
    pub user_task: UserTaskMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTaskMetrics {
    pub count: usize,
    /// User tasks referencing or embedding a form.
    pub form_count: usize,
}

impl DiagramMetrics {
    /// Scan BPMN text. Empty text yields no metrics, unparseable text zero counts.
    pub fn from_contents(contents: &str) -> Self {
        if contents.is_empty() {
            return Self::default();
        }

        Self {
            process_variables_count: Some(process_variables(contents).len()),
            tasks: Some(TaskMetrics {
                user_task: user_task_metrics(contents),
            }),
        }
    }

    /// User task counts, when contents were scanned.
    pub fn user_tasks(&self) -> Option<&UserTaskMetrics> {
        self.tasks.as_ref().map(|tasks| &tasks.user_task)
    }
}

fn user_task_metrics(contents: &str) -> UserTaskMetrics {
    let mut metrics = UserTaskMetrics::default();

    for caps in user_task_pattern().captures_iter(contents) {
        metrics.count += 1;

        let attributes = caps.get(2).map_or("", |m| m.as_str());
        if attribute(attributes, "camunda:formKey").is_some() || attributes.contains("formRef") {
            metrics.form_count += 1;
            continue;
        }

        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        if self_closing {
            continue;
        }

        let Some(start) = caps.get(0).map(|m| m.end()) else {
            continue;
        };
        let closing = match caps.get(1) {
            Some(prefix) => format!("</{}:userTask", prefix.as_str()),
            None => "</userTask".to_string(),
        };
        let body = contents[start..]
            .find(&closing)
            .map_or(&contents[start..], |end| &contents[start..start + end]);

        if body.contains(":formDefinition") || body.contains(":formData") {
            metrics.form_count += 1;
        }
    }

    metrics
}

/// Distinct variable names written by input/output mappings.
///
/// Zeebe `input`/`output` mappings and Camunda `in`/`out` call-activity
/// mappings contribute their `target`.
fn process_variables(contents: &str) -> BTreeSet<String> {
    let zeebe = find_namespace_usage(contents, NAMESPACE_ZEEBE).map(|u| u.prefix);
    let camunda = find_namespace_usage(contents, NAMESPACE_CAMUNDA).map(|u| u.prefix);

    mapping_pattern()
        .captures_iter(contents)
        .filter_map(|caps| {
            let prefix = caps.get(1)?.as_str();
            let element = caps.get(2)?.as_str();
            let accepted = match element {
                "input" | "output" => zeebe.as_deref() == Some(prefix),
                _ => camunda.as_deref() == Some(prefix),
            };
            if !accepted {
                return None;
            }
            attribute(caps.get(3)?.as_str(), "target")
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// What an element template applies to and which bindings it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTemplateSummary {
    pub applies_to: Vec<String>,
    /// Binding occurrences keyed by property name for `property` bindings,
    /// by binding type otherwise.
    pub properties: BTreeMap<String, usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    #[serde(default)]
    applies_to: Vec<String>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    binding: Option<RawBinding>,
}

#[derive(Deserialize)]
struct RawBinding {
    #[serde(rename = "type")]
    binding_type: String,
    name: Option<String>,
}

impl ElementTemplateSummary {
    /// Summarize one element-template document; `None` if it is not one.
    pub fn from_template(template: &serde_json::Value) -> Option<Self> {
        let raw = RawTemplate::deserialize(template).ok()?;

        let mut properties = BTreeMap::new();
        for binding in raw.properties.into_iter().filter_map(|p| p.binding) {
            let key = match binding.name {
                Some(name) if binding.binding_type == BINDING_TYPE_PROPERTY => name,
                _ => binding.binding_type,
            };
            *properties.entry(key).or_insert(0) += 1;
        }

        Some(Self {
            applies_to: raw.applies_to,
            properties,
        })
    }
}
