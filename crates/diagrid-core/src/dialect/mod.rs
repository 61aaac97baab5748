//! Content sniffing for diagram files.
//!
//! This module provides:
//!
//! - [`Dialect`] -- the document dialects the editor knows about
//! - [`classify`] -- structural root-element detection, no file name involved
//! - [`find_namespace_usage`] -- does a document actually use a namespace
//! - [`parse_execution_platform`] -- engine metadata for telemetry
//!
//! Every function here is pure and tolerant: malformed input degrades to
//! [`Dialect::Unknown`] / `None` and never panics.

mod classify;
mod namespace;
mod platform;
mod types;
pub(crate) mod xml;

pub use classify::{NAMESPACE_BPMN, NAMESPACE_CMMN, NAMESPACES_DMN, classify, dialect_for_namespace};
pub use namespace::{
    NAMESPACE_CAMUNDA, NAMESPACE_MODELER, NAMESPACE_ZEEBE, NamespaceUsage, find_namespace_usage,
    has_namespace_usage,
};
pub use platform::{EngineProfile, parse_execution_platform};
pub use types::Dialect;
