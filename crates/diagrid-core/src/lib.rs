//! # diagrid-core
//!
//! Document-type resolution and editor sessions for a multi-format diagram
//! editor.
//!
//! Handles:
//! - Provider descriptors and the built-in BPMN / DMN / CMMN table
//! - A frozen provider registry with startup feature gating
//! - Resolution of a file to its owning provider (extension, then content)
//! - Tabs: identity, default filenames, default contents
//! - Lazily loaded, per-type cached editor components
//! - The `diagramOpened` usage payload
//!
//! # Example
//!
//! ```
//! use diagrid_core::{File, TabsProvider};
//!
//! let tabs = TabsProvider::default();
//!
//! let file = File::new("order.dmn");
//! let tab = tabs.create_tab(file).expect("dmn is registered");
//!
//! assert_eq!(tab.provider_type(), "dmn");
//! assert!(tab.contents().contains("definitions"));
//! ```

pub mod builtin;
pub mod capability;
pub mod config;
pub mod descriptor;
pub mod dialect;
mod error;
pub mod file;
pub mod fs;
pub mod ids;
pub mod registry;
mod resolver;
pub mod session;
pub mod tabs;
pub mod telemetry;

pub use builtin::BuiltinSource;
pub use capability::{BuiltinLoader, CapabilityCache, CapabilityLoader, ComponentHandle, EditorComponent};
pub use config::{ConfigWarning, Flags, TabsConfig, TelemetryConfig, generate_schema};
pub use descriptor::{Encoding, ExportFormat, MenuEntry, ProviderDescriptor, ProviderSummary};
pub use error::{TabsError, TabsResult};
pub use file::File;
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator, replace_ids};
pub use registry::{ProviderGate, ProviderRegistry, ProviderRegistryBuilder, ProviderSource};
pub use resolver::{file_extension, resolve};
pub use session::{CreationCounters, SessionFactory, Tab, UNSAVED_TITLE};
pub use tabs::TabsProvider;
pub use telemetry::DiagramOpenedEvent;
