//! The surface other editor subsystems talk to.

use std::sync::Arc;

use crate::capability::{BuiltinLoader, CapabilityCache, CapabilityLoader, EditorComponent};
use crate::config::TabsConfig;
use crate::descriptor::ProviderDescriptor;
use crate::error::TabsResult;
use crate::file::File;
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::registry::ProviderRegistry;
use crate::session::{SessionFactory, Tab};

/// Registry, session factory and component cache behind one handle.
///
/// # Example
///
/// ```
/// use diagrid_core::{File, TabsProvider};
///
/// let tabs = TabsProvider::default();
///
/// let tab = tabs.create_tab_for("bpmn").unwrap().unwrap();
/// assert_eq!(tab.name(), "diagram_1.bpmn");
/// assert_eq!(tab.title(), "unsaved");
///
/// let opened = tabs.create_tab(File::new("notes.txt").with_contents("hello"));
/// assert!(opened.is_none());
/// ```
#[derive(Debug)]
pub struct TabsProvider {
    registry: Arc<ProviderRegistry>,
    factory: SessionFactory,
    capabilities: CapabilityCache,
}

impl TabsProvider {
    /// Built-in providers, gated by `config.flags`.
    pub fn from_config(config: &TabsConfig) -> TabsResult<Self> {
        let registry = ProviderRegistry::builder()
            .with_defaults()
            .flags(config.flags.clone())
            .build()?;
        Ok(Self::from_parts(
            registry,
            Arc::new(UuidIdGenerator),
            Arc::new(BuiltinLoader),
        ))
    }

    pub fn from_parts(
        registry: ProviderRegistry,
        ids: Arc<dyn IdGenerator>,
        loader: Arc<dyn CapabilityLoader>,
    ) -> Self {
        let registry = Arc::new(registry);
        let capabilities = CapabilityCache::new(&registry, loader);
        let factory = SessionFactory::with_id_generator(Arc::clone(&registry), ids);
        Self {
            registry,
            factory,
            capabilities,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn providers(&self) -> &[Arc<ProviderDescriptor>] {
        self.registry.providers()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.registry.provider_names()
    }

    /// Never fails; unknown types yield the no-op descriptor.
    pub fn provider(&self, provider_type: &str) -> Arc<ProviderDescriptor> {
        self.registry.provider(provider_type)
    }

    /// Whether any provider claims the file extension `extension`.
    pub fn has_provider(&self, extension: &str) -> bool {
        self.registry.has_provider(extension)
    }

    pub fn resolve(&self, file: &File) -> Option<Arc<ProviderDescriptor>> {
        self.registry.resolve(file)
    }

    pub fn create_file(&self, provider_type: &str) -> TabsResult<File> {
        self.factory.create_file(provider_type)
    }

    pub fn create_tab(&self, file: File) -> Option<Tab> {
        self.factory.create_tab(file)
    }

    pub fn create_tab_for(&self, provider_type: &str) -> TabsResult<Option<Tab>> {
        self.factory.create_tab_for(provider_type)
    }

    pub fn initial_file_contents(&self, provider_type: &str) -> Option<String> {
        self.factory.initial_file_contents(provider_type)
    }

    /// Component for displaying `tab`, loaded on first request.
    pub async fn load_capability(&self, tab: &Tab) -> TabsResult<Option<Arc<dyn EditorComponent>>> {
        let provider = self.registry.provider(tab.provider_type());
        self.capabilities.load(&provider).await
    }

    pub fn is_capability_loaded(&self, provider_type: &str) -> bool {
        self.capabilities.is_loaded(provider_type)
    }
}

impl Default for TabsProvider {
    fn default() -> Self {
        Self::from_parts(
            ProviderRegistry::with_defaults(),
            Arc::new(UuidIdGenerator),
            Arc::new(BuiltinLoader),
        )
    }
}
