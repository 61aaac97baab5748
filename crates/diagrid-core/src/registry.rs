//! Provider registry and its builder.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::builtin::BuiltinSource;
use crate::config::Flags;
use crate::descriptor::ProviderDescriptor;
use crate::error::{TabsError, TabsResult};
use crate::file::File;

/// A supplier of provider descriptors.
///
/// Implement this trait to contribute editors from outside the crate (a
/// plugin, a test fixture). The built-in table is packaged as
/// [`BuiltinSource`].
///
/// # Example
///
/// ```
/// use diagrid_core::{ProviderDescriptor, ProviderRegistry, ProviderSource};
///
/// struct FormSource;
///
/// impl ProviderSource for FormSource {
///     fn providers(&self) -> Vec<ProviderDescriptor> {
///         vec![ProviderDescriptor::new("form").with_extensions(&["form"])]
///     }
/// }
///
/// let registry = ProviderRegistry::builder()
///     .with_defaults()
///     .with_source(&FormSource)
///     .build()
///     .unwrap();
///
/// assert!(registry.contains("form"));
/// ```
pub trait ProviderSource: Send + Sync {
    /// Human-readable name for this source.
    ///
    /// Defaults to the unqualified struct name (e.g., `"BuiltinSource"`).
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Descriptors in declaration order.
    fn providers(&self) -> Vec<ProviderDescriptor>;

    /// Feature gates applying to this source's providers.
    fn gates(&self) -> Vec<ProviderGate> {
        Vec::new()
    }
}

/// Removes a provider at startup when a flag evaluates to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderGate {
    pub provider_type: String,
    /// Flag name, e.g. `disable-cmmn`.
    pub flag: String,
    /// Flag value assumed when the flag is not configured.
    pub default: bool,
}

impl ProviderGate {
    pub fn new(provider_type: impl Into<String>, flag: impl Into<String>, default: bool) -> Self {
        Self {
            provider_type: provider_type.into(),
            flag: flag.into(),
            default,
        }
    }

    /// Whether the gate removes its provider under `flags`.
    pub fn is_disabled(&self, flags: &Flags) -> bool {
        flags.get(&self.flag, self.default)
    }
}

/// Registry of provider descriptors, frozen after construction.
///
/// Holds descriptors in declaration order, a `type -> descriptor` map and an
/// `extension -> [descriptor]` index. Within an index entry, earlier
/// descriptors have higher priority and the last one is the fallback used by
/// [`resolve`](crate::resolve).
///
/// Nothing can remove a provider once the registry is built; feature gating
/// happens inside [`ProviderRegistryBuilder::build`].
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<Arc<ProviderDescriptor>>,
    by_type: HashMap<String, usize>,
    by_extension: HashMap<String, Vec<usize>>,
}

impl ProviderRegistry {
    /// Registry with the built-in providers and built-in gates at their defaults.
    pub fn with_defaults() -> Self {
        Self::builder()
            .with_defaults()
            .build()
            .expect("built-in provider types are unique")
    }

    /// Create a [`ProviderRegistryBuilder`] for ergonomic construction.
    ///
    /// # Example
    ///
    /// ```
    /// use diagrid_core::{Flags, ProviderRegistry};
    ///
    /// let mut flags = Flags::new();
    /// flags.set("disable-cmmn", false);
    ///
    /// let registry = ProviderRegistry::builder()
    ///     .with_defaults()
    ///     .flags(flags)
    ///     .without_provider("cloud-bpmn")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(registry.contains("cmmn"));
    /// assert!(!registry.contains("cloud-bpmn"));
    /// ```
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    /// All providers in declaration order.
    pub fn providers(&self) -> &[Arc<ProviderDescriptor>] {
        &self.providers
    }

    /// Display names of providers that declare one, in declaration order.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter_map(|p| p.display_name())
            .collect()
    }

    /// Look up a provider, falling back to the shared no-op descriptor.
    ///
    /// Never fails; use [`get`](Self::get) to tell "unknown" apart.
    pub fn provider(&self, provider_type: &str) -> Arc<ProviderDescriptor> {
        self.get(provider_type)
            .unwrap_or_else(ProviderDescriptor::noop)
    }

    pub fn get(&self, provider_type: &str) -> Option<Arc<ProviderDescriptor>> {
        self.by_type
            .get(provider_type)
            .map(|&idx| Arc::clone(&self.providers[idx]))
    }

    pub fn contains(&self, provider_type: &str) -> bool {
        self.by_type.contains_key(provider_type)
    }

    /// Candidates claiming `extension`, highest priority first.
    pub fn providers_for_extension(&self, extension: &str) -> Vec<Arc<ProviderDescriptor>> {
        self.by_extension
            .get(&extension.to_lowercase())
            .map(|indices| {
                indices
                    .iter()
                    .map(|&idx| Arc::clone(&self.providers[idx]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether any provider claims `extension`.
    pub fn has_provider(&self, extension: &str) -> bool {
        self.by_extension.contains_key(&extension.to_lowercase())
    }

    /// Every claimed extension, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.by_extension.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Pick the provider owning `file`; see [`resolve`](crate::resolve).
    pub fn resolve(&self, file: &File) -> Option<Arc<ProviderDescriptor>> {
        crate::resolver::resolve(self, file)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Builder for constructing a [`ProviderRegistry`].
///
/// Supports built-in providers, custom [`ProviderSource`]s, individual
/// descriptors, feature gates and explicit removal by type.
pub struct ProviderRegistryBuilder {
    entries: Vec<ProviderDescriptor>,
    gates: Vec<ProviderGate>,
    flags: Flags,
    removed: HashSet<String>,
}

impl ProviderRegistryBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            gates: Vec::new(),
            flags: Flags::default(),
            removed: HashSet::new(),
        }
    }

    /// Add the built-in providers and their gates.
    ///
    /// This method is additive: calling it twice registers every built-in
    /// type twice and `build()` then fails with a duplicate error.
    pub fn with_defaults(&mut self) -> &mut Self {
        self.with_source(&BuiltinSource)
    }

    /// Add all providers and gates from a [`ProviderSource`].
    pub fn with_source(&mut self, source: &dyn ProviderSource) -> &mut Self {
        tracing::trace!(source = source.name(), "adding provider source");
        self.entries.extend(source.providers());
        self.gates.extend(source.gates());
        self
    }

    /// Register a single descriptor after those already added.
    pub fn register(&mut self, provider: ProviderDescriptor) -> &mut Self {
        self.entries.push(provider);
        self
    }

    /// Add a feature gate.
    pub fn gate(&mut self, gate: ProviderGate) -> &mut Self {
        self.gates.push(gate);
        self
    }

    /// Flags evaluated by the gates at build time.
    pub fn flags(&mut self, flags: Flags) -> &mut Self {
        self.flags = flags;
        self
    }

    /// Drop a provider unconditionally.
    pub fn without_provider(&mut self, provider_type: &str) -> &mut Self {
        self.removed.insert(provider_type.to_string());
        self
    }

    /// Produce the frozen registry.
    ///
    /// Gates are evaluated exactly once here. Disabled providers are left out
    /// of both the type map and the extension index.
    ///
    /// Drains the builder's entries via [`std::mem::take`], so a second
    /// `build()` produces an empty registry.
    pub fn build(&mut self) -> TabsResult<ProviderRegistry> {
        let entries = std::mem::take(&mut self.entries);
        let gates = std::mem::take(&mut self.gates);
        let flags = std::mem::take(&mut self.flags);
        let mut removed = std::mem::take(&mut self.removed);

        for gate in &gates {
            if gate.is_disabled(&flags) {
                tracing::debug!(
                    provider = %gate.provider_type,
                    flag = %gate.flag,
                    "provider disabled by feature flag"
                );
                removed.insert(gate.provider_type.clone());
            }
        }

        let mut registry = ProviderRegistry {
            providers: Vec::with_capacity(entries.len()),
            by_type: HashMap::new(),
            by_extension: HashMap::new(),
        };

        for provider in entries {
            if removed.contains(provider.provider_type()) {
                continue;
            }

            if registry.by_type.contains_key(provider.provider_type()) {
                return Err(TabsError::DuplicateProvider {
                    provider_type: provider.provider_type().to_string(),
                });
            }

            let idx = registry.providers.len();
            registry
                .by_type
                .insert(provider.provider_type().to_string(), idx);
            for ext in provider.extensions() {
                registry.by_extension.entry(ext.clone()).or_default().push(idx);
            }
            registry.providers.push(Arc::new(provider));
        }

        tracing::debug!(
            providers = registry.providers.len(),
            extensions = registry.by_extension.len(),
            "provider registry built"
        );

        Ok(registry)
    }
}
