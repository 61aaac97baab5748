//! Lazily loaded editor components, cached per provider type.
//!
//! A tab is complete without its component. The component is requested
//! the first time the tab is displayed and then kept for the process
//! lifetime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::descriptor::ProviderDescriptor;
use crate::error::{TabsError, TabsResult};
use crate::registry::ProviderRegistry;

/// Opaque editing UI for one provider type.
pub trait EditorComponent: Send + Sync + fmt::Debug {
    fn provider_type(&self) -> &str;

    /// Component identifier, as declared by the descriptor.
    fn name(&self) -> &str;
}

/// Component handle produced by [`BuiltinLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHandle {
    provider_type: String,
    name: String,
}

impl ComponentHandle {
    pub fn new(provider_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            name: name.into(),
        }
    }
}

impl EditorComponent for ComponentHandle {
    fn provider_type(&self) -> &str {
        &self.provider_type
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Loads the component for a provider.
///
/// `Ok(None)` means the provider has no UI.
#[async_trait]
pub trait CapabilityLoader: Send + Sync {
    async fn load(&self, provider: &ProviderDescriptor) -> TabsResult<Option<Arc<dyn EditorComponent>>>;
}

/// Resolves components from the descriptor's component id.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

#[async_trait]
impl CapabilityLoader for BuiltinLoader {
    async fn load(&self, provider: &ProviderDescriptor) -> TabsResult<Option<Arc<dyn EditorComponent>>> {
        Ok(provider.component().map(|name| {
            Arc::new(ComponentHandle::new(provider.provider_type(), name)) as Arc<dyn EditorComponent>
        }))
    }
}

type LoadOutcome = Result<Option<Arc<dyn EditorComponent>>, Arc<TabsError>>;
type InFlight = Shared<BoxFuture<'static, LoadOutcome>>;

enum SlotState {
    Idle,
    Loading(InFlight),
    Loaded(Option<Arc<dyn EditorComponent>>),
}

struct Slot {
    provider: Arc<ProviderDescriptor>,
    state: Mutex<SlotState>,
}

impl Slot {
    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_loaded(&self) -> bool {
        matches!(*self.state(), SlotState::Loaded(_))
    }
}

/// Memoized loader with one slot per registered provider type.
///
/// Concurrent requests for the same type share a single in-flight load and
/// all of them observe its outcome, success or failure. A successful result
/// is kept forever. A failed load returns the slot to idle once it has
/// settled, so the next request loads again.
pub struct CapabilityCache {
    loader: Arc<dyn CapabilityLoader>,
    slots: HashMap<String, Slot>,
}

impl CapabilityCache {
    pub fn new(registry: &ProviderRegistry, loader: Arc<dyn CapabilityLoader>) -> Self {
        Self {
            loader,
            slots: registry
                .providers()
                .iter()
                .map(|p| {
                    let slot = Slot {
                        provider: Arc::clone(p),
                        state: Mutex::new(SlotState::Idle),
                    };
                    (p.provider_type().to_string(), slot)
                })
                .collect(),
        }
    }

    /// Component for `provider`, loading it on first use.
    ///
    /// Providers unknown to the registry resolve to `Ok(None)` without
    /// consulting the loader.
    pub async fn load(&self, provider: &ProviderDescriptor) -> TabsResult<Option<Arc<dyn EditorComponent>>> {
        let Some(slot) = self.slots.get(provider.provider_type()) else {
            return Ok(None);
        };

        let in_flight = {
            let mut state = slot.state();
            match &*state {
                SlotState::Loaded(component) => return Ok(component.clone()),
                SlotState::Loading(in_flight) => in_flight.clone(),
                SlotState::Idle => {
                    let in_flight = self.start_load(Arc::clone(&slot.provider));
                    *state = SlotState::Loading(in_flight.clone());
                    in_flight
                }
            }
        };

        let outcome = in_flight.clone().await;

        {
            let mut state = slot.state();
            // First waiter back settles the slot; later ones find it settled.
            if let SlotState::Loading(current) = &*state
                && current.ptr_eq(&in_flight)
            {
                *state = match &outcome {
                    Ok(component) => SlotState::Loaded(component.clone()),
                    Err(_) => SlotState::Idle,
                };
            }
        }

        outcome.map_err(|e| unshare_error(provider.provider_type(), e))
    }

    fn start_load(&self, provider: Arc<ProviderDescriptor>) -> InFlight {
        let loader = Arc::clone(&self.loader);
        async move {
            tracing::debug!(provider = provider.provider_type(), "loading editor component");
            loader.load(&provider).await.map_err(|e| {
                tracing::warn!(provider = provider.provider_type(), error = %e, "editor component failed to load");
                Arc::new(e)
            })
        }
        .boxed()
        .shared()
    }

    /// Whether the component for `provider_type` has loaded.
    pub fn is_loaded(&self, provider_type: &str) -> bool {
        self.slots.get(provider_type).is_some_and(Slot::is_loaded)
    }
}

/// Hand one waiter its own copy of a load error shared by several waiters.
fn unshare_error(provider_type: &str, error: Arc<TabsError>) -> TabsError {
    Arc::try_unwrap(error).unwrap_or_else(|shared| match &*shared {
        TabsError::CapabilityLoad {
            provider_type,
            message,
        } => TabsError::CapabilityLoad {
            provider_type: provider_type.clone(),
            message: message.clone(),
        },
        other => TabsError::CapabilityLoad {
            provider_type: provider_type.to_string(),
            message: other.to_string(),
        },
    })
}

impl fmt::Debug for CapabilityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_loaded())
            .map(|(k, _)| k.as_str())
            .collect();
        loaded.sort_unstable();
        f.debug_struct("CapabilityCache")
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}
