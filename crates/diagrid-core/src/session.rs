//! Editing sessions ("tabs") and their construction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{TabsError, TabsResult};
use crate::file::File;
use crate::ids::{IdGenerator, UuidIdGenerator, replace_ids};
use crate::registry::ProviderRegistry;

/// Title of a tab whose file has never been saved.
pub const UNSAVED_TITLE: &str = "unsaved";

/// An editing session bound to one file and one provider type.
///
/// The tab exclusively owns its [`File`]; name, path and contents change
/// only through the tab's accessors. `id` and `provider_type` never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    id: String,
    file: File,
    provider_type: String,
}

impl Tab {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.file.name = name.into();
    }

    pub fn path(&self) -> Option<&Path> {
        self.file.path.as_deref()
    }

    /// Record where the file was saved.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.file.path = Some(path.into());
    }

    /// Contents; always present once the tab exists.
    pub fn contents(&self) -> &str {
        self.file.contents_str()
    }

    pub fn set_contents(&mut self, contents: impl Into<String>) {
        self.file.contents = Some(contents.into());
    }

    /// The file's path when saved, otherwise [`UNSAVED_TITLE`].
    pub fn title(&self) -> String {
        match &self.file.path {
            Some(path) => path.display().to_string(),
            None => UNSAVED_TITLE.to_string(),
        }
    }

    pub fn into_file(self) -> File {
        self.file
    }
}

/// Per-type counters for "new file" actions.
///
/// One counter per provider registered at construction, starting at zero.
/// Only [`SessionFactory::create_file`] advances them.
#[derive(Debug, Default)]
pub struct CreationCounters {
    counters: HashMap<String, AtomicU64>,
}

impl CreationCounters {
    pub fn for_registry(registry: &ProviderRegistry) -> Self {
        Self {
            counters: registry
                .providers()
                .iter()
                .map(|p| (p.provider_type().to_string(), AtomicU64::new(0)))
                .collect(),
        }
    }

    /// Increment and return the counter for `provider_type`.
    fn next(&self, provider_type: &str) -> Option<u64> {
        self.counters
            .get(provider_type)
            .map(|c| c.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Files created so far for `provider_type`.
    pub fn current(&self, provider_type: &str) -> Option<u64> {
        self.counters
            .get(provider_type)
            .map(|c| c.load(Ordering::Relaxed))
    }
}

/// Builds new files and tabs against a frozen registry.
pub struct SessionFactory {
    registry: Arc<ProviderRegistry>,
    counters: CreationCounters,
    ids: Arc<dyn IdGenerator>,
}

impl SessionFactory {
    /// Factory using random UUID identifiers.
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self::with_id_generator(registry, Arc::new(UuidIdGenerator))
    }

    pub fn with_id_generator(registry: Arc<ProviderRegistry>, ids: Arc<dyn IdGenerator>) -> Self {
        let counters = CreationCounters::for_registry(&registry);
        Self {
            registry,
            counters,
            ids,
        }
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    pub fn counters(&self) -> &CreationCounters {
        &self.counters
    }

    /// Default contents for a new file of `provider_type`, with fresh ids.
    pub fn initial_file_contents(&self, provider_type: &str) -> Option<String> {
        self.registry
            .get(provider_type)?
            .initial_contents()
            .map(|template| replace_ids(template, self.ids.as_ref()))
    }

    /// Create an unsaved file for the "new file" action.
    ///
    /// # Errors
    ///
    /// [`TabsError::UnknownProviderType`] when `provider_type` is not
    /// registered, [`TabsError::NotCreatable`] when the provider has no
    /// default filename. Both indicate miswired menus, not bad user input.
    pub fn create_file(&self, provider_type: &str) -> TabsResult<File> {
        let provider = self
            .registry
            .get(provider_type)
            .ok_or_else(|| TabsError::UnknownProviderType {
                provider_type: provider_type.to_string(),
            })?;

        let not_creatable = || TabsError::NotCreatable {
            provider_type: provider_type.to_string(),
        };

        // A rejected request must not advance the counter.
        if provider.default_filename(0).is_none() {
            return Err(not_creatable());
        }

        let counter = self.counters.next(provider_type).ok_or_else(not_creatable)?;
        let name = provider.default_filename(counter).ok_or_else(not_creatable)?;

        tracing::debug!(provider = provider_type, file = %name, "created new file");

        Ok(File {
            name,
            contents: self.initial_file_contents(provider_type),
            path: None,
        })
    }

    /// Wrap `file` in a tab owned by its resolved provider.
    ///
    /// Returns `None` when no provider can open the file; callers report that
    /// to the user. Empty files receive the provider's default contents.
    pub fn create_tab(&self, mut file: File) -> Option<Tab> {
        let provider = self.registry.resolve(&file)?;

        if file.is_empty()
            && let Some(contents) = self.initial_file_contents(provider.provider_type())
        {
            file.contents = Some(contents);
        }

        Some(Tab {
            id: self.ids.generate_id(),
            file,
            provider_type: provider.provider_type().to_string(),
        })
    }

    /// New tab for a new file of `provider_type`.
    pub fn create_tab_for(&self, provider_type: &str) -> TabsResult<Option<Tab>> {
        let file = self.create_file(provider_type)?;
        Ok(self.create_tab(file))
    }
}

impl std::fmt::Debug for SessionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionFactory")
            .field("providers", &self.registry.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}
