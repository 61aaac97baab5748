//! Provider descriptors: one static configuration record per editor type.
//!
//! The descriptor shape is consumed by menu, help and export subsystems
//! outside this crate, so field names and [`ExportFormat`] are kept stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::file::File;

/// Predicate deciding whether a provider recognizes a file's contents.
pub type OpenCheck = Arc<dyn Fn(&File) -> bool + Send + Sync>;

/// How exported artifacts are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Binary payload carried as base64 text
    Base64,
    /// Plain UTF-8 text
    Utf8,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Base64 => "base64",
            Encoding::Utf8 => "utf8",
        })
    }
}

/// An export target offered by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFormat {
    /// Display name, e.g. `PNG image`
    pub name: String,
    pub encoding: Encoding,
    pub extensions: Vec<String>,
}

impl ExportFormat {
    pub fn new(name: impl Into<String>, encoding: Encoding, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            encoding,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    pub fn png() -> Self {
        Self::new("PNG image", Encoding::Base64, &["png"])
    }

    pub fn jpeg() -> Self {
        Self::new("JPEG image", Encoding::Base64, &["jpeg"])
    }

    pub fn svg() -> Self {
        Self::new("SVG image", Encoding::Utf8, &["svg"])
    }
}

/// A menu item or button contributed by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub label: String,
    /// Action id or URL triggered by the entry.
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerator: Option<String>,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
            accelerator: None,
        }
    }

    pub fn with_accelerator(mut self, accelerator: impl Into<String>) -> Self {
        self.accelerator = Some(accelerator.into());
        self
    }
}

/// Static configuration for one editor provider.
///
/// Built with chained `with_*` calls and frozen once handed to a
/// [`ProviderRegistry`](crate::ProviderRegistry).
///
/// A descriptor without an open check and without extensions is a valid
/// terminal fallback: it can open nothing.
///
/// # Example
///
/// ```
/// use diagrid_core::{ExportFormat, File, ProviderDescriptor};
///
/// let provider = ProviderDescriptor::new("form")
///     .with_display_name("Form")
///     .with_extensions(&["form"])
///     .with_export("svg", ExportFormat::svg())
///     .with_open_check(|file: &File| file.contents_str().contains("\"components\""))
///     .with_filename_stem("form");
///
/// assert_eq!(provider.default_filename(3).as_deref(), Some("form_3.form"));
/// ```
#[derive(Clone)]
pub struct ProviderDescriptor {
    provider_type: String,
    display_name: Option<String>,
    extensions: Vec<String>,
    dialog_extensions: Vec<String>,
    encoding: Encoding,
    exports: Vec<(String, ExportFormat)>,
    open_check: Option<OpenCheck>,
    initial_contents: Option<String>,
    filename_stem: Option<String>,
    component: Option<String>,
    help_menu: Vec<MenuEntry>,
    new_file_menu: Vec<MenuEntry>,
    new_file_button: Option<MenuEntry>,
}

impl ProviderDescriptor {
    /// A descriptor that opens nothing and provides nothing.
    pub fn new(provider_type: impl Into<String>) -> Self {
        Self {
            provider_type: provider_type.into(),
            display_name: None,
            extensions: Vec::new(),
            dialog_extensions: Vec::new(),
            encoding: Encoding::Utf8,
            exports: Vec::new(),
            open_check: None,
            initial_contents: None,
            filename_stem: None,
            component: None,
            help_menu: Vec::new(),
            new_file_menu: Vec::new(),
            new_file_button: None,
        }
    }

    /// Shared no-op descriptor returned for unknown provider types.
    pub fn noop() -> Arc<ProviderDescriptor> {
        static NOOP: LazyLock<Arc<ProviderDescriptor>> =
            LazyLock::new(|| Arc::new(ProviderDescriptor::new("noop")));
        Arc::clone(&NOOP)
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Claim file extensions; stored lowercase without a leading dot.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        push_extensions(&mut self.extensions, extensions);
        self
    }

    /// Extensions offered by open dialogs without being claimed.
    ///
    /// These never enter the registry's extension index, so files with them
    /// are routed by content.
    pub fn with_dialog_extensions(mut self, extensions: &[&str]) -> Self {
        push_extensions(&mut self.dialog_extensions, extensions);
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_export(mut self, kind: impl Into<String>, format: ExportFormat) -> Self {
        let kind = kind.into();
        self.exports.retain(|(k, _)| *k != kind);
        self.exports.push((kind, format));
        self
    }

    pub fn with_open_check(mut self, check: impl Fn(&File) -> bool + Send + Sync + 'static) -> Self {
        self.open_check = Some(Arc::new(check));
        self
    }

    /// Template used for brand-new files; may contain `{{ ID }}` placeholders.
    pub fn with_initial_contents(mut self, template: impl Into<String>) -> Self {
        self.initial_contents = Some(template.into());
        self
    }

    /// Stem for default filenames (`{stem}_{counter}.{extension}`).
    pub fn with_filename_stem(mut self, stem: impl Into<String>) -> Self {
        self.filename_stem = Some(stem.into());
        self
    }

    /// Identifier of the editor component loaded when a tab is displayed.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_help_entry(mut self, entry: MenuEntry) -> Self {
        self.help_menu.push(entry);
        self
    }

    pub fn with_new_file_entry(mut self, entry: MenuEntry) -> Self {
        self.new_file_menu.push(entry);
        self
    }

    pub fn with_new_file_button(mut self, entry: MenuEntry) -> Self {
        self.new_file_button = Some(entry);
        self
    }

    // ---- accessors ----

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    /// Name shown in type pickers; `None` hides the provider from them.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Claimed extensions followed by dialog-only ones.
    pub fn open_extensions(&self) -> Vec<String> {
        let mut all = self.extensions.clone();
        all.extend(
            self.dialog_extensions
                .iter()
                .filter(|ext| !self.extensions.contains(ext))
                .cloned(),
        );
        all
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Export formats in declaration order.
    pub fn exports(&self) -> &[(String, ExportFormat)] {
        &self.exports
    }

    pub fn export_format(&self, kind: &str) -> Option<&ExportFormat> {
        self.exports
            .iter()
            .find_map(|(k, format)| (k == kind).then_some(format))
    }

    /// Whether this provider recognizes `file`. Always `false` without a check.
    pub fn can_open(&self, file: &File) -> bool {
        self.open_check.as_ref().is_some_and(|check| check(file))
    }

    /// Raw default-contents template, before identifiers are regenerated.
    pub fn initial_contents(&self) -> Option<&str> {
        self.initial_contents.as_deref()
    }

    /// Filename for the `counter`-th new file of this type.
    pub fn default_filename(&self, counter: u64) -> Option<String> {
        let stem = self.filename_stem.as_deref()?;
        Some(match self.extensions.first() {
            Some(ext) => format!("{}_{}.{}", stem, counter, ext),
            None => format!("{}_{}", stem, counter),
        })
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn help_menu(&self) -> &[MenuEntry] {
        &self.help_menu
    }

    pub fn new_file_menu(&self) -> &[MenuEntry] {
        &self.new_file_menu
    }

    pub fn new_file_button(&self) -> Option<&MenuEntry> {
        self.new_file_button.as_ref()
    }

    /// Serializable view of the descriptor for menus and `--format json`.
    pub fn summary(&self) -> ProviderSummary {
        ProviderSummary {
            provider_type: self.provider_type.clone(),
            display_name: self.display_name.clone(),
            extensions: self.extensions.clone(),
            open_extensions: self.open_extensions(),
            encoding: self.encoding,
            exports: self.exports.clone(),
            creatable: self.filename_stem.is_some(),
            help_menu: self.help_menu.clone(),
            new_file_menu: self.new_file_menu.clone(),
            new_file_button: self.new_file_button.clone(),
        }
    }
}

fn push_extensions(target: &mut Vec<String>, extensions: &[&str]) {
    for ext in extensions {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !target.contains(&ext) {
            target.push(ext);
        }
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("provider_type", &self.provider_type)
            .field("display_name", &self.display_name)
            .field("extensions", &self.extensions)
            .field("encoding", &self.encoding)
            .field("has_open_check", &self.open_check.is_some())
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

/// Plain-data snapshot of a [`ProviderDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    #[serde(rename = "type")]
    pub provider_type: String,
    #[serde(rename = "name")]
    pub display_name: Option<String>,
    pub extensions: Vec<String>,
    pub open_extensions: Vec<String>,
    pub encoding: Encoding,
    #[serde(serialize_with = "serialize_exports")]
    pub exports: Vec<(String, ExportFormat)>,
    pub creatable: bool,
    pub help_menu: Vec<MenuEntry>,
    pub new_file_menu: Vec<MenuEntry>,
    pub new_file_button: Option<MenuEntry>,
}

fn serialize_exports<S>(exports: &[(String, ExportFormat)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(exports.len()))?;
    for (kind, format) in exports {
        map.serialize_entry(kind, format)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_opens_nothing() {
        let provider = ProviderDescriptor::new("plain");
        assert!(!provider.can_open(&File::new("a.txt").with_contents("anything")));
        assert_eq!(provider.default_filename(1), None);
        assert_eq!(provider.initial_contents(), None);
        assert_eq!(provider.component(), None);
    }

    #[test]
    fn noop_is_a_shared_singleton() {
        let a = ProviderDescriptor::noop();
        let b = ProviderDescriptor::noop();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.display_name().is_none());
        assert!(!a.can_open(&File::new("x.bpmn").with_contents("<definitions/>")));
    }

    #[test]
    fn extensions_are_normalized_and_deduplicated() {
        let provider = ProviderDescriptor::new("p").with_extensions(&[".BPMN", "bpmn", "Xml", ""]);
        assert_eq!(provider.extensions(), &["bpmn".to_string(), "xml".to_string()]);
    }

    #[test]
    fn dialog_extensions_follow_claimed_ones() {
        let provider = ProviderDescriptor::new("p")
            .with_extensions(&["dmn"])
            .with_dialog_extensions(&[".XML", "dmn"]);
        assert_eq!(provider.extensions(), &["dmn".to_string()]);
        assert_eq!(provider.open_extensions(), vec!["dmn", "xml"]);
        assert_eq!(provider.summary().open_extensions, vec!["dmn", "xml"]);
    }

    #[test]
    fn default_filename_uses_primary_extension() {
        let provider = ProviderDescriptor::new("dmn")
            .with_extensions(&["dmn", "xml"])
            .with_filename_stem("diagram");
        assert_eq!(provider.default_filename(1).as_deref(), Some("diagram_1.dmn"));
        assert_eq!(provider.default_filename(12).as_deref(), Some("diagram_12.dmn"));
    }

    #[test]
    fn default_filename_without_extension() {
        let provider = ProviderDescriptor::new("scratch").with_filename_stem("scratch");
        assert_eq!(provider.default_filename(2).as_deref(), Some("scratch_2"));
    }

    #[test]
    fn open_check_is_consulted() {
        let provider =
            ProviderDescriptor::new("p").with_open_check(|file: &File| file.contents_str().starts_with("<x"));
        assert!(provider.can_open(&File::new("a").with_contents("<x/>")));
        assert!(!provider.can_open(&File::new("a")));
    }

    #[test]
    fn exports_keep_declaration_order_and_replace_duplicates() {
        let provider = ProviderDescriptor::new("p")
            .with_export("png", ExportFormat::png())
            .with_export("svg", ExportFormat::svg())
            .with_export("png", ExportFormat::new("Portable", Encoding::Base64, &["png"]));

        let kinds: Vec<&str> = provider.exports().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(kinds, vec!["svg", "png"]);
        assert_eq!(provider.export_format("png").unwrap().name, "Portable");
        assert_eq!(provider.export_format("svg").unwrap().encoding, Encoding::Utf8);
        assert!(provider.export_format("pdf").is_none());
    }

    #[test]
    fn summary_serializes_exports_as_map() {
        let provider = ProviderDescriptor::new("bpmn")
            .with_display_name("BPMN")
            .with_extensions(&["bpmn"])
            .with_export("png", ExportFormat::png())
            .with_filename_stem("diagram");

        let json = serde_json::to_value(provider.summary()).unwrap();
        assert_eq!(json["type"], "bpmn");
        assert_eq!(json["name"], "BPMN");
        assert_eq!(json["creatable"], true);
        assert_eq!(json["exports"]["png"]["name"], "PNG image");
        assert_eq!(json["exports"]["png"]["encoding"], "base64");
        assert_eq!(json["exports"]["png"]["extensions"][0], "png");
    }

    #[test]
    fn debug_does_not_require_closure_debug() {
        let provider = ProviderDescriptor::new("p").with_open_check(|_: &File| true);
        let rendered = format!("{:?}", provider);
        assert!(rendered.contains("has_open_check: true"));
    }
}
