//! Cross-crate integration tests verifying contracts between workspace crates.
//!
//! These tests simulate how the CLI and an editor host use diagrid-core:
//! configuration from disk, files read through the size-limited filesystem,
//! plugin provider sources, and capability loading from concurrent tasks.

use std::io::Write;
use std::sync::Arc;

use diagrid_core::{
    BuiltinLoader, File, ProviderDescriptor, ProviderRegistry, ProviderSource, TabsConfig,
    TabsProvider, UuidIdGenerator,
};

// ============================================================================
// CLI <-> core contracts
// ============================================================================

#[test]
fn cli_config_from_disk_gates_providers() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"max_file_size = 4096\n\n[flags]\ndisable-cmmn = false\ndisable-dmn = true\n")
        .unwrap();
    file.flush().unwrap();

    let config = TabsConfig::load(file.path()).unwrap();
    assert!(config.validate().is_empty());

    let tabs = TabsProvider::from_config(&config).unwrap();
    let types: Vec<&str> = tabs.providers().iter().map(|p| p.provider_type()).collect();
    assert_eq!(types, vec!["empty", "cloud-bpmn", "bpmn", "cmmn"]);
}

#[test]
fn cli_reads_files_through_config_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.bpmn");
    std::fs::write(&path, "x".repeat(100)).unwrap();

    let config = TabsConfig {
        max_file_size: 10,
        ..TabsConfig::default()
    };
    let err = File::load(&config.filesystem(), &path).unwrap_err();
    assert!(matches!(err, diagrid_core::TabsError::FileTooBig { .. }));

    let file = File::load(&TabsConfig::default().filesystem(), &path).unwrap();
    assert_eq!(file.name, "order.bpmn");
    assert!(file.is_saved());
}

#[test]
fn cli_provider_summaries_serialize() {
    let tabs = TabsProvider::default();
    let summaries: Vec<_> = tabs.providers().iter().map(|p| p.summary()).collect();
    let json = serde_json::to_value(&summaries).unwrap();

    assert_eq!(json[0]["type"], "empty");
    assert_eq!(json[0]["creatable"], false);
    assert_eq!(json[2]["name"], "BPMN");
    assert_eq!(json[2]["newFileMenu"][0]["accelerator"], "CommandOrControl+T");
}

// ============================================================================
// Plugin provider sources
// ============================================================================

struct FormSource;

impl ProviderSource for FormSource {
    fn providers(&self) -> Vec<ProviderDescriptor> {
        vec![
            ProviderDescriptor::new("form")
                .with_display_name("Form")
                .with_extensions(&["form"])
                .with_open_check(|file: &File| file.contents_str().contains("\"components\""))
                .with_initial_contents(r#"{ "id": "Form_{{ ID }}", "components": [] }"#)
                .with_filename_stem("form")
                .with_component("form"),
        ]
    }
}

#[test]
fn plugin_source_participates_in_resolution_and_creation() {
    let registry = ProviderRegistry::builder()
        .with_defaults()
        .with_source(&FormSource)
        .build()
        .unwrap();
    let tabs = TabsProvider::from_parts(registry, Arc::new(UuidIdGenerator), Arc::new(BuiltinLoader));

    assert_eq!(tabs.provider_names(), vec!["BPMN", "DMN", "Form"]);

    let tab = tabs.create_tab_for("form").unwrap().unwrap();
    assert_eq!(tab.name(), "form_1.form");
    assert!(!tab.contents().contains("{{"));

    // unclaimed extension, sniffed by the plugin
    let sniffed = tabs
        .resolve(&File::new("layout.json").with_contents(r#"{"components": []}"#))
        .unwrap();
    assert_eq!(sniffed.provider_type(), "form");
}

// ============================================================================
// Host <-> core: concurrent display
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tab_display_shares_one_component() {
    let tabs = Arc::new(TabsProvider::default());

    let mut handles = Vec::new();
    for _ in 0..8 {
        let tabs = Arc::clone(&tabs);
        handles.push(tokio::spawn(async move {
            let tab = tabs.create_tab_for("bpmn").unwrap().unwrap();
            let component = tabs.load_capability(&tab).await.unwrap().unwrap();
            (tab.id().to_string(), tab.name().to_string(), component)
        }));
    }

    let mut ids = std::collections::HashSet::new();
    let mut names = std::collections::HashSet::new();
    let mut components = Vec::new();
    for handle in handles {
        let (id, name, component) = handle.await.unwrap();
        ids.insert(id);
        names.insert(name);
        components.push(component);
    }

    assert_eq!(ids.len(), 8);
    // atomic counters: no duplicate default filenames under concurrency
    assert_eq!(names.len(), 8);
    assert!(components.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert!(tabs.is_capability_loaded("bpmn"));
}
