//! API contract tests for diagrid-core.
//!
//! Menu, help and export subsystems outside this crate key off these types.
//! A failure here means a public API changed shape.

use std::sync::Arc;

// ============================================================================
// Public type importability
// ============================================================================

#[test]
fn public_types_are_importable() {
    let _ = std::any::type_name::<diagrid_core::ProviderDescriptor>();
    let _ = std::any::type_name::<diagrid_core::ProviderSummary>();
    let _ = std::any::type_name::<diagrid_core::ExportFormat>();
    let _ = std::any::type_name::<diagrid_core::Encoding>();
    let _ = std::any::type_name::<diagrid_core::MenuEntry>();
    let _ = std::any::type_name::<diagrid_core::ProviderRegistry>();
    let _ = std::any::type_name::<diagrid_core::ProviderRegistryBuilder>();
    let _ = std::any::type_name::<diagrid_core::ProviderGate>();
    let _ = std::any::type_name::<diagrid_core::BuiltinSource>();
    let _ = std::any::type_name::<diagrid_core::File>();
    let _ = std::any::type_name::<diagrid_core::Tab>();
    let _ = std::any::type_name::<diagrid_core::SessionFactory>();
    let _ = std::any::type_name::<diagrid_core::CreationCounters>();
    let _ = std::any::type_name::<diagrid_core::TabsProvider>();
    let _ = std::any::type_name::<diagrid_core::TabsConfig>();
    let _ = std::any::type_name::<diagrid_core::Flags>();
    let _ = std::any::type_name::<diagrid_core::TabsError>();
    let _ = std::any::type_name::<diagrid_core::TabsResult<()>>();
    let _ = std::any::type_name::<diagrid_core::DiagramOpenedEvent>();
    let _ = std::any::type_name::<diagrid_core::dialect::Dialect>();
    let _ = std::any::type_name::<diagrid_core::fs::RealFileSystem>();
    let _ = std::any::type_name::<diagrid_core::fs::mock::MockFileSystem>();

    // Trait objects
    fn _assert_source_trait(_: &dyn diagrid_core::ProviderSource) {}
    fn _assert_loader_trait(_: &dyn diagrid_core::CapabilityLoader) {}
    fn _assert_component_trait(_: &dyn diagrid_core::EditorComponent) {}
    fn _assert_ids_trait(_: &dyn diagrid_core::IdGenerator) {}
    fn _assert_filesystem_trait(_: &dyn diagrid_core::fs::FileSystem) {}
}

// ============================================================================
// Public function signatures
// ============================================================================

#[test]
fn public_functions_compile_with_expected_signatures() {
    use diagrid_core::{File, ProviderDescriptor, ProviderRegistry};

    // resolve(registry, file) -> Option<Arc<ProviderDescriptor>>
    let _: fn(&ProviderRegistry, &File) -> Option<Arc<ProviderDescriptor>> = diagrid_core::resolve;

    // file_extension(name) -> Option<String>
    let _: fn(&str) -> Option<String> = diagrid_core::file_extension;

    // classify(text) -> Dialect
    let _: fn(&str) -> diagrid_core::dialect::Dialect = diagrid_core::dialect::classify;

    // has_namespace_usage(text, uri) -> bool
    let _: fn(&str, &str) -> bool = diagrid_core::dialect::has_namespace_usage;

    // replace_ids(template, ids) -> String
    let _: fn(&str, &dyn diagrid_core::IdGenerator) -> String = diagrid_core::replace_ids;

    let _: fn() -> schemars::Schema = diagrid_core::generate_schema;
}

// ============================================================================
// Export format shape
// ============================================================================

#[test]
fn export_format_carries_name_encoding_extensions() {
    let format = diagrid_core::ExportFormat::png();
    let json = serde_json::to_value(&format).unwrap();
    let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["encoding", "extensions", "name"]);
}

#[test]
fn provider_summary_field_names() {
    let tabs = diagrid_core::TabsProvider::default();
    let json = serde_json::to_value(tabs.provider("bpmn").summary()).unwrap();
    for key in [
        "type",
        "name",
        "extensions",
        "openExtensions",
        "encoding",
        "exports",
        "creatable",
        "helpMenu",
        "newFileMenu",
        "newFileButton",
    ] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
}

// ============================================================================
// Error variants
// ============================================================================

#[test]
fn tabs_error_variants_are_matchable() {
    use diagrid_core::TabsError;

    let err = TabsError::UnknownProviderType {
        provider_type: "x".to_string(),
    };
    match err {
        TabsError::UnknownProviderType { .. }
        | TabsError::NotCreatable { .. }
        | TabsError::DuplicateProvider { .. }
        | TabsError::CapabilityLoad { .. }
        | TabsError::FileRead { .. }
        | TabsError::FileNotRegular { .. }
        | TabsError::FileTooBig { .. }
        | TabsError::ConfigParse { .. } => {}
    }
}
