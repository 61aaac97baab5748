//! File-to-provider resolution.

use std::sync::Arc;

use crate::descriptor::ProviderDescriptor;
use crate::file::File;
use crate::registry::ProviderRegistry;

/// Extension of `name`: text after the last `.`, lowercased.
///
/// `None` when the name contains no `.` at all.
///
/// ```
/// use diagrid_core::file_extension;
///
/// assert_eq!(file_extension("Order.DMN").as_deref(), Some("dmn"));
/// assert_eq!(file_extension("archive.tar.bpmn").as_deref(), Some("bpmn"));
/// assert_eq!(file_extension("Makefile"), None);
/// ```
pub fn file_extension(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// Select the provider owning `file`.
///
/// 1. Candidates are the providers claiming the file's extension, in
///    declaration order.
/// 2. No candidates: the first registered provider whose open check accepts
///    the file wins, otherwise `None`.
/// 3. One candidate: it wins without looking at the contents.
/// 4. Several candidates: the first whose open check accepts the file wins,
///    otherwise the last candidate.
///
/// The result depends only on the registry and the file.
pub fn resolve(registry: &ProviderRegistry, file: &File) -> Option<Arc<ProviderDescriptor>> {
    let candidates = match file_extension(&file.name) {
        Some(ext) => registry.providers_for_extension(&ext),
        None => Vec::new(),
    };

    let resolved = match candidates.len() {
        0 => registry
            .providers()
            .iter()
            .find(|p| p.can_open(file))
            .cloned(),
        1 => candidates.into_iter().next(),
        _ => {
            let matched = candidates.iter().position(|p| p.can_open(file));
            let idx = matched.unwrap_or(candidates.len() - 1);
            if matched.is_none() {
                tracing::trace!(file = %file.name, "no candidate accepted contents, using fallback");
            }
            candidates.into_iter().nth(idx)
        }
    };

    match &resolved {
        Some(provider) => tracing::debug!(
            file = %file.name,
            provider = provider.provider_type(),
            "resolved provider"
        ),
        None => tracing::debug!(file = %file.name, "no provider can open file"),
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "urn:marker";

    fn registry() -> ProviderRegistry {
        ProviderRegistry::builder()
            .register(ProviderDescriptor::new("empty"))
            .register(
                ProviderDescriptor::new("p1")
                    .with_extensions(&["bpmn"])
                    .with_open_check(|f: &File| f.contents_str().contains(MARKER)),
            )
            .register(
                ProviderDescriptor::new("p2")
                    .with_extensions(&["bpmn"])
                    .with_open_check(|f: &File| f.contents_str().contains("<definitions")),
            )
            .register(
                ProviderDescriptor::new("d")
                    .with_extensions(&["dmn"])
                    .with_open_check(|f: &File| f.contents_str().contains("dmn")),
            )
            .build()
            .unwrap()
    }

    fn resolved_type(registry: &ProviderRegistry, file: &File) -> Option<String> {
        resolve(registry, file).map(|p| p.provider_type().to_string())
    }

    #[test]
    fn extension_after_last_dot() {
        assert_eq!(file_extension("a.b.c").as_deref(), Some("c"));
        assert_eq!(file_extension(".bpmn").as_deref(), Some("bpmn"));
        assert_eq!(file_extension("trailing.").as_deref(), Some(""));
        assert_eq!(file_extension("none"), None);
    }

    #[test]
    fn shared_extension_prefers_first_matching_candidate() {
        let registry = registry();
        let file = File::new("a.bpmn").with_contents(format!("<definitions xmlns:z=\"{}\"/>", MARKER));
        assert_eq!(resolved_type(&registry, &file).as_deref(), Some("p1"));
    }

    #[test]
    fn shared_extension_without_match_falls_back_to_last() {
        let registry = registry();
        let file = File::new("a.bpmn").with_contents("not xml at all");
        assert_eq!(resolved_type(&registry, &file).as_deref(), Some("p2"));

        let unmaterialized = File::new("a.bpmn");
        assert_eq!(resolved_type(&registry, &unmaterialized).as_deref(), Some("p2"));
    }

    #[test]
    fn sole_owner_wins_regardless_of_content() {
        let registry = registry();
        let file = File::new("b.DMN").with_contents("garbage");
        assert_eq!(resolved_type(&registry, &file).as_deref(), Some("d"));
    }

    #[test]
    fn unclaimed_extension_sniffs_in_declaration_order() {
        let registry = registry();
        // p1 and p2 both accept; p1 is declared first
        let file = File::new("notes.txt").with_contents(format!("<definitions>{}</definitions>", MARKER));
        assert_eq!(resolved_type(&registry, &file).as_deref(), Some("p1"));

        let file = File::new("notes.txt").with_contents("<definitions/>");
        assert_eq!(resolved_type(&registry, &file).as_deref(), Some("p2"));
    }

    #[test]
    fn unclaimed_extension_without_match_is_unopenable() {
        let registry = registry();
        assert_eq!(resolved_type(&registry, &File::new("notes.txt").with_contents("hello")), None);
        assert_eq!(resolved_type(&registry, &File::new("README")), None);
    }

    #[test]
    fn empty_registry_resolves_nothing() {
        let registry = ProviderRegistry::builder().build().unwrap();
        assert!(resolve(&registry, &File::new("a.bpmn").with_contents("<definitions/>")).is_none());
    }

    #[test]
    fn gated_provider_changes_resolution() {
        let registry = ProviderRegistry::builder()
            .with_source(&TestSource)
            .without_provider("d")
            .build()
            .unwrap();
        let file = File::new("b.dmn").with_contents("garbage");
        assert_eq!(resolved_type(&registry, &file), None);

        let file = File::new("b.dmn").with_contents("a dmn file");
        assert_eq!(resolved_type(&registry, &file), None);
    }

    struct TestSource;
    impl crate::registry::ProviderSource for TestSource {
        fn providers(&self) -> Vec<ProviderDescriptor> {
            vec![
                ProviderDescriptor::new("d")
                    .with_extensions(&["dmn"])
                    .with_open_check(|f: &File| f.contents_str().contains("dmn")),
            ]
        }
    }
}
