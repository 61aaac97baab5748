//! Built-in provider table and its feature gates.

use crate::descriptor::{Encoding, ExportFormat, MenuEntry, ProviderDescriptor};
use crate::dialect::{Dialect, NAMESPACE_ZEEBE, classify, has_namespace_usage};
use crate::file::File;
use crate::registry::{ProviderGate, ProviderSource};

pub const EMPTY: &str = "empty";
pub const BPMN: &str = "bpmn";
pub const CLOUD_BPMN: &str = "cloud-bpmn";
pub const DMN: &str = "dmn";
pub const CMMN: &str = "cmmn";

pub const FLAG_DISABLE_CMMN: &str = "disable-cmmn";
pub const FLAG_DISABLE_DMN: &str = "disable-dmn";

const BPMN_TEMPLATE: &str = include_str!("../templates/bpmn.bpmn");
const CLOUD_BPMN_TEMPLATE: &str = include_str!("../templates/cloud-bpmn.bpmn");
const DMN_TEMPLATE: &str = include_str!("../templates/dmn.dmn");
const CMMN_TEMPLATE: &str = include_str!("../templates/cmmn.cmmn");

/// The built-in provider source shipping with diagrid-core.
///
/// Declaration order matters: it is the scan order for files whose extension
/// nobody claims, and the priority order among providers sharing an
/// extension. `cloud-bpmn` precedes `bpmn` so that `bpmn`, the generic
/// editor, is the fallback for `.bpmn` files.
///
/// Diagram providers list `.xml` as a dialog extension only. Nobody claims it,
/// so XML files are routed by content.
pub struct BuiltinSource;

impl ProviderSource for BuiltinSource {
    fn providers(&self) -> Vec<ProviderDescriptor> {
        vec![empty(), cloud_bpmn(), bpmn(), dmn(), cmmn()]
    }

    fn gates(&self) -> Vec<ProviderGate> {
        builtin_gates()
    }
}

/// Startup gates for built-in providers. CMMN is off unless explicitly enabled.
pub fn builtin_gates() -> Vec<ProviderGate> {
    vec![
        ProviderGate::new(CMMN, FLAG_DISABLE_CMMN, true),
        ProviderGate::new(DMN, FLAG_DISABLE_DMN, false),
    ]
}

fn diagram_exports(provider: ProviderDescriptor) -> ProviderDescriptor {
    provider
        .with_encoding(Encoding::Utf8)
        .with_export("png", ExportFormat::png())
        .with_export("jpeg", ExportFormat::jpeg())
        .with_export("svg", ExportFormat::svg())
}

fn is_dialect(file: &File, dialect: Dialect) -> bool {
    classify(file.contents_str()) == dialect
}

fn empty() -> ProviderDescriptor {
    ProviderDescriptor::new(EMPTY).with_component("empty")
}

fn bpmn() -> ProviderDescriptor {
    diagram_exports(ProviderDescriptor::new(BPMN))
        .with_display_name("BPMN")
        .with_extensions(&["bpmn"])
        .with_dialog_extensions(&["xml"])
        .with_open_check(|file: &File| is_dialect(file, Dialect::Bpmn))
        .with_initial_contents(BPMN_TEMPLATE)
        .with_filename_stem("diagram")
        .with_component("bpmn")
        .with_help_entry(MenuEntry::new(
            "BPMN 2.0 Tutorial",
            "https://camunda.org/bpmn/tutorial/",
        ))
        .with_help_entry(MenuEntry::new(
            "BPMN Modeling Reference",
            "https://camunda.org/bpmn/reference/",
        ))
        .with_new_file_entry(
            MenuEntry::new("BPMN Diagram (Camunda)", "create-bpmn-diagram")
                .with_accelerator("CommandOrControl+T"),
        )
        .with_new_file_button(MenuEntry::new(
            "Create new BPMN Diagram (Camunda)",
            "create-bpmn-diagram",
        ))
}

fn cloud_bpmn() -> ProviderDescriptor {
    diagram_exports(ProviderDescriptor::new(CLOUD_BPMN))
        .with_extensions(&["bpmn"])
        .with_dialog_extensions(&["xml"])
        .with_open_check(|file: &File| {
            !file.is_empty() && has_namespace_usage(file.contents_str(), NAMESPACE_ZEEBE)
        })
        .with_initial_contents(CLOUD_BPMN_TEMPLATE)
        .with_filename_stem("diagram")
        .with_component("cloud-bpmn")
        .with_new_file_entry(MenuEntry::new(
            "BPMN Diagram (Zeebe)",
            "create-cloud-bpmn-diagram",
        ))
        .with_new_file_button(MenuEntry::new(
            "Create new BPMN Diagram (Zeebe)",
            "create-cloud-bpmn-diagram",
        ))
}

fn dmn() -> ProviderDescriptor {
    diagram_exports(ProviderDescriptor::new(DMN))
        .with_display_name("DMN")
        .with_extensions(&["dmn"])
        .with_dialog_extensions(&["xml"])
        .with_open_check(|file: &File| is_dialect(file, Dialect::Dmn))
        .with_initial_contents(DMN_TEMPLATE)
        .with_filename_stem("diagram")
        .with_component("dmn")
        .with_help_entry(MenuEntry::new(
            "DMN 1.1 Tutorial",
            "https://camunda.org/dmn/tutorial/",
        ))
        .with_new_file_entry(MenuEntry::new("DMN Diagram (Camunda)", "create-dmn-diagram"))
        .with_new_file_button(MenuEntry::new(
            "Create new DMN Diagram (Camunda)",
            "create-dmn-diagram",
        ))
}

fn cmmn() -> ProviderDescriptor {
    diagram_exports(ProviderDescriptor::new(CMMN))
        .with_display_name("CMMN")
        .with_extensions(&["cmmn"])
        .with_dialog_extensions(&["xml"])
        .with_open_check(|file: &File| is_dialect(file, Dialect::Cmmn))
        .with_initial_contents(CMMN_TEMPLATE)
        .with_filename_stem("diagram")
        .with_component("cmmn")
        .with_help_entry(MenuEntry::new(
            "CMMN 1.1 Tutorial",
            "https://docs.camunda.org/get-started/cmmn11/",
        ))
        .with_help_entry(MenuEntry::new(
            "CMMN Modeling Reference",
            "https://docs.camunda.org/manual/latest/reference/cmmn11/",
        ))
        .with_new_file_entry(MenuEntry::new("CMMN Diagram", "create-cmmn-diagram"))
        .with_new_file_button(MenuEntry::new("Create new CMMN Diagram", "create-cmmn-diagram"))
}
