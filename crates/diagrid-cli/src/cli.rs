use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "diagrid")]
#[command(about = "Resolve diagram files to editors and create new diagrams")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
    /// Config file (diagrid.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Override a feature flag, e.g. `--flag disable-cmmn=false`
    #[arg(long = "flag", value_name = "NAME[=BOOL]", global = true)]
    pub flags: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the active providers
    Providers,

    /// Show which provider opens each file
    Resolve {
        /// Files to resolve
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Create new diagram files
    New {
        /// Provider type, e.g. bpmn, cloud-bpmn, dmn
        provider_type: String,

        /// How many files to create
        #[arg(long, short = 'n', default_value_t = 1)]
        count: u32,

        /// Write files into this directory instead of printing them
        #[arg(long, short = 'o')]
        output_dir: Option<PathBuf>,
    },

    /// Open a file in a tab and load its editor component
    Open {
        file: PathBuf,

        /// Print the diagramOpened usage event
        #[arg(long)]
        telemetry: bool,

        /// Element template JSON files to summarize in the usage event
        #[arg(long = "element-templates", value_name = "PATH")]
        element_templates: Vec<PathBuf>,
    },

    /// Print the JSON Schema for diagrid.toml
    Schema,
}
