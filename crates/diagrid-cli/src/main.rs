//! diagrid CLI - resolve diagram files to editors and create new diagrams

mod cli;
mod output;
mod telemetry;

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use diagrid_core::dialect::classify;
use diagrid_core::fs::FileSystem;
use diagrid_core::{File, Flags, TabsConfig, TabsProvider};

use cli::{Cli, Command, OutputFormat};
use output::{CreatedFile, OpenedTab, Resolution};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "diagrid_core=debug,diagrid_cli=debug",
        _ => "diagrid_core=trace,diagrid_cli=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config from `--config`, with `--flag` overrides applied on top.
fn load_config(cli: &Cli) -> anyhow::Result<TabsConfig> {
    let (mut config, warning) = TabsConfig::load_or_default(cli.config.as_ref());
    if let Some(warning) = warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    if let Some(path) = &cli.config {
        output::print_config_warnings(path, &config.validate());
    }

    for raw in &cli.flags {
        let Some((name, value)) = Flags::parse_override(raw) else {
            bail!("Invalid --flag '{}': expected NAME or NAME=true|false", raw);
        };
        config.flags.set(name, value);
    }

    tracing::debug!(flags = ?config.flags, "effective feature flags");
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli)?;
    let tabs = TabsProvider::from_config(&config)?;
    let fs = config.filesystem();

    match &cli.command {
        Command::Providers => {
            let summaries: Vec<_> = tabs.providers().iter().map(|p| p.summary()).collect();
            output::print_providers(&summaries, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { files } => {
            let mut rows = Vec::with_capacity(files.len());
            for path in files {
                let file = File::load(&fs, path)
                    .with_context(|| format!("Cannot read {}", path.display()))?;
                rows.push(Resolution {
                    file: path.display().to_string(),
                    dialect: classify(file.contents_str()).to_string(),
                    provider: tabs.resolve(&file).map(|p| p.provider_type().to_string()),
                });
            }
            output::print_resolutions(&rows, cli.format)?;

            let all_resolved = rows.iter().all(|r| r.provider.is_some());
            Ok(if all_resolved {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::New {
            provider_type,
            count,
            output_dir,
        } => {
            let mut created = Vec::with_capacity(*count as usize);
            for _ in 0..*count {
                let file = tabs.create_file(provider_type)?;
                created.push(match output_dir {
                    Some(dir) => write_new_file(dir, &file)?,
                    None => CreatedFile {
                        name: file.name,
                        path: None,
                        contents: file.contents,
                    },
                });
            }
            output::print_created(&created, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Open {
            file,
            telemetry,
            element_templates,
        } => open(&tabs, &fs, &config, file, *telemetry, element_templates, cli.format),
        Command::Schema => {
            output::print_json(&diagrid_core::generate_schema())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn write_new_file(dir: &Path, file: &File) -> anyhow::Result<CreatedFile> {
    std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;

    let path = dir.join(&file.name);
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    std::fs::write(&path, file.contents_str())
        .with_context(|| format!("Cannot write {}", path.display()))?;

    Ok(CreatedFile {
        name: file.name.clone(),
        path: Some(path.display().to_string()),
        contents: None,
    })
}

fn open(
    tabs: &TabsProvider,
    fs: &dyn FileSystem,
    config: &TabsConfig,
    path: &Path,
    emit_usage: bool,
    element_templates: &[std::path::PathBuf],
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let file = File::load(fs, path).with_context(|| format!("Cannot read {}", path.display()))?;

    let Some(tab) = tabs.create_tab(file) else {
        eprintln!(
            "{} {}: cannot open this file type",
            "error:".red().bold(),
            path.display()
        );
        return Ok(ExitCode::FAILURE);
    };

    // Components load on first display; the CLI displays once.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let component = runtime
        .block_on(tabs.load_capability(&tab))?
        .map(|c| c.name().to_string());

    output::print_opened(&OpenedTab::new(&tab, component), format)?;

    if emit_usage || config.telemetry.enabled {
        let templates = telemetry::load_element_templates(element_templates)?;
        if let Some(record) = telemetry::diagram_opened(&tab, &templates) {
            output::print_json(&record)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
