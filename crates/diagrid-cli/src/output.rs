//! Text and JSON rendering of command results.

use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use diagrid_core::{ConfigWarning, ProviderSummary, Tab};

use crate::cli::OutputFormat;

/// One row of `diagrid resolve`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub file: String,
    /// `None` when no provider can open the file.
    pub provider: Option<String>,
    pub dialect: String,
}

/// Result of `diagrid open`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedTab {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub component: Option<String>,
}

impl OpenedTab {
    pub fn new(tab: &Tab, component: Option<String>) -> Self {
        Self {
            id: tab.id().to_string(),
            name: tab.name().to_string(),
            title: tab.title(),
            provider_type: tab.provider_type().to_string(),
            component,
        }
    }
}

/// One file produced by `diagrid new`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFile {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_config_warnings(path: &Path, warnings: &[ConfigWarning]) {
    for warning in warnings {
        eprintln!(
            "{} {}: {} ({})",
            "warning:".yellow().bold(),
            path.display(),
            warning.message,
            warning.field.dimmed()
        );
        if let Some(suggestion) = &warning.suggestion {
            eprintln!("  {} {}", "help:".cyan(), suggestion);
        }
    }
}

pub fn print_providers(providers: &[ProviderSummary], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(providers);
    }

    for provider in providers {
        let name = provider.display_name.as_deref().unwrap_or("-");
        let extensions = if provider.extensions.is_empty() {
            "(content only)".dimmed().to_string()
        } else {
            provider
                .extensions
                .iter()
                .map(|e| format!(".{}", e))
                .collect::<Vec<_>>()
                .join(" ")
        };
        println!("{:<12} {:<6} {}", provider.provider_type.bold(), name, extensions);
    }
    Ok(())
}

pub fn print_resolutions(rows: &[Resolution], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(rows);
    }

    for row in rows {
        match &row.provider {
            Some(provider) => println!(
                "{} {} {}",
                row.file,
                "->".dimmed(),
                provider.green().bold()
            ),
            None => println!(
                "{} {} {}",
                row.file,
                "->".dimmed(),
                "cannot open this file type".red()
            ),
        }
    }
    Ok(())
}

pub fn print_created(files: &[CreatedFile], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(files);
    }

    for file in files {
        match (&file.path, &file.contents) {
            (Some(path), _) => println!("{} {}", "created".green(), path),
            (None, Some(contents)) => {
                println!("{}", format!("--- {}", file.name).bold());
                println!("{}", contents);
            }
            (None, None) => println!("{}", file.name),
        }
    }
    Ok(())
}

pub fn print_opened(tab: &OpenedTab, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(tab);
    }

    println!("{} {}", "tab".bold(), tab.id);
    println!("  title:     {}", tab.title);
    println!("  type:      {}", tab.provider_type.green());
    println!(
        "  component: {}",
        tab.component.as_deref().unwrap_or("(none)")
    );
    Ok(())
}
