//! Local rendering of usage events.
//!
//! Nothing is submitted anywhere: the CLI prints the record the editor host
//! would send, so payloads can be inspected and diffed.

use anyhow::Context;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use diagrid_core::telemetry::EVENT_NAME;
use diagrid_core::{DiagramOpenedEvent, Tab};

#[derive(Debug, Serialize)]
pub struct UsageRecord {
    pub event: &'static str,
    pub timestamp: String,
    pub payload: DiagramOpenedEvent,
}

/// Record for a tab that was just displayed; `None` for non-diagram tabs.
pub fn diagram_opened(tab: &Tab, element_templates: &[serde_json::Value]) -> Option<UsageRecord> {
    DiagramOpenedEvent::for_tab(tab, element_templates).map(|payload| UsageRecord {
        event: EVENT_NAME,
        timestamp: chrono_timestamp(),
        payload,
    })
}

/// Read element-template files. A file holds one template or an array of them.
pub fn load_element_templates(paths: &[PathBuf]) -> anyhow::Result<Vec<serde_json::Value>> {
    let mut templates = Vec::new();
    for path in paths {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read element templates from {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid element template JSON in {}", path.display()))?;
        match value {
            serde_json::Value::Array(items) => templates.extend(items),
            other => templates.push(other),
        }
    }
    Ok(templates)
}

/// Get current timestamp as ISO 8601 string (YYYY-MM-DDTHH:MM:SSZ).
pub fn chrono_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    format_timestamp(now)
}

fn format_timestamp(secs: u64) -> String {
    const SECS_PER_DAY: u64 = 86_400;

    let days = secs / SECS_PER_DAY;
    let remaining = secs % SECS_PER_DAY;
    let (hours, minutes, seconds) = (remaining / 3600, remaining % 3600 / 60, remaining % 60);

    let mut year = 1970i32;
    let mut remaining_days = days as i32;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let days_in_months = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut month = 1;
    for days_in_month in days_in_months {
        if remaining_days < days_in_month {
            break;
        }
        remaining_days -= days_in_month;
        month += 1;
    }

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        remaining_days + 1,
        hours,
        minutes,
        seconds
    )
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
