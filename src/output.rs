//! Output formatting for command results.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::error::Result;

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Render items in the chosen mode.
pub fn render_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> Result<String> {
    Ok(match mode {
        OutputMode::Table if items.is_empty() => "(no results)".to_string(),
        OutputMode::Table => Table::new(items).to_string(),
        OutputMode::Json => serde_json::to_string_pretty(items)?,
    })
}

pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> Result<()> {
    println!("{}", render_items(items, mode)?);
    Ok(())
}

/// Print a simple key-value pair.
pub fn print_kv(key: &str, value: &str) {
    println!("{key}: {value}");
}
