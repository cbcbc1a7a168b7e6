//! On-disk state shared between invocations
//!
//! - Deployment ledger of published packages and their created objects
//! - Ingredient list with the addresses minted so far

pub mod ingredients;
pub mod ledger;

pub use ingredients::{load_ingredients, save_ingredients};
pub use ledger::{DeploymentLedger, ModuleRecord};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write `value` as tab-indented JSON, creating parent directories.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut ser)?;

    std::fs::write(path, out)?;
    Ok(())
}
