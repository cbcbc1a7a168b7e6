//! Deployment ledger
//!
//! JSON file keyed by package name that caches identifiers of objects
//! created by earlier invocations. Single-module publishes live under the
//! reserved `individual` key. Rewritten in full after every successful
//! action; there is no guard against concurrent writers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use super::{read_json, write_json};
use crate::domain::{find_by_type, CreatedObject, CreatedSet};
use crate::error::{KeepsakeError, Result};

/// Objects created by publishing one package (or one module)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(
        rename = "packageObjectId",
        default,
        deserialize_with = "id_or_false"
    )]
    pub package_object_id: Option<String>,
    #[serde(rename = "createdObjects", default)]
    pub created_objects: Vec<CreatedObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bag: Option<String>,
    /// Fields written by other tools, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Older ledgers store `false` when a publish produced no package.
fn id_or_false<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

impl ModuleRecord {
    pub fn from_created(created: CreatedSet) -> Self {
        Self {
            package_object_id: created.package_object_id,
            created_objects: created.objects,
            ..Self::default()
        }
    }

    pub fn package_id(&self) -> Result<&str> {
        self.package_object_id
            .as_deref()
            .ok_or_else(|| KeepsakeError::MissingLedgerEntry("packageObjectId".to_string()))
    }

    /// Id of the first created object whose type contains `type_name`.
    pub fn object_of_type(&self, type_name: &str) -> Result<&str> {
        find_by_type(&self.created_objects, type_name)
            .ok_or_else(|| KeepsakeError::MissingLedgerEntry(format!("created object {type_name}")))
    }

    pub fn market(&self) -> Result<&str> {
        self.market.as_deref().ok_or_else(|| {
            KeepsakeError::MissingLedgerEntry("market (run `keepsake create` first)".to_string())
        })
    }

    /// Listing bag: explicit `bag` field, else a created `Bag` object.
    pub fn bag(&self) -> Result<&str> {
        match self.bag.as_deref() {
            Some(bag) => Ok(bag),
            None => self.object_of_type("::bag::Bag"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentLedger {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub individual: BTreeMap<String, ModuleRecord>,
    #[serde(flatten)]
    pub modules: BTreeMap<String, ModuleRecord>,
}

impl DeploymentLedger {
    /// Read the ledger; a missing file is an empty ledger.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No ledger at {}, starting empty", path.display());
            return Ok(Self::default());
        }
        read_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_json(path, self)?;
        info!("Ledger written to {}", path.display());
        Ok(())
    }

    pub fn module(&self, name: &str) -> Result<&ModuleRecord> {
        self.modules
            .get(name)
            .ok_or_else(|| KeepsakeError::MissingLedgerEntry(format!("{name} (run `keepsake deploy` first)")))
    }

    pub fn module_mut(&mut self, name: &str) -> Result<&mut ModuleRecord> {
        self.modules
            .get_mut(name)
            .ok_or_else(|| KeepsakeError::MissingLedgerEntry(format!("{name} (run `keepsake deploy` first)")))
    }

    /// Replace the record for a package, dropping anything recorded before.
    pub fn record_package(&mut self, name: &str, record: ModuleRecord) {
        self.modules.insert(name.to_string(), record);
    }

    pub fn record_individual(&mut self, module: &str, record: ModuleRecord) {
        self.individual.insert(module.to_string(), record);
    }
}
