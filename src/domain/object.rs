use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KeepsakeError, Result};

/// Summary entry returned when listing the objects an address owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(rename = "type", default)]
    pub type_: String,
}

/// Details of a single fetched object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub object_id: String,
    pub type_: String,
    /// Owning address, or owning object for wrapped children
    pub owner: Option<String>,
    pub is_package: bool,
    /// Move struct fields (`Null` for packages)
    pub fields: Value,
}

impl ObjectInfo {
    /// Parse a `sui_getObject` result. Returns `None` for deleted or missing
    /// objects.
    pub fn from_response(value: &Value) -> Result<Option<Self>> {
        if value.get("status").and_then(Value::as_str) != Some("Exists") {
            return Ok(None);
        }

        let details = value
            .get("details")
            .ok_or_else(|| KeepsakeError::MissingField("details".to_string()))?;

        let object_id = details
            .pointer("/reference/objectId")
            .and_then(Value::as_str)
            .ok_or_else(|| KeepsakeError::MissingField("details.reference.objectId".to_string()))?
            .to_string();

        let data = details.get("data").unwrap_or(&Value::Null);
        let is_package = data.get("dataType").and_then(Value::as_str) == Some("package");
        let type_ = data
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Some(Self {
            object_id,
            type_,
            owner: owner_of(details.get("owner")),
            is_package,
            fields: data.get("fields").cloned().unwrap_or(Value::Null),
        }))
    }
}

fn owner_of(owner: Option<&Value>) -> Option<String> {
    let owner = owner?;
    ["AddressOwner", "ObjectOwner"]
        .iter()
        .find_map(|key| owner.get(*key).and_then(Value::as_str))
        .map(ToString::to_string)
}

/// Object recorded in the deployment ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(rename = "objectId")]
    pub object_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl From<&ObjectInfo> for CreatedObject {
    fn from(info: &ObjectInfo) -> Self {
        Self {
            type_: info.type_.clone(),
            object_id: info.object_id.clone(),
            owner: info.owner.clone(),
        }
    }
}

/// Objects produced by one transaction, split the way the ledger stores them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedSet {
    pub package_object_id: Option<String>,
    pub objects: Vec<CreatedObject>,
}

impl CreatedSet {
    pub fn from_infos(infos: &[ObjectInfo]) -> Self {
        let mut set = Self::default();
        for info in infos {
            if info.is_package {
                set.package_object_id = Some(info.object_id.clone());
            } else {
                set.objects.push(CreatedObject::from(info));
            }
        }
        set
    }
}

/// First object whose type contains `needle`.
pub fn find_by_type<'a>(objects: &'a [CreatedObject], needle: &str) -> Option<&'a str> {
    objects
        .iter()
        .find(|o| o.type_.contains(needle))
        .map(|o| o.object_id.as_str())
}
