use serde_json::Value;

use crate::error::{KeepsakeError, Result};

/// Outcome of an executed transaction as reported by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEffects {
    pub digest: String,
    pub status: String,
    pub error: Option<String>,
    /// Ids of objects created by the transaction, in reported order
    pub created: Vec<String>,
}

impl TransactionEffects {
    /// Parse an `sui_executeTransaction` result. Effects may sit under
    /// `EffectsCert.effects.effects` or at the top level.
    pub fn from_response(value: &Value) -> Result<Self> {
        let effects = [
            "/EffectsCert/effects/effects",
            "/effects/effects",
            "/effects",
        ]
        .iter()
        .find_map(|path| value.pointer(path).filter(|v| v.get("status").is_some()))
        .ok_or_else(|| KeepsakeError::MissingField("effects".to_string()))?;

        let status = effects
            .pointer("/status/status")
            .and_then(Value::as_str)
            .ok_or_else(|| KeepsakeError::MissingField("effects.status".to_string()))?
            .to_string();

        let error = effects
            .pointer("/status/error")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        let digest = effects
            .get("transactionDigest")
            .and_then(Value::as_str)
            .or_else(|| {
                value
                    .pointer("/EffectsCert/certificate/transactionDigest")
                    .and_then(Value::as_str)
            })
            .unwrap_or_default()
            .to_string();

        let created = effects
            .get("created")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.pointer("/reference/objectId").and_then(Value::as_str))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            digest,
            status,
            error,
            created,
        })
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Turn a non-success status into an error.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let status = match &self.error {
            Some(err) => format!("{}: {}", self.status, err),
            None => self.status.clone(),
        };
        Err(KeepsakeError::TransactionFailed {
            digest: self.digest,
            status,
        })
    }

    /// First created object id.
    pub fn first_created(&self) -> Result<&str> {
        self.created
            .first()
            .map(String::as_str)
            .ok_or_else(|| KeepsakeError::MissingField(format!("created objects of {}", self.digest)))
    }
}
