//! JSON-RPC adapter for a Sui fullnode.
//!
//! Transactions are built by the node (`sui_moveCall`, `sui_publish`,
//! `sui_transferObject` return unsigned `txBytes`), signed locally with the
//! wallet, and submitted with `sui_executeTransaction`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::chain::{ChainClient, MoveCall};
use crate::domain::{ObjectInfo, ObjectRef, TransactionEffects};
use crate::error::{KeepsakeError, Result};
use crate::signing::Wallet;

const SIGNATURE_SCHEME: &str = "ED25519";
const REQUEST_TYPE: &str = "WaitForEffectsCert";

pub struct SuiRpcClient {
    http: Client,
    url: String,
    wallet: Wallet,
    next_id: AtomicU64,
}

impl SuiRpcClient {
    pub fn new(url: &str, wallet: Wallet, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent("keepsake/0.1")
            .timeout(timeout)
            .build()
            .map_err(KeepsakeError::Http)?;

        Ok(Self {
            http,
            url: url.trim_end_matches('/').to_string(),
            wallet,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn envelope(&self, method: &str, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        })
    }

    async fn post(&self, body: &Value) -> Result<Value> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(KeepsakeError::Rpc {
                code: i64::from(status.as_u16()),
                message: format!("HTTP {} from {}: {}", status, self.url, text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Issue a single JSON-RPC call and return its `result`.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        debug!("rpc {} {}", method, params);
        let body = self.envelope(method, params);
        let resp = self.post(&body).await?;
        unwrap_envelope(resp)
    }

    /// Issue several calls as one JSON-RPC batch. Results come back in call
    /// order regardless of how the node orders the response array.
    pub async fn batch(&self, method: &str, params: Vec<Value>) -> Result<Vec<Value>> {
        if params.is_empty() {
            return Ok(Vec::new());
        }

        let calls: Vec<Value> = params
            .into_iter()
            .map(|p| self.envelope(method, p))
            .collect();
        let ids: Vec<u64> = calls.iter().filter_map(|c| c["id"].as_u64()).collect();
        debug!("rpc batch {} x{}", method, calls.len());

        let resp = self.post(&Value::Array(calls)).await?;
        let items = match resp {
            Value::Array(items) => items,
            // Some nodes answer a batch with a single error object.
            other => {
                return Err(unwrap_envelope(other).err().unwrap_or_else(|| {
                    KeepsakeError::MissingField("batch response array".to_string())
                }))
            }
        };

        order_batch(&ids, items)?
            .into_iter()
            .map(unwrap_envelope)
            .collect()
    }

    async fn execute(&self, unsigned: Value) -> Result<TransactionEffects> {
        let tx_bytes_b64 = unsigned
            .get("txBytes")
            .and_then(Value::as_str)
            .ok_or_else(|| KeepsakeError::MissingField("txBytes".to_string()))?
            .to_string();
        let tx_bytes = BASE64_STANDARD.decode(&tx_bytes_b64)?;
        let (signature, public_key) = self.wallet.sign_base64(&tx_bytes);

        let resp = self
            .request(
                "sui_executeTransaction",
                json!([tx_bytes_b64, SIGNATURE_SCHEME, signature, public_key, REQUEST_TYPE]),
            )
            .await?;

        let effects = TransactionEffects::from_response(&resp)?.ensure_success()?;
        info!(
            "Transaction {} executed, {} object(s) created",
            effects.digest,
            effects.created.len()
        );
        Ok(effects)
    }
}

/// Match batch responses to the request ids, in request order. A request
/// without a response is an error.
pub(crate) fn order_batch(ids: &[u64], items: Vec<Value>) -> Result<Vec<Value>> {
    let mut by_id: HashMap<u64, Value> = items
        .into_iter()
        .filter_map(|item| item.get("id").and_then(Value::as_u64).map(|id| (id, item)))
        .collect();

    ids.iter()
        .map(|id| {
            by_id
                .remove(id)
                .ok_or_else(|| KeepsakeError::MissingField(format!("batch response for request {id}")))
        })
        .collect()
}

/// Extract `result` from a JSON-RPC response, mapping `error` objects.
pub fn unwrap_envelope(resp: Value) -> Result<Value> {
    if let Some(err) = resp.get("error").filter(|e| !e.is_null()) {
        return Err(KeepsakeError::Rpc {
            code: err.get("code").and_then(Value::as_i64).unwrap_or(-32000),
            message: err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    match resp {
        Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| KeepsakeError::MissingField("result".to_string())),
        _ => Err(KeepsakeError::MissingField("result".to_string())),
    }
}

#[async_trait]
impl ChainClient for SuiRpcClient {
    fn address(&self) -> String {
        self.wallet.address().to_string()
    }

    async fn owned_objects(&self, owner: &str) -> Result<Vec<ObjectRef>> {
        let result = self
            .request("sui_getObjectsOwnedByAddress", json!([owner]))
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn objects(&self, ids: &[String]) -> Result<Vec<ObjectInfo>> {
        let params = ids.iter().map(|id| json!([id])).collect();
        let results = self.batch("sui_getObject", params).await?;

        let mut infos = Vec::with_capacity(results.len());
        for (id, result) in ids.iter().zip(results.iter()) {
            match ObjectInfo::from_response(result)? {
                Some(info) => infos.push(info),
                None => warn!("Object {} not available: {}", id, result["status"]),
            }
        }
        Ok(infos)
    }

    async fn move_call(&self, call: &MoveCall) -> Result<TransactionEffects> {
        info!("Calling {}", call.target());
        let unsigned = self
            .request(
                "sui_moveCall",
                json!([
                    self.wallet.address(),
                    call.package_object_id,
                    call.module,
                    call.function,
                    call.type_arguments,
                    call.arguments,
                    call.gas_payment,
                    call.gas_budget,
                ]),
            )
            .await?;
        self.execute(unsigned).await
    }

    async fn publish(
        &self,
        compiled_modules: &[String],
        gas_budget: u64,
    ) -> Result<TransactionEffects> {
        info!("Publishing {} module(s)", compiled_modules.len());
        let unsigned = self
            .request(
                "sui_publish",
                json!([self.wallet.address(), compiled_modules, Value::Null, gas_budget]),
            )
            .await?;
        self.execute(unsigned).await
    }

    async fn transfer_object(
        &self,
        object_id: &str,
        recipient: &str,
        gas_budget: u64,
    ) -> Result<TransactionEffects> {
        info!("Transferring {} to {}", object_id, recipient);
        let unsigned = self
            .request(
                "sui_transferObject",
                json!([
                    self.wallet.address(),
                    object_id,
                    Value::Null,
                    gas_budget,
                    recipient
                ]),
            )
            .await?;
        self.execute(unsigned).await
    }
}
