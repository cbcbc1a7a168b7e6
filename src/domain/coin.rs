use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::warn;

use super::ObjectInfo;
use crate::error::{KeepsakeError, Result};

/// Fully qualified type of the native gas coin
pub const SUI_COIN_TYPE: &str = "0x2::coin::Coin<0x2::sui::SUI>";

/// A fungible balance usable to pay fees or bids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
pub struct Coin {
    #[serde(rename = "objectId")]
    #[tabled(rename = "object id")]
    pub object_id: String,
    pub balance: u64,
}

impl Coin {
    pub fn new(object_id: impl Into<String>, balance: u64) -> Self {
        Self {
            object_id: object_id.into(),
            balance,
        }
    }

    /// Read a coin out of a fetched object. The node reports balances as
    /// strings or numbers depending on version.
    pub fn from_object(info: &ObjectInfo) -> Result<Self> {
        let balance = match info.fields.get("balance") {
            Some(serde_json::Value::String(s)) => s.parse::<u64>().map_err(|_| {
                KeepsakeError::MissingField(format!("{}: balance {s:?}", info.object_id))
            })?,
            Some(serde_json::Value::Number(n)) => n.as_u64().ok_or_else(|| {
                KeepsakeError::MissingField(format!("{}: balance {n}", info.object_id))
            })?,
            _ => {
                return Err(KeepsakeError::MissingField(format!(
                    "{}: balance",
                    info.object_id
                )))
            }
        };

        Ok(Self::new(info.object_id.clone(), balance))
    }

    pub fn covers(&self, price: u64) -> bool {
        self.balance >= price
    }
}

/// Pick the coin whose balance exceeds `price` by the least.
///
/// Ties keep the earliest coin. Fails with `NoCoins` on an empty slice and
/// `InsufficientBalance` when nothing covers the price.
pub fn select_coin(coins: &[Coin], price: u64) -> Result<&Coin> {
    if coins.is_empty() {
        return Err(KeepsakeError::NoCoins(price));
    }

    let mut best_diff = u64::MAX;
    let mut best: Option<&Coin> = None;
    for coin in coins {
        if let Some(diff) = coin.balance.checked_sub(price) {
            if best.is_none() || diff < best_diff {
                best_diff = diff;
                best = Some(coin);
            }
        }
    }

    best.ok_or_else(|| KeepsakeError::InsufficientBalance {
        required: price,
        largest: coins.iter().map(|c| c.balance).max().unwrap_or(0),
    })
}

/// Like [`select_coin`], but falls back to the first coin when nothing covers
/// the price. The node will reject the transaction if the coin is too small.
pub fn select_coin_lenient(coins: &[Coin], price: u64) -> Result<&Coin> {
    match select_coin(coins, price) {
        Err(KeepsakeError::InsufficientBalance { required, largest }) => {
            warn!(
                "No coin covers {} (largest {}), falling back to {}",
                required, largest, coins[0].object_id
            );
            Ok(&coins[0])
        }
        other => other,
    }
}
