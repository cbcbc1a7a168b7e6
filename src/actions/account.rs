use tracing::info;

use super::ActionContext;
use crate::chain::owned_coins;
use crate::domain::Coin;
use crate::error::Result;
use crate::output::{print_items, print_kv, OutputMode};
use crate::signing::Wallet;

/// List the gas coins owned by the signer.
pub async fn coins(ctx: &ActionContext, mode: OutputMode) -> Result<Vec<Coin>> {
    let address = ctx.address();
    let coins = owned_coins(ctx.client.as_ref(), &address).await?;
    let total: u64 = coins.iter().map(|c| c.balance).sum();
    info!("{} owns {} coin(s), {} in total", address, coins.len(), total);

    print_items(&coins, mode)?;
    if mode == OutputMode::Table {
        print_kv("total", &total.to_string());
    }
    Ok(coins)
}

/// Generate a fresh key. Nothing is sent to the node.
pub fn keygen() -> Wallet {
    let wallet = Wallet::generate();
    println!("No key is stored by keepsake. Put this one in KEEPSAKE_PRIVATE_KEY:");
    print_kv("New key", &wallet.secret_hex());
    print_kv("address", wallet.address());
    wallet
}
