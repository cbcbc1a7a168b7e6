//! Marketplace actions: create a market, mint, list, buy and run an auction.
//!
//! Every action reads the package record written by `deploy`; listing and
//! auctions also need the market recorded by `create`.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use super::ActionContext;
use crate::chain::MoveCall;
use crate::domain::find_by_type;
use crate::error::{KeepsakeError, Result};
use crate::persistence::ModuleRecord;

/// Currency type argument of every marketplace call
const SUI: &str = "0x2::sui::SUI";

fn deployed(ctx: &ActionContext) -> Result<ModuleRecord> {
    let ledger = ctx.load_ledger()?;
    Ok(ledger.module(ctx.package_name()?)?.clone())
}

fn nft_type(ctx: &ActionContext, package_id: &str) -> String {
    format!("{}::{}::MetaNFT", package_id, ctx.config.package.nft_module)
}

fn market_call(ctx: &ActionContext, package_id: &str, function: &str, gas_budget: u64) -> MoveCall {
    MoveCall::new(
        package_id,
        &ctx.config.package.marketplace_module,
        function,
        gas_budget,
    )
    .type_args([nft_type(ctx, package_id), SUI.to_string()])
}

/// Mint one NFT with the issuer cap created at publish time.
async fn mint_nft(ctx: &ActionContext, record: &ModuleRecord) -> Result<String> {
    let package_id = record.package_id()?;
    let cap = record.object_of_type(&ctx.config.package.issuer_cap_type)?;
    let coin = ctx.coin_for(ctx.config.gas.mint).await?;
    let nft = &ctx.config.nft;

    let call = MoveCall::new(package_id, &ctx.config.package.nft_module, "mint", ctx.config.gas.mint)
        .args(vec![
            json!(cap),
            json!(nft.name),
            json!(nft.description),
            json!(nft.url),
        ])
        .gas(coin.object_id);
    let effects = ctx.client.move_call(&call).await?;
    let id = effects.first_created()?.to_string();
    info!("Minted NFT {} in {}", id, effects.digest);
    Ok(id)
}

/// Create a market owned by the signer and record it in the ledger.
pub async fn create(ctx: &ActionContext, module: Option<&str>) -> Result<String> {
    let package = ctx.package_name()?.to_string();
    let mut ledger = ctx.load_ledger()?;
    let package_id = ledger.module(&package)?.package_id()?.to_string();
    let module = module.unwrap_or(&ctx.config.package.marketplace_module);

    let call = MoveCall::new(&package_id, module, "create", ctx.config.gas.create_market)
        .args(vec![json!(ctx.address()), json!(ctx.config.market.fee_bps)]);
    let effects = ctx.client.move_call(&call).await?;
    let market = effects.first_created()?.to_string();

    ledger.module_mut(&package)?.market = Some(market.clone());
    ctx.save_ledger(&ledger)?;
    println!("Market created: {market}");

    // The bag is optional; the market is already recorded.
    match ctx
        .collect_created(&effects, ctx.config.waits.consistency_ms)
        .await
    {
        Ok(created) => {
            if let Some(bag) = find_by_type(&created.objects, "::bag::Bag") {
                ledger.module_mut(&package)?.bag = Some(bag.to_string());
                ctx.save_ledger(&ledger)?;
            }
        }
        Err(e) => warn!("Could not look up objects created with market {}: {}", market, e),
    }

    Ok(market)
}

/// Mint an NFT and hand it to `recipient`.
pub async fn mint(ctx: &ActionContext, recipient: &str) -> Result<String> {
    let record = deployed(ctx)?;
    let package_id = record.package_id()?;
    let nft = mint_nft(ctx, &record).await?;
    println!("new nft {nft}");

    ctx.settle(ctx.config.waits.consistency_ms).await;
    let coin = ctx.coin_for(ctx.config.gas.mint).await?;
    let call = MoveCall::new(
        package_id,
        &ctx.config.package.utils_module,
        "transfer",
        ctx.config.gas.transfer,
    )
    .type_args([nft_type(ctx, package_id)])
    .args(vec![json!(nft), json!(recipient)])
    .gas(coin.object_id);
    ctx.client.move_call(&call).await?;

    println!("Transferred {nft} to {recipient}");
    Ok(nft)
}

/// Mint an NFT and list it. Returns the listing id.
pub async fn list(ctx: &ActionContext, price: Option<u64>) -> Result<String> {
    let record = deployed(ctx)?;
    let package_id = record.package_id()?;
    let market = record.market()?;
    let bag = record.bag()?;
    let price = price.unwrap_or(ctx.config.market.list_price);

    let nft = mint_nft(ctx, &record).await?;
    ctx.settle(ctx.config.waits.consistency_ms).await;

    let call = market_call(ctx, package_id, "list", ctx.config.gas.list).args(vec![
        json!(market),
        json!(bag),
        json!(nft),
        json!(price),
    ]);
    let effects = ctx.client.move_call(&call).await?;
    let created = ctx
        .collect_created(&effects, ctx.config.waits.consistency_ms)
        .await?;
    let listing = find_by_type(&created.objects, "Listing")
        .ok_or_else(|| KeepsakeError::MissingField(format!("Listing created by {}", effects.digest)))?
        .to_string();

    println!("Listing ID: {listing}");
    Ok(listing)
}

/// Buy `listing`, paying with the coin that best covers the configured amount.
pub async fn buy(ctx: &ActionContext, listing: &str) -> Result<String> {
    let record = deployed(ctx)?;
    let package_id = record.package_id()?;
    let market = record.market()?;

    let coin = ctx.coin_for(ctx.config.market.buy_coin_amount).await?;
    let call = market_call(ctx, package_id, "buy_and_take", ctx.config.gas.buy).args(vec![
        json!(market),
        json!(listing),
        json!(coin.object_id),
    ]);
    let effects = ctx.client.move_call(&call).await?;

    println!("Bought {listing} in {}", effects.digest);
    Ok(effects.digest)
}

/// Mint, auction the NFT, place two rising bids and settle the auction.
pub async fn auction(ctx: &ActionContext) -> Result<String> {
    let record = deployed(ctx)?;
    let package_id = record.package_id()?;
    let market = record.market()?;
    let cfg = &ctx.config.market;
    let budget = ctx.config.gas.auction;

    let nft = mint_nft(ctx, &record).await?;
    ctx.settle(ctx.config.waits.consistency_ms).await;

    let now = Utc::now().timestamp_millis();
    let call = market_call(ctx, package_id, "auction", budget).args(vec![
        json!(market),
        json!(nft),
        json!(cfg.opening_bid),
        json!(now - cfg.auction_window_ms),
        json!(now + cfg.auction_window_ms),
    ]);
    let effects = ctx.client.move_call(&call).await?;
    let auction = effects.first_created()?.to_string();
    info!("Auction {} opened for {}", auction, nft);

    for bid in [cfg.opening_bid, cfg.opening_bid + cfg.bid_increment] {
        ctx.settle(ctx.config.waits.consistency_ms).await;
        let coin = ctx.coin_for(bid).await?;
        let call = market_call(ctx, package_id, "bid", budget).args(vec![
            json!(market),
            json!(auction),
            json!(coin.object_id),
            json!(bid),
        ]);
        ctx.client.move_call(&call).await?;
        info!("Bid {} on auction {}", bid, auction);
    }

    let call = market_call(ctx, package_id, "complete_auction_and_take", budget)
        .args(vec![json!(market), json!(auction)]);
    let effects = ctx.client.move_call(&call).await?;

    println!("Auction {auction} completed in {}", effects.digest);
    Ok(auction)
}
