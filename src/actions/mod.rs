//! One module per command. Every action receives the same [`ActionContext`]
//! and runs its remote steps strictly in sequence.

pub mod account;
mod context;
pub mod craft;
pub mod deploy;
pub mod market;
pub mod transfer;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::ActionContext;

use crate::cli::NodeCommand;
use crate::error::Result;
use crate::output::OutputMode;

/// Dispatch a command that talks to the node.
pub async fn run(ctx: &ActionContext, command: &NodeCommand, mode: OutputMode) -> Result<()> {
    match command {
        NodeCommand::Deploy => {
            deploy::deploy(ctx).await?;
        }
        NodeCommand::Contract { module } => {
            deploy::contract(ctx, module).await?;
        }
        NodeCommand::Transfer { object_id, recipient } => {
            transfer::transfer(ctx, object_id, recipient.as_deref()).await?;
        }
        NodeCommand::Create { module } => {
            market::create(ctx, module.as_deref()).await?;
        }
        NodeCommand::Mint { recipient } => {
            market::mint(ctx, recipient).await?;
        }
        NodeCommand::List { price } => {
            market::list(ctx, *price).await?;
        }
        NodeCommand::Buy { listing } => {
            market::buy(ctx, listing).await?;
        }
        NodeCommand::Auction => {
            market::auction(ctx).await?;
        }
        NodeCommand::Craft => {
            let minted = craft::craft(ctx).await?;
            println!("Minted {minted} ingredient(s)");
        }
        NodeCommand::Coins => {
            account::coins(ctx, mode).await?;
        }
    }
    Ok(())
}
