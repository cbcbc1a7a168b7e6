use tracing::info;

use super::ActionContext;
use crate::error::Result;

/// Transfer an owned object. Without a recipient the configured default is used.
pub async fn transfer(ctx: &ActionContext, object_id: &str, recipient: Option<&str>) -> Result<String> {
    let recipient = recipient.unwrap_or(&ctx.config.transfer.default_recipient);
    info!("Transferring {} to {}", object_id, recipient);

    let effects = ctx
        .client
        .transfer_object(object_id, recipient, ctx.config.gas.transfer)
        .await?;

    println!("Transferred {object_id} to {recipient} in {}", effects.digest);
    Ok(effects.digest)
}
