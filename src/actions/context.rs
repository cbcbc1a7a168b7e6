use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::chain::{owned_coins, ChainClient};
use crate::config::AppConfig;
use crate::domain::{select_coin, select_coin_lenient, Coin, CreatedSet, TransactionEffects};
use crate::error::{KeepsakeError, Result};
use crate::persistence::DeploymentLedger;

/// Everything an action needs, built once per invocation.
#[derive(Clone)]
pub struct ActionContext {
    pub config: AppConfig,
    pub client: Arc<dyn ChainClient>,
    package: Option<String>,
}

impl ActionContext {
    pub fn new(config: AppConfig, client: Arc<dyn ChainClient>) -> Self {
        let package = config.package.resolve_name();
        Self {
            config,
            client,
            package,
        }
    }

    /// Address signing every transaction of this invocation
    pub fn address(&self) -> String {
        self.client.address()
    }

    /// Package the action works on; also its ledger key.
    pub fn package_name(&self) -> Result<&str> {
        self.package.as_deref().ok_or_else(|| {
            KeepsakeError::InvalidConfig(
                "package name not set (package.name, KEEPSAKE_PACKAGE__NAME or MODULE_NAME)"
                    .to_string(),
            )
        })
    }

    pub fn load_ledger(&self) -> Result<DeploymentLedger> {
        DeploymentLedger::load(&self.config.paths.ledger)
    }

    pub fn save_ledger(&self, ledger: &DeploymentLedger) -> Result<()> {
        ledger.save(&self.config.paths.ledger)
    }

    /// Give the node time to index objects created by the last transaction.
    pub async fn settle(&self, wait_ms: u64) {
        if wait_ms > 0 {
            debug!("Waiting {}ms for the node to catch up", wait_ms);
            tokio::time::sleep(Duration::from_millis(wait_ms)).await;
        }
    }

    /// Coin that best covers `amount`, queried fresh from the node.
    pub async fn coin_for(&self, amount: u64) -> Result<Coin> {
        let coins = owned_coins(self.client.as_ref(), &self.address()).await?;
        let coin = if self.config.fees.allow_insufficient_fallback {
            select_coin_lenient(&coins, amount)?
        } else {
            select_coin(&coins, amount)?
        };
        debug!("Paying {} with coin {} ({})", amount, coin.object_id, coin.balance);
        Ok(coin.clone())
    }

    /// Fetch what a transaction created and split the package from the rest.
    pub async fn collect_created(
        &self,
        effects: &TransactionEffects,
        wait_ms: u64,
    ) -> Result<CreatedSet> {
        if effects.created.is_empty() {
            return Ok(CreatedSet::default());
        }
        self.settle(wait_ms).await;
        let infos = self.client.objects(&effects.created).await?;
        let created = CreatedSet::from_infos(&infos);
        info!(
            "Transaction {} created {} object(s){}",
            effects.digest,
            created.objects.len(),
            if created.package_object_id.is_some() { " and a package" } else { "" }
        );
        Ok(created)
    }
}
