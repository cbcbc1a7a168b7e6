//! `keepsake deploy` and `keepsake contract`: publish build output and record
//! what the publish created.

use tracing::{info, warn};

use super::ActionContext;
use crate::bytecode;
use crate::error::{KeepsakeError, Result};
use crate::persistence::ModuleRecord;

/// Publish every module of the configured package. Returns the package id.
pub async fn deploy(ctx: &ActionContext) -> Result<String> {
    let package = ctx.package_name()?.to_string();
    let modules = bytecode::load_package(&ctx.config.paths.build_dir, &package)?;
    info!("Deploying package {} ({} modules)", package, modules.len());

    let (record, digest) = publish(ctx, &modules).await?;
    let package_id = record.package_object_id.clone();

    let mut ledger = ctx.load_ledger()?;
    ledger.record_package(&package, record);
    ctx.save_ledger(&ledger)?;

    published(package_id, &digest)
}

/// Publish a single module of the configured package on its own.
pub async fn contract(ctx: &ActionContext, module: &str) -> Result<String> {
    let package = ctx.package_name()?.to_string();
    let compiled = bytecode::load_module(&ctx.config.paths.build_dir, &package, module)?;
    info!("Deploying module {} of {}", module, package);

    let (record, digest) = publish(ctx, &[compiled]).await?;
    let package_id = record.package_object_id.clone();

    let mut ledger = ctx.load_ledger()?;
    ledger.record_individual(module, record);
    ctx.save_ledger(&ledger)?;

    published(package_id, &digest)
}

/// The record is written even when the package object was not returned by
/// the node yet, so the other created objects are not lost.
async fn publish(ctx: &ActionContext, modules: &[String]) -> Result<(ModuleRecord, String)> {
    let effects = ctx.client.publish(modules, ctx.config.gas.publish).await?;
    let created = ctx
        .collect_created(&effects, ctx.config.waits.publish_ms)
        .await?;
    Ok((ModuleRecord::from_created(created), effects.digest))
}

fn published(package_id: Option<String>, digest: &str) -> Result<String> {
    match package_id {
        Some(id) => {
            println!("Successfully deployed at: {id}");
            Ok(id)
        }
        None => {
            warn!("Publish {} succeeded but its package object is not visible yet", digest);
            Err(KeepsakeError::MissingField(format!(
                "package object among objects created by {digest}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use crate::chain::MockChainClient;
    use crate::domain::ObjectInfo;
    use crate::persistence::DeploymentLedger;

    fn expect_publish(client: &mut MockChainClient, modules: usize) {
        client
            .expect_publish()
            .withf(move |m, budget| m.len() == modules && *budget == 10_000)
            .times(1)
            .returning(|_, _| Ok(effects("pub1", &["0xpkg", "0xcap"])));
        client.expect_objects().times(1).returning(|_| {
            Ok(vec![
                package_info("0xpkg"),
                ObjectInfo {
                    object_id: "0xcap".to_string(),
                    type_: "0xpkg::meta_nft::MetaNFTIssuerCap".to_string(),
                    owner: Some(ADDRESS.to_string()),
                    is_package: false,
                    fields: serde_json::Value::Null,
                },
            ])
        });
    }

    #[tokio::test]
    async fn deploy_records_package_and_objects() {
        let scratch = Scratch::new();
        scratch.write_module("meta_nft", &[1, 2, 3]);
        scratch.write_module("marketplace_nofee", &[4]);

        let mut client = MockChainClient::new();
        expect_publish(&mut client, 2);
        let ctx = scratch.context(client);

        let package_id = deploy(&ctx).await.unwrap();
        assert_eq!(package_id, "0xpkg");

        let ledger = DeploymentLedger::load(&ctx.config.paths.ledger).unwrap();
        let record = ledger.module(PACKAGE).unwrap();
        assert_eq!(record.package_id().unwrap(), "0xpkg");
        assert_eq!(record.object_of_type("MetaNFTIssuerCap").unwrap(), "0xcap");
        assert_eq!(record.created_objects[0].owner.as_deref(), Some(ADDRESS));
    }

    #[tokio::test]
    async fn contract_records_under_individual() {
        let scratch = Scratch::new();
        scratch.write_module("dev_utils", &[9]);

        let mut client = MockChainClient::new();
        expect_publish(&mut client, 1);
        let ctx = scratch.context(client);

        contract(&ctx, "dev_utils").await.unwrap();

        let ledger = DeploymentLedger::load(&ctx.config.paths.ledger).unwrap();
        assert!(ledger.modules.is_empty());
        assert_eq!(
            ledger.individual["dev_utils"].package_object_id.as_deref(),
            Some("0xpkg")
        );
    }

    #[tokio::test]
    async fn unindexed_package_still_records_created_objects() {
        let scratch = Scratch::new();
        scratch.write_module("meta_nft", &[1]);

        let mut client = MockChainClient::new();
        client
            .expect_publish()
            .returning(|_, _| Ok(effects("pub1", &["0xpkg", "0xcap"])));
        client.expect_objects().returning(|_| {
            Ok(vec![typed_info("0xcap", "0xpkg::meta_nft::MetaNFTIssuerCap")])
        });
        let ctx = scratch.context(client);

        let err = deploy(&ctx).await.unwrap_err();
        assert!(matches!(err, KeepsakeError::MissingField(_)));

        let ledger = DeploymentLedger::load(&ctx.config.paths.ledger).unwrap();
        let record = ledger.module(PACKAGE).unwrap();
        assert!(record.package_id().is_err());
        assert_eq!(record.object_of_type("MetaNFTIssuerCap").unwrap(), "0xcap");
    }

    #[tokio::test]
    async fn deploy_without_build_output_never_calls_node() {
        let scratch = Scratch::new();
        let mut client = MockChainClient::new();
        client.expect_publish().never();
        let ctx = scratch.context(client);

        let err = deploy(&ctx).await.unwrap_err();
        assert!(matches!(err, KeepsakeError::Build(_)));
        assert!(!ctx.config.paths.ledger.exists());
    }

    #[tokio::test]
    async fn failed_publish_leaves_ledger_untouched() {
        let scratch = Scratch::new();
        scratch.write_module("meta_nft", &[1]);
        scratch.seed_ledger();

        let mut client = MockChainClient::new();
        client.expect_publish().returning(|_, _| {
            Err(KeepsakeError::TransactionFailed {
                digest: "bad".to_string(),
                status: "failure".to_string(),
            })
        });
        let ctx = scratch.context(client);

        assert!(deploy(&ctx).await.is_err());
        let ledger = DeploymentLedger::load(&ctx.config.paths.ledger).unwrap();
        assert_eq!(ledger.module(PACKAGE).unwrap().package_id().unwrap(), "0xpkg");
    }
}
