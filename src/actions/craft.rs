//! `keepsake craft`: mint the ingredient tree, components before composites.
//!
//! The ingredient file is rewritten after every mint, so an interrupted run
//! picks up where it stopped.

use serde_json::{json, Value};
use tracing::info;

use super::ActionContext;
use crate::chain::MoveCall;
use crate::domain::{sort_ingredients, Ingredient};
use crate::error::{KeepsakeError, Result};
use crate::persistence::{load_ingredients, save_ingredients};

fn address_of<'a>(ingredients: &'a [Ingredient], name: &str) -> Result<&'a str> {
    ingredients
        .iter()
        .find(|i| i.name == name)
        .and_then(|i| i.address.as_deref())
        .ok_or_else(|| KeepsakeError::MissingField(format!("address of ingredient {name}")))
}

/// Mint every ingredient that has no address yet. Returns how many were minted.
pub async fn craft(ctx: &ActionContext) -> Result<usize> {
    let path = &ctx.config.paths.ingredients;
    let mut ingredients = sort_ingredients(load_ingredients(path)?)?;

    let pending = ingredients.iter().filter(|i| !i.is_minted()).count();
    if pending == 0 {
        println!("All {} ingredients already minted", ingredients.len());
        return Ok(0);
    }

    let ledger = ctx.load_ledger()?;
    let package_id = ledger.module(ctx.package_name()?)?.package_id()?.to_string();
    let craft = &ctx.config.craft;
    info!("Minting {} of {} ingredients", pending, ingredients.len());

    let mut minted = 0;
    for i in 0..ingredients.len() {
        if ingredients[i].is_minted() {
            continue;
        }

        let ingredient = &ingredients[i];
        let (function, args): (&str, Vec<Value>) = if ingredient.is_base() {
            (craft.base_function.as_str(), vec![json!(ingredient.name)])
        } else {
            (
                craft.combine_function.as_str(),
                vec![
                    json!(ingredient.name),
                    json!(address_of(&ingredients, &ingredient.mix[0])?),
                    json!(address_of(&ingredients, &ingredient.mix[1])?),
                ],
            )
        };

        if minted > 0 {
            ctx.settle(ctx.config.waits.consistency_ms).await;
        }
        let coin = ctx.coin_for(ctx.config.gas.craft).await?;
        let call = MoveCall::new(&package_id, &craft.module, function, ctx.config.gas.craft)
            .args(args)
            .gas(coin.object_id);
        let effects = ctx.client.move_call(&call).await?;
        let address = effects.first_created()?.to_string();

        println!("{} minted at {}", ingredients[i].name, address);
        ingredients[i].address = Some(address);
        save_ingredients(path, &ingredients)?;
        minted += 1;
    }

    Ok(minted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::*;
    use crate::chain::MockChainClient;

    fn write_recipe(scratch: &Scratch) {
        let mut fire = Ingredient::base("fire");
        fire.address = Some("0xfire".to_string());
        let recipe = vec![
            Ingredient::composite("steam", "water", "fire"),
            Ingredient::base("water"),
            fire,
        ];
        save_ingredients(&scratch.config().paths.ingredients, &recipe).unwrap();
    }

    #[tokio::test]
    async fn craft_mints_components_first_and_persists() {
        let scratch = Scratch::new();
        scratch.seed_ledger();
        write_recipe(&scratch);

        let mut client = MockChainClient::new();
        stub_objects(&mut client, &[("0xgas", 50_000)], vec![]);
        let calls = script_move_calls(
            &mut client,
            &[("mint_base", &["0xwater"]), ("combine", &["0xsteam"])],
        );
        let ctx = scratch.context(client);

        assert_eq!(craft(&ctx).await.unwrap(), 2);

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].target(), "0xpkg::elements::mint_base");
        assert_eq!(calls[0].arguments, vec![json!("water")]);
        assert_eq!(
            calls[1].arguments,
            vec![json!("steam"), json!("0xwater"), json!("0xfire")]
        );
        assert_eq!(calls[1].gas_payment.as_deref(), Some("0xgas"));

        let saved = load_ingredients(&ctx.config.paths.ingredients).unwrap();
        assert!(saved.iter().all(Ingredient::is_minted));
        assert_eq!(saved.last().unwrap().name, "steam");
    }

    #[tokio::test]
    async fn craft_with_everything_minted_calls_nothing() {
        let scratch = Scratch::new();
        let mut water = Ingredient::base("water");
        water.address = Some("0xw".to_string());
        save_ingredients(&scratch.config().paths.ingredients, &[water]).unwrap();

        let mut client = MockChainClient::new();
        client.expect_move_call().never();
        let ctx = scratch.context(client);

        assert_eq!(craft(&ctx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_combine_keeps_earlier_mints() {
        let scratch = Scratch::new();
        scratch.seed_ledger();
        write_recipe(&scratch);

        let mut client = MockChainClient::new();
        stub_objects(&mut client, &[("0xgas", 50_000)], vec![]);
        client.expect_move_call().returning(|call| {
            if call.function == "combine" {
                Err(KeepsakeError::TransactionFailed {
                    digest: "tx-c".to_string(),
                    status: "failure".to_string(),
                })
            } else {
                Ok(effects("tx-w", &["0xwater"]))
            }
        });
        let ctx = scratch.context(client);

        assert!(craft(&ctx).await.is_err());

        let saved = load_ingredients(&ctx.config.paths.ingredients).unwrap();
        let water = saved.iter().find(|i| i.name == "water").unwrap();
        let steam = saved.iter().find(|i| i.name == "steam").unwrap();
        assert_eq!(water.address.as_deref(), Some("0xwater"));
        assert!(!steam.is_minted());
    }

    #[tokio::test]
    async fn cyclic_recipe_is_rejected_before_minting() {
        let scratch = Scratch::new();
        save_ingredients(
            &scratch.config().paths.ingredients,
            &[
                Ingredient::composite("a", "b", "c"),
                Ingredient::composite("b", "a", "c"),
                Ingredient::base("c"),
            ],
        )
        .unwrap();

        let mut client = MockChainClient::new();
        client.expect_move_call().never();
        let ctx = scratch.context(client);

        assert!(matches!(
            craft(&ctx).await,
            Err(KeepsakeError::DependencyCycle(_))
        ));
    }
}
