//! Fixtures shared by the action tests.

use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::ActionContext;
use crate::chain::{MockChainClient, MoveCall};
use crate::config::AppConfig;
use crate::domain::{CreatedObject, ObjectInfo, ObjectRef, TransactionEffects, SUI_COIN_TYPE};
use crate::persistence::{DeploymentLedger, ModuleRecord};

pub const PACKAGE: &str = "nft";
pub const ADDRESS: &str = "0x00000000000000000000000000000000000000aa";

/// Temporary directory holding the ledger, ingredients and build output.
pub struct Scratch {
    pub root: PathBuf,
}

impl Scratch {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("keepsake-action-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.ledger = self.root.join("deployed_modules").join("output.json");
        config.paths.ingredients = self.root.join("deployed_modules").join("ingredients.json");
        config.paths.build_dir = self.root.join("build");
        config.package.name = Some(PACKAGE.to_string());
        config.waits.consistency_ms = 0;
        config.waits.publish_ms = 0;
        config
    }

    pub fn context(&self, mut client: MockChainClient) -> ActionContext {
        client.expect_address().return_const(ADDRESS.to_string());
        ActionContext::new(self.config(), Arc::new(client))
    }

    pub fn write_module(&self, name: &str, bytes: &[u8]) {
        let dir = self.root.join("build").join(PACKAGE).join("bytecode_modules");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{name}.mv")), bytes).unwrap();
    }

    /// Ledger as left behind by `deploy` followed by `create`.
    pub fn seed_ledger(&self) {
        let mut ledger = DeploymentLedger::default();
        ledger.record_package(
            PACKAGE,
            ModuleRecord {
                package_object_id: Some("0xpkg".to_string()),
                created_objects: vec![CreatedObject {
                    type_: "0xpkg::meta_nft::MetaNFTIssuerCap".to_string(),
                    object_id: "0xcap".to_string(),
                    owner: Some(ADDRESS.to_string()),
                }],
                market: Some("0xmarket".to_string()),
                bag: Some("0xbag".to_string()),
                ..ModuleRecord::default()
            },
        );
        ledger.save(&self.config().paths.ledger).unwrap();
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn effects(digest: &str, created: &[&str]) -> TransactionEffects {
    TransactionEffects {
        digest: digest.to_string(),
        status: "success".to_string(),
        error: None,
        created: created.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn package_info(id: &str) -> ObjectInfo {
    ObjectInfo {
        object_id: id.to_string(),
        type_: String::new(),
        owner: None,
        is_package: true,
        fields: Value::Null,
    }
}

pub fn typed_info(id: &str, type_: &str) -> ObjectInfo {
    ObjectInfo {
        object_id: id.to_string(),
        type_: type_.to_string(),
        owner: Some(ADDRESS.to_string()),
        is_package: false,
        fields: Value::Null,
    }
}

pub fn coin_info(id: &str, balance: u64) -> ObjectInfo {
    ObjectInfo {
        object_id: id.to_string(),
        type_: SUI_COIN_TYPE.to_string(),
        owner: Some(ADDRESS.to_string()),
        is_package: false,
        fields: json!({ "balance": balance.to_string(), "id": { "id": id } }),
    }
}

/// Serve `owned_objects` with the given coins and `objects` from a catalog
/// made of those coins plus `extra`.
pub fn stub_objects(client: &mut MockChainClient, coins: &[(&str, u64)], extra: Vec<ObjectInfo>) {
    let refs: Vec<ObjectRef> = coins
        .iter()
        .map(|(id, _)| ObjectRef {
            object_id: id.to_string(),
            type_: SUI_COIN_TYPE.to_string(),
        })
        .collect();
    let mut catalog: HashMap<String, ObjectInfo> = coins
        .iter()
        .map(|(id, balance)| (id.to_string(), coin_info(id, *balance)))
        .collect();
    for info in extra {
        catalog.insert(info.object_id.clone(), info);
    }

    client
        .expect_owned_objects()
        .returning(move |_| Ok(refs.clone()));
    client.expect_objects().returning(move |ids| {
        Ok(ids.iter().filter_map(|id| catalog.get(id).cloned()).collect())
    });
}

/// Answer move calls by function name, in order, and record every call.
pub fn script_move_calls(
    client: &mut MockChainClient,
    script: &[(&str, &[&str])],
) -> Arc<Mutex<Vec<MoveCall>>> {
    let mut queues: HashMap<String, VecDeque<Vec<String>>> = HashMap::new();
    for (function, created) in script {
        queues
            .entry(function.to_string())
            .or_default()
            .push_back(created.iter().map(|s| s.to_string()).collect());
    }
    let queues = Mutex::new(queues);
    let calls = Arc::new(Mutex::new(Vec::new()));
    let recorded = calls.clone();

    client.expect_move_call().returning(move |call| {
        recorded.lock().unwrap().push(call.clone());
        let created = queues
            .lock()
            .unwrap()
            .get_mut(&call.function)
            .and_then(VecDeque::pop_front)
            .unwrap_or_default();
        let digest = format!("tx-{}", call.function);
        Ok(TransactionEffects {
            digest,
            status: "success".to_string(),
            error: None,
            created,
        })
    });
    calls
}
