use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{Coin, ObjectInfo, ObjectRef, TransactionEffects, SUI_COIN_TYPE};
use crate::error::Result;

/// A call to a function of a published Move module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveCall {
    pub package_object_id: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Value>,
    /// Coin that pays for gas; the node picks one when absent
    pub gas_payment: Option<String>,
    pub gas_budget: u64,
}

impl MoveCall {
    pub fn new(
        package_object_id: impl Into<String>,
        module: impl Into<String>,
        function: impl Into<String>,
        gas_budget: u64,
    ) -> Self {
        Self {
            package_object_id: package_object_id.into(),
            module: module.into(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            gas_payment: None,
            gas_budget,
        }
    }

    pub fn type_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_arguments = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn args(mut self, args: Vec<Value>) -> Self {
        self.arguments = args;
        self
    }

    pub fn gas(mut self, coin: impl Into<String>) -> Self {
        self.gas_payment = Some(coin.into());
        self
    }

    /// `package::module::function` for logs
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package_object_id, self.module, self.function)
    }
}

/// Signed access to the remote node. Every transaction method waits for
/// effects and fails on a non-success status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address that signs and pays for transactions
    fn address(&self) -> String;

    async fn owned_objects(&self, owner: &str) -> Result<Vec<ObjectRef>>;

    /// Fetch object details in the requested order, skipping missing ones.
    async fn objects(&self, ids: &[String]) -> Result<Vec<ObjectInfo>>;

    async fn move_call(&self, call: &MoveCall) -> Result<TransactionEffects>;

    async fn publish(&self, compiled_modules: &[String], gas_budget: u64)
        -> Result<TransactionEffects>;

    async fn transfer_object(
        &self,
        object_id: &str,
        recipient: &str,
        gas_budget: u64,
    ) -> Result<TransactionEffects>;
}

/// Gas coins currently owned by `owner`, in the order the node lists them.
pub async fn owned_coins(client: &dyn ChainClient, owner: &str) -> Result<Vec<Coin>> {
    let ids: Vec<String> = client
        .owned_objects(owner)
        .await?
        .into_iter()
        .filter(|o| o.type_ == SUI_COIN_TYPE)
        .map(|o| o.object_id)
        .collect();

    if ids.is_empty() {
        return Ok(Vec::new());
    }

    client
        .objects(&ids)
        .await?
        .iter()
        .map(Coin::from_object)
        .collect()
}
