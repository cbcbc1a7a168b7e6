mod traits;

pub use traits::{owned_coins, ChainClient, MoveCall};

#[cfg(test)]
pub use traits::MockChainClient;
