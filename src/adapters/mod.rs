pub mod sui_rpc;

pub use sui_rpc::{unwrap_envelope, SuiRpcClient};
