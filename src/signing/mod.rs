pub mod wallet;

pub use wallet::{derive_address, Wallet};
