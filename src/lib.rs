pub mod actions;
pub mod adapters;
pub mod bytecode;
pub mod chain;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod persistence;
pub mod signing;

pub use config::AppConfig;
pub use domain::{select_coin, select_coin_lenient, sort_ingredients, Coin, Ingredient};
pub use error::{KeepsakeError, Result};
pub use persistence::DeploymentLedger;
pub use signing::Wallet;
