use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub package: PackageConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub waits: WaitConfig,
    #[serde(default)]
    pub fees: FeeConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub nft: NftConfig,
    #[serde(default)]
    pub craft: CraftConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Fullnode JSON-RPC endpoint
    pub url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://fullnode.devnet.sui.io:443".to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Deployment ledger written after every successful action
    pub ledger: PathBuf,
    /// Ingredient list consumed by `craft`
    pub ingredients: PathBuf,
    /// Root of the Move build output (`<build>/<package>/bytecode_modules`)
    pub build_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ledger: PathBuf::from("./deployed_modules/output.json"),
            ingredients: PathBuf::from("./deployed_modules/ingredients.json"),
            build_dir: PathBuf::from("./build"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Package name; also the ledger key. Falls back to `MODULE_NAME`.
    pub name: Option<String>,
    pub marketplace_module: String,
    pub nft_module: String,
    pub utils_module: String,
    /// Type name suffix of the NFT issuer capability created at publish time
    pub issuer_cap_type: String,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            name: None,
            marketplace_module: "marketplace_nofee".to_string(),
            nft_module: "meta_nft".to_string(),
            utils_module: "dev_utils".to_string(),
            issuer_cap_type: "MetaNFTIssuerCap".to_string(),
        }
    }
}

impl PackageConfig {
    /// Resolve the package name from config or the `MODULE_NAME` variable.
    pub fn resolve_name(&self) -> Option<String> {
        self.name
            .clone()
            .or_else(|| std::env::var("MODULE_NAME").ok())
            .or_else(|| std::env::var("module_name").ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Gas budgets per action
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub publish: u64,
    pub create_market: u64,
    pub mint: u64,
    pub transfer: u64,
    pub list: u64,
    pub buy: u64,
    pub auction: u64,
    pub craft: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            publish: 10_000,
            create_market: 10_000,
            mint: 10_000,
            transfer: 5_000,
            list: 10_000,
            buy: 2_000,
            auction: 1_000,
            craft: 10_000,
        }
    }
}

/// Pauses that let the node index freshly created objects
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub consistency_ms: u64,
    pub publish_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            consistency_ms: 2_000,
            publish_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeeConfig {
    /// Pay with the first coin when none covers the amount
    #[serde(default)]
    pub allow_insufficient_fallback: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Marketplace fee in basis points passed to `create`
    pub fee_bps: u64,
    /// Default listing price
    pub list_price: u64,
    /// Minimum balance of the coin handed to `buy_and_take`
    pub buy_coin_amount: u64,
    /// Auction opens this many milliseconds before now and closes as many after
    pub auction_window_ms: i64,
    pub opening_bid: u64,
    pub bid_increment: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            fee_bps: 250,
            list_price: 1_200,
            buy_coin_amount: 10_000_000,
            auction_window_ms: 6_000,
            opening_bid: 1,
            bid_increment: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NftConfig {
    pub name: String,
    pub description: String,
    pub url: String,
}

impl Default for NftConfig {
    fn default() -> Self {
        Self {
            name: "Keepsake NFT".to_string(),
            description: "An Example Keepsake NFT".to_string(),
            url: "https://ipfs.io/ipfs/QmZPWWy5Si54R3d26toaqRiqvCH7HkGdXkxwUgCm2oKKM2?filename=img-sq-01.png"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub module: String,
    pub base_function: String,
    pub combine_function: String,
}

impl Default for CraftConfig {
    fn default() -> Self {
        Self {
            module: "elements".to_string(),
            base_function: "mint_base".to_string(),
            combine_function: "combine".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub default_recipient: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            default_recipient: "0xb758af2061e7c0e55df23de52c51968f6efbc959".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/testnet.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("KEEPSAKE_ENV").unwrap_or_else(|_| "devnet".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (KEEPSAKE_RPC__URL, etc.)
            .add_source(
                Environment::with_prefix("KEEPSAKE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.rpc.url.starts_with("http://") && !self.rpc.url.starts_with("https://") {
            errors.push(format!("rpc.url must be an http(s) URL, got {}", self.rpc.url));
        }

        let budgets = [
            ("publish", self.gas.publish),
            ("create_market", self.gas.create_market),
            ("mint", self.gas.mint),
            ("transfer", self.gas.transfer),
            ("list", self.gas.list),
            ("buy", self.gas.buy),
            ("auction", self.gas.auction),
            ("craft", self.gas.craft),
        ];
        for (name, budget) in budgets {
            if budget == 0 {
                errors.push(format!("gas.{name} must be positive"));
            }
        }

        if self.market.fee_bps > 10_000 {
            errors.push("market.fee_bps must not exceed 10000".to_string());
        }

        if self.market.auction_window_ms <= 0 {
            errors.push("market.auction_window_ms must be positive".to_string());
        }

        if self.market.bid_increment == 0 {
            errors.push("market.bid_increment must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
