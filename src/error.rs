use thiserror::Error;

/// Main error type for keepsake actions
#[derive(Error, Debug)]
pub enum KeepsakeError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("No ledger entry for {0}")]
    MissingLedgerEntry(String),

    #[error("Build output error: {0}")]
    Build(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction {digest} failed: {status}")]
    TransactionFailed { digest: String, status: String },

    #[error("Missing field in node response: {0}")]
    MissingField(String),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    // Fee payment errors
    #[error("No coins available to pay {0}")]
    NoCoins(u64),

    #[error("Insufficient balance: need {required}, largest coin holds {largest}")]
    InsufficientBalance { required: u64, largest: u64 },

    // Ingredient ordering errors
    #[error("Ingredient {ingredient} mixes unknown ingredient {missing}")]
    UnknownIngredient { ingredient: String, missing: String },

    #[error("Ingredient {name} must mix zero or two ingredients, found {found}")]
    InvalidMix { name: String, found: usize },

    #[error("Dependency cycle among ingredients: {0}")]
    DependencyCycle(String),

    // Crypto/signing errors
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Signature error: {0}")]
    Signature(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl KeepsakeError {
    /// Configuration problems are detected before any remote call is made.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            KeepsakeError::Config(_)
                | KeepsakeError::InvalidConfig(_)
                | KeepsakeError::UnknownAction(_)
                | KeepsakeError::MissingLedgerEntry(_)
                | KeepsakeError::Build(_)
                | KeepsakeError::Wallet(_)
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            KeepsakeError::UnknownAction(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for KeepsakeError
pub type Result<T> = std::result::Result<T, KeepsakeError>;
