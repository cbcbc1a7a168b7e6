use crate::error::{KeepsakeError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use ed25519_dalek::{Signer, SigningKey};
use sha3::{Digest, Sha3_256};
use tracing::info;
use zeroize::Zeroize;

/// Signature scheme flag prepended to the public key before hashing
const ED25519_FLAG: u8 = 0x00;

/// Addresses are the first 20 bytes of the key hash
const ADDRESS_LENGTH: usize = 20;

/// Ed25519 account used to sign transactions
///
/// # Security
/// The hex secret is zeroized as soon as the signing key has been built and
/// never appears in `Debug` output.
#[derive(Clone)]
pub struct Wallet {
    inner: SigningKey,
    address: String,
}

impl Wallet {
    /// Create a wallet from a hex secret.
    ///
    /// Accepts a 32-byte seed or a 64-byte secret key (seed followed by the
    /// public key), with or without a `0x` prefix.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let mut key_hex = private_key.trim().trim_start_matches("0x").to_string();
        let decoded = hex::decode(&key_hex);
        key_hex.zeroize();

        let mut bytes =
            decoded.map_err(|e| KeepsakeError::Wallet(format!("Invalid private key: {}", e)))?;

        if bytes.len() != 32 && bytes.len() != 64 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(KeepsakeError::Wallet(format!(
                "Invalid private key length: expected 32 or 64 bytes, got {}",
                len
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        bytes.zeroize();

        let inner = SigningKey::from_bytes(&seed);
        seed.zeroize();

        let wallet = Self::from_signing_key(inner);
        info!("Wallet initialized: {}", wallet.address());
        Ok(wallet)
    }

    /// Create a wallet from `KEEPSAKE_PRIVATE_KEY`, falling back to `PKEY`.
    pub fn from_env() -> Result<Self> {
        let mut private_key = std::env::var("KEEPSAKE_PRIVATE_KEY")
            .or_else(|_| std::env::var("PKEY"))
            .or_else(|_| std::env::var("pkey"))
            .map_err(|_| {
                KeepsakeError::Wallet(
                    "KEEPSAKE_PRIVATE_KEY or PKEY environment variable not set; run `keepsake keygen`"
                        .to_string(),
                )
            })?;

        let result = Self::from_private_key(&private_key);
        private_key.zeroize();
        result
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    fn from_signing_key(inner: SigningKey) -> Self {
        let address = derive_address(inner.verifying_key().as_bytes());
        Self { inner, address }
    }

    /// `0x`-prefixed account address
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.inner.verifying_key().to_bytes()
    }

    /// Secret seed as hex, for `keygen` output only.
    pub fn secret_hex(&self) -> String {
        hex::encode(self.inner.to_bytes())
    }

    /// Sign raw transaction bytes.
    pub fn sign(&self, tx_bytes: &[u8]) -> [u8; 64] {
        self.inner.sign(tx_bytes).to_bytes()
    }

    /// Sign and return `(signature, public key)` both base64 encoded, the
    /// form `sui_executeTransaction` expects.
    pub fn sign_base64(&self, tx_bytes: &[u8]) -> (String, String) {
        (
            BASE64_STANDARD.encode(self.sign(tx_bytes)),
            BASE64_STANDARD.encode(self.public_key_bytes()),
        )
    }
}

/// Derive an account address from an Ed25519 public key.
pub fn derive_address(public_key: &[u8; 32]) -> String {
    let mut hasher = Sha3_256::new();
    hasher.update([ED25519_FLAG]);
    hasher.update(public_key);
    let digest = hasher.finalize();
    format!("0x{}", hex::encode(&digest[..ADDRESS_LENGTH]))
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .finish()
    }
}
