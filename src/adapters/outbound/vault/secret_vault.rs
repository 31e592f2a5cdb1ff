use crate::shared::error::CryptoError;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use argon2::Argon2;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Envelope encryption for stored provider credentials
///
/// A vault secret (from the environment or config) is stretched with
/// Argon2id into an AES-256-GCM key. Sealed values are
/// `base64(salt || nonce || ciphertext)` with a fresh salt and nonce
/// per seal, so sealing the same credential twice never repeats.
///
/// Without a vault secret the vault degrades to passthrough: values
/// are stored as given and flagged unencrypted.
pub struct SecretVault {
    secret: Option<String>,
}

impl SecretVault {
    pub const SECRET_ENV_VAR: &'static str = "DEPSENTRY_VAULT_SECRET";

    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    /// Reads the vault secret from the environment
    pub fn from_env() -> Self {
        Self::new(std::env::var(Self::SECRET_ENV_VAR).ok())
    }

    /// Whether a vault secret is available for sealing
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Seals a credential for storage.
    ///
    /// # Returns
    /// The value to store and whether it is encrypted. Without a vault
    /// secret the plaintext is returned unchanged and flagged as such.
    pub fn seal(&self, plaintext: &str) -> Result<(String, bool), CryptoError> {
        let secret = match &self.secret {
            Some(secret) => secret,
            None => return Ok((plaintext.to_string(), false)),
        };

        let mut salt = [0u8; SALT_LEN];
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce_bytes);

        let key = Self::derive_key(secret, &salt)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| CryptoError::SecretMismatchOrMissing(e.to_string()))?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce_bytes);
        envelope.extend_from_slice(&ciphertext);

        Ok((BASE64.encode(envelope), true))
    }

    /// Opens a stored credential.
    ///
    /// # Errors
    /// Returns `CryptoError::SecretMismatchOrMissing` when the value is
    /// encrypted but no vault secret is configured, the secret differs
    /// from the one used at seal time, or the envelope is damaged.
    pub fn open(&self, stored: &str, encrypted: bool) -> Result<String, CryptoError> {
        if !encrypted {
            return Ok(stored.to_string());
        }

        let secret = self.secret.as_ref().ok_or_else(|| {
            CryptoError::SecretMismatchOrMissing("no vault secret configured".to_string())
        })?;

        let envelope = BASE64
            .decode(stored)
            .map_err(|e| CryptoError::SecretMismatchOrMissing(e.to_string()))?;
        if envelope.len() < SALT_LEN + NONCE_LEN + 1 {
            return Err(CryptoError::SecretMismatchOrMissing(
                "envelope too short".to_string(),
            ));
        }

        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

        let key = Self::derive_key(secret, salt)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| {
                CryptoError::SecretMismatchOrMissing("authentication tag mismatch".to_string())
            })?;

        String::from_utf8(plaintext)
            .map_err(|e| CryptoError::SecretMismatchOrMissing(e.to_string()))
    }

    /// Argon2id key derivation with per-value salt
    fn derive_key(secret: &str, salt: &[u8]) -> Result<[u8; KEY_LEN], CryptoError> {
        let mut key = [0u8; KEY_LEN];
        Argon2::default()
            .hash_password_into(secret.as_bytes(), salt, &mut key)
            .map_err(|e| CryptoError::SecretMismatchOrMissing(e.to_string()))?;
        Ok(key)
    }
}
