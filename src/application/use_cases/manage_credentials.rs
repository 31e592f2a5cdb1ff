use crate::adapters::outbound::vault::{CredentialStore, ProviderCredential, SecretVault};
use crate::ports::outbound::ProviderKind;
use crate::shared::Result;
use chrono::Utc;

/// CredentialManager - save and resolve provider credentials.
///
/// Couples the vault (sealing) with the credential store (persistence).
/// Saving for a provider replaces the previous credential; resolving
/// opens the sealed value with the current vault secret.
pub struct CredentialManager {
    vault: SecretVault,
    store: CredentialStore,
}

impl CredentialManager {
    pub fn new(vault: SecretVault, store: CredentialStore) -> Self {
        Self { vault, store }
    }

    pub fn vault_is_configured(&self) -> bool {
        self.vault.is_configured()
    }

    /// Seals and stores a credential.
    ///
    /// # Returns
    /// Whether the stored value is encrypted; `false` means the vault
    /// had no secret and the credential was stored in plaintext, which
    /// callers should surface as a warning.
    pub fn save(
        &self,
        provider: ProviderKind,
        model: Option<String>,
        secret: &str,
    ) -> Result<bool> {
        let (sealed, encrypted) = self.vault.seal(secret)?;
        let credential = ProviderCredential {
            provider,
            model: model.unwrap_or_else(|| provider.default_model().to_string()),
            secret: sealed,
            encrypted,
            updated_at: Utc::now(),
        };
        self.store.save(credential)?;
        Ok(encrypted)
    }

    /// Opens the stored credential for a provider, if one exists.
    ///
    /// # Errors
    /// `CryptoError::SecretMismatchOrMissing` (wrapped) when the stored
    /// value is encrypted and the current vault secret cannot open it.
    pub fn resolve(&self, provider: ProviderKind) -> Result<Option<String>> {
        match self.store.find(provider)? {
            Some(credential) => {
                let secret = self.vault.open(&credential.secret, credential.encrypted)?;
                Ok(Some(secret))
            }
            None => Ok(None),
        }
    }

    /// The model saved alongside the credential, if any
    pub fn stored_model(&self, provider: ProviderKind) -> Result<Option<String>> {
        Ok(self.store.find(provider)?.map(|c| c.model))
    }
}
