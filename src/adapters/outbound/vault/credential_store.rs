use crate::ports::outbound::ProviderKind;
use crate::shared::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One stored provider credential.
///
/// `secret` is the sealed value produced by the vault; `encrypted`
/// records whether a vault secret was available at save time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCredential {
    pub provider: ProviderKind,
    pub model: String,
    pub secret: String,
    pub encrypted: bool,
    pub updated_at: DateTime<Utc>,
}

/// JSON-file store of provider credentials, one per provider.
///
/// Saving a credential for a provider replaces any previous one.
/// Writes go through a temp file and rename, like the analysis cache.
pub struct CredentialStore {
    file_path: PathBuf,
}

impl CredentialStore {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// All stored credentials; a missing file reads as empty
    pub fn load_all(&self) -> Result<Vec<ProviderCredential>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read credential store: {}", self.file_path.display()))?;
        let credentials = serde_json::from_str(&content)
            .with_context(|| format!("Credential store is corrupt: {}", self.file_path.display()))?;
        Ok(credentials)
    }

    /// The stored credential for one provider, if any
    pub fn find(&self, provider: ProviderKind) -> Result<Option<ProviderCredential>> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|c| c.provider == provider))
    }

    /// Inserts or replaces the credential for `credential.provider`
    pub fn save(&self, credential: ProviderCredential) -> Result<()> {
        let mut credentials = self.load_all().unwrap_or_default();
        credentials.retain(|c| c.provider != credential.provider);
        credentials.push(credential);
        self.write_all(&credentials)
    }

    fn write_all(&self, credentials: &[ProviderCredential]) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(credentials)?;
        let temp_path = self.file_path.with_extension("json.tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write: {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.file_path)
            .with_context(|| format!("Failed to replace: {}", self.file_path.display()))?;
        Ok(())
    }
}
