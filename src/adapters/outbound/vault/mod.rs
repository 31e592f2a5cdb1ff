pub mod credential_store;
pub mod secret_vault;

pub use credential_store::{CredentialStore, ProviderCredential};
pub use secret_vault::SecretVault;
