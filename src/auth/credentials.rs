use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "aniboard";

/// OS-keychain storage for a remembered login password.
///
/// Only the password lives here; the session token has its own durable slot
/// with a different lifecycle (see `TokenStore`).
pub struct CredentialStore;

impl CredentialStore {
    fn entry(username: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, username).context("Failed to create keyring entry")
    }

    /// Remember the password for a username in the OS keychain
    pub fn remember(username: &str, password: &str) -> Result<()> {
        Self::entry(username)?
            .set_password(password)
            .context("Failed to store password in keychain")
    }

    /// Retrieve the remembered password for a username
    pub fn lookup(username: &str) -> Result<String> {
        Self::entry(username)?
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for a username
    pub fn forget(username: &str) -> Result<()> {
        Self::entry(username)?
            .delete_credential()
            .context("Failed to delete credential from keychain")
    }

    /// Check whether a password is remembered for a username
    pub fn is_remembered(username: &str) -> bool {
        Self::entry(username)
            .map(|entry| entry.get_password().is_ok())
            .unwrap_or(false)
    }
}
