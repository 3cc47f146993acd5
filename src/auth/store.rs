use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

/// Token file name in the data directory
const TOKEN_FILE: &str = "auth_token";

/// Durable slot for the raw bearer token.
///
/// This is the only piece of session state that survives a restart. It is
/// written on successful login/signup, and removed on logout or whenever the
/// server stops accepting the token.
pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Read the persisted token, if one exists and is non-empty
    pub fn load(&self) -> Option<String> {
        let path = self.token_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to read token file");
                None
            }
        }
    }

    /// Persist the token, creating the data directory if needed
    pub fn save(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }
        std::fs::write(&path, token).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the persisted token. Missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}
