//! Local credential store for the client-side API key

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Fixed key the API key is stored under
pub const API_KEY_ENTRY: &str = "toolzz_openai_key";

/// Environment variable that relocates the credentials file
pub const CREDENTIALS_FILE_ENV: &str = "TOOLZZ_CREDENTIALS_FILE";

/// Key-value store persisted as a small JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialStore {
    /// Stored entries
    #[serde(default)]
    pub entries: BTreeMap<String, String>,

    /// Timestamp of last update
    pub last_updated: Option<u64>,

    /// Store version for compatibility
    pub version: u32,
}

impl CredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            last_updated: None,
            version: 1,
        }
    }

    /// Get the default credentials file path
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CREDENTIALS_FILE_ENV) {
            return PathBuf::from(path);
        }

        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("toolzz");
        path.push("credentials.json");
        path
    }

    /// Load store from file. A missing or unreadable file yields an empty store.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path).await?;
        let store: CredentialStore = serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed credentials file {}: {}", path.display(), e);
            Self::new()
        });

        Ok(store)
    }

    /// Save store to file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;

        Ok(())
    }

    /// Store the API key, trimmed. An empty key clears the entry.
    pub fn set_api_key(&mut self, api_key: &str) {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            self.entries.remove(API_KEY_ENTRY);
        } else {
            self.entries
                .insert(API_KEY_ENTRY.to_string(), api_key.to_string());
        }
        self.last_updated = Some(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        );
    }

    /// Get the stored API key
    pub fn api_key(&self) -> Option<&str> {
        self.entries
            .get(API_KEY_ENTRY)
            .map(String::as_str)
            .filter(|k| !k.is_empty())
    }

    /// Clear the store
    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_updated = None;
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Mask a secret for display, keeping a short prefix and suffix
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_store_save_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("credentials.json");

        let mut store = CredentialStore::new();
        store.set_api_key("  sk-test-123  ");

        store.save(&path).await.unwrap();

        let loaded = CredentialStore::load(&path).await.unwrap();

        assert_eq!(loaded.api_key(), Some("sk-test-123"));
        assert!(loaded.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_store_load_nonexistent() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let store = CredentialStore::load(&path).await.unwrap();

        assert_eq!(store.api_key(), None);
        assert_eq!(store.last_updated, None);
    }

    #[tokio::test]
    async fn test_store_load_malformed() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("credentials.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store = CredentialStore::load(&path).await.unwrap();
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn test_empty_key_clears_entry() {
        let mut store = CredentialStore::new();
        store.set_api_key("sk-abc");
        assert_eq!(store.api_key(), Some("sk-abc"));

        store.set_api_key("   ");
        assert_eq!(store.api_key(), None);
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-1234567890abcd"), "sk-...abcd");
        assert_eq!(mask_secret("short"), "*****");
    }
}
