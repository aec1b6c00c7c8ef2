//! Simple CLI configuration loader for toolzz
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./toolzz.json or ./.toolzz/config.json
//! 3. Git repository root: <repo_root>/.toolzz/config.json
//! 4. XDG config: $XDG_CONFIG_HOME/toolzz/config.json or ~/.config/toolzz/config.json
//! 5. Environment variables only (no files)
//!
//! The API key falls back to the local credential store when neither a flag
//! nor the config file provides one.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toolzz_core::config::{BASE_URL_ENV, DEFAULT_BASE_URL};
use toolzz_core::{CredentialStore, ResolvedClientConfig};
use tracing::debug;

/// Raw configuration file format (simple single-file schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfig {
    /// Backend base URL (optional, falls back to TOOLZZ_API_BASE_URL, then the local runner)
    pub base_url: Option<String>,
    /// API key forwarded to the backend (can be "env:VAR_NAME")
    pub api_key: Option<String>,
    /// Client-side request timeout in seconds (optional, none by default)
    pub timeout_secs: Option<u64>,
    /// Additional headers (optional)
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    /// Credential store location, defaults to the per-user config dir
    credentials_path: Option<PathBuf>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            api_key_override: None,
            base_url_override: None,
            credentials_path: None,
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set credential store location
    pub fn with_credentials_path(mut self, path: PathBuf) -> Self {
        self.credentials_path = Some(path);
        self
    }

    /// Path of the credential store in use
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_path
            .clone()
            .unwrap_or_else(CredentialStore::default_path)
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedClientConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            let expanded = expand_path(override_path);
            self.load_from_path(&expanded).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply flag overrides
        if let Some(api_key) = &self.api_key_override {
            config.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }

        // Step 3: Resolve to final client config
        self.resolve_config(config).await
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        // 1. Current working directory
        if let Some(config) = self.try_load_cwd().await? {
            return Ok(config);
        }

        // 2. Git repository root
        if let Some(config) = self.try_load_git_root().await? {
            return Ok(config);
        }

        // 3. XDG config directory
        if let Some(config) = self.try_load_xdg().await? {
            return Ok(config);
        }

        // 4. Environment variables only
        Ok(self.try_load_env_only())
    }

    /// Try loading from current working directory
    async fn try_load_cwd(&self) -> Result<Option<RawConfig>> {
        let cwd = std::env::current_dir()?;

        let toolzz_json = cwd.join("toolzz.json");
        if toolzz_json.exists() {
            return Ok(Some(self.load_file(&toolzz_json).await?));
        }

        let toolzz_dir_config = cwd.join(".toolzz").join("config.json");
        if toolzz_dir_config.exists() {
            return Ok(Some(self.load_file(&toolzz_dir_config).await?));
        }

        Ok(None)
    }

    /// Try loading from git repository root
    async fn try_load_git_root(&self) -> Result<Option<RawConfig>> {
        if let Some(git_root) = self.find_git_root()? {
            let config_path = git_root.join(".toolzz").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Try loading from XDG config directory
    async fn try_load_xdg(&self) -> Result<Option<RawConfig>> {
        if let Some(config_dir) = self.get_xdg_config_dir() {
            let config_path = config_dir.join("toolzz").join("config.json");
            if config_path.exists() {
                return Ok(Some(self.load_file(&config_path).await?));
            }
        }
        Ok(None)
    }

    /// Configuration from environment variables only
    fn try_load_env_only(&self) -> RawConfig {
        debug!("No config file found, using environment only");
        RawConfig {
            base_url: std::env::var(BASE_URL_ENV).ok(),
            ..RawConfig::default()
        }
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find git repository root
    fn find_git_root(&self) -> Result<Option<PathBuf>> {
        let mut current = std::env::current_dir()?;

        loop {
            if current.join(".git").exists() {
                return Ok(Some(current));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Get XDG config directory
    fn get_xdg_config_dir(&self) -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Some(PathBuf::from(xdg_config))
        } else {
            dirs::home_dir().map(|home| home.join(".config"))
        }
    }

    /// Resolve raw config to ResolvedClientConfig
    async fn resolve_config(&self, config: RawConfig) -> Result<ResolvedClientConfig> {
        let base_url = config
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Resolve API key (handle env: prefix)
        let api_key = match config.api_key {
            Some(key) => match key.strip_prefix("env:") {
                Some(var_name) => Some(
                    std::env::var(var_name)
                        .with_context(|| format!("Environment variable not found: {}", var_name))?,
                ),
                None => Some(key),
            },
            None => None,
        };

        let api_key = match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => Some(key),
            None => {
                let store = CredentialStore::load(self.credentials_path()).await?;
                store.api_key().map(str::to_string)
            }
        };

        let resolved = ResolvedClientConfig::new(base_url)
            .with_api_key(api_key)
            .with_timeout_secs(config.timeout_secs)
            .with_headers(config.headers);

        resolved
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(resolved)
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}
