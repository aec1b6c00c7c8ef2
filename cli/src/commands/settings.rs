//! Local API key settings

use crate::config::CliConfigLoader;
use crate::output::notify;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use toolzz_core::config::mask_secret;
use toolzz_core::CredentialStore;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the stored API key (masked) and where it lives
    Show,

    /// Store the API key sent with scrape requests
    Set {
        /// The key; prompted for without echo when omitted
        key: Option<String>,
    },

    /// Remove the stored API key
    Clear,
}

/// Manage the locally stored API key
pub async fn settings_command(loader: CliConfigLoader, action: SettingsAction) -> Result<()> {
    let path = loader.credentials_path();
    let mut store = CredentialStore::load(&path).await?;

    match action {
        SettingsAction::Show => {
            let key = store
                .api_key()
                .map(mask_secret)
                .unwrap_or_else(|| "não configurada".to_string());
            println!("Chave de API: {}", key.bold());
            println!("{}", format!("Arquivo: {}", path.display()).dimmed());
        }
        SettingsAction::Set { key } => {
            let key = match key {
                Some(key) => key,
                None => dialoguer::Password::new()
                    .with_prompt("Chave de API")
                    .allow_empty_password(true)
                    .interact()
                    .context("Failed to read the API key")?,
            };

            store.set_api_key(&key);
            store.save(&path).await?;
            info!("Credentials saved to {}", path.display());

            if store.api_key().is_some() {
                notify::success("Chave de API salva com sucesso!");
            } else {
                notify::info("Chave de API removida.");
            }
        }
        SettingsAction::Clear => {
            store.clear();
            store.save(&path).await?;
            notify::info("Chave de API removida.");
        }
    }

    Ok(())
}
