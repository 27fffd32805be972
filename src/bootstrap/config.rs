//! # Configuration Loader / 配置加载器
//!
//! Resolves the settings file location and loads it once at startup so the
//! backend can be chosen. Pipeline options are re-read through the
//! settings port on every paste, so edits apply without a restart.

use std::path::PathBuf;

use anyhow::Result;
use pu_core::ports::SettingsPort;
use pu_core::Settings;
use pu_infra::settings::{default_settings_path, FileSettingsRepository};

/// `--config` when given, else `<config dir>/pasteup/config.toml`.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => default_settings_path(),
    }
}

pub async fn load_settings(repo: &FileSettingsRepository) -> Result<Settings> {
    let settings = repo.load().await?;
    tracing::debug!(path = %repo.path().display(), "settings loaded");
    Ok(settings)
}

/// Write the default settings unless a file already exists (or `force`).
/// Returns whether the file was written.
pub async fn init_config(repo: &FileSettingsRepository, force: bool) -> Result<bool> {
    if !force && tokio::fs::try_exists(repo.path()).await? {
        return Ok(false);
    }
    repo.save(&Settings::default()).await?;
    Ok(true)
}
