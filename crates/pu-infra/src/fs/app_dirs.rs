use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "pasteup";

/// Configuration root, e.g. `~/.config/pasteup` on Linux.
///
/// Directories are not created here; the caller decides when to create them.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Unable to get platform config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Data root, `$XDG_DATA_HOME/pasteup` when set on Linux.
pub fn data_dir() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_data_home) = std::env::var_os("XDG_DATA_HOME") {
            return Ok(PathBuf::from(xdg_data_home).join(APP_DIR_NAME));
        }
    }

    let base = dirs::data_dir().context("Unable to get platform data directory")?;
    Ok(base.join(APP_DIR_NAME))
}

pub fn log_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join("logs"))
}
