use anyhow::{Context, Result};
use async_trait::async_trait;
use pu_core::ports::SettingsPort;
use pu_core::settings::{Settings, CURRENT_SCHEMA_VERSION};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::fs::app_dirs;

/// `<config dir>/pasteup/config.toml`.
pub fn default_settings_path() -> Result<PathBuf> {
    Ok(app_dirs::config_dir()?.join("config.toml"))
}

/// Settings stored as a TOML document.
pub struct FileSettingsRepository {
    path: PathBuf,
}

impl FileSettingsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    async fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.dir() {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create settings dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the target.
    async fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir().await?;

        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .await
            .with_context(|| format!("write temp settings failed: {}", tmp_path.display()))?;

        fs::rename(&tmp_path, &self.path).await.with_context(|| {
            format!(
                "rename temp settings to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[async_trait]
impl SettingsPort for FileSettingsRepository {
    /// A missing file yields `Settings::default()`.
    async fn load(&self) -> Result<Settings> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file missing, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read settings failed: {}", self.path.display()))
            }
        };

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("parse settings failed: {}", self.path.display()))?;

        if settings.schema_version > CURRENT_SCHEMA_VERSION {
            warn!(
                found = settings.schema_version,
                supported = CURRENT_SCHEMA_VERSION,
                "settings written by a newer version"
            );
        }

        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings).context("serialize settings failed")?;

        self.atomic_write(&content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pu_core::settings::{LocalSettings, NamingMethod, PipelineOptionsOverride, UploaderSettings};
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::new(dir.path().join("config.toml"));
        assert_eq!(repo.load().await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn saved_settings_load_back() {
        let dir = tempdir().unwrap();
        let repo = FileSettingsRepository::new(dir.path().join("nested").join("config.toml"));

        let mut settings = Settings::default();
        settings.pipeline.naming_method = NamingMethod::ReadableTimestamp;
        settings.undo_history_size = 3;
        settings.languages.insert(
            "markdown".to_string(),
            PipelineOptionsOverride {
                size_limit: Some(0),
                ..Default::default()
            },
        );
        settings.uploader = UploaderSettings::Local(LocalSettings {
            target_dir: dir.path().join("assets"),
            link_base: Some("https://static.example.com/".to_string()),
        });

        repo.save(&settings).await.unwrap();
        assert!(!dir.path().join("nested").join("config.toml.tmp").exists());
        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn reads_hand_written_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
undo_history_size = 5

[pipeline]
naming_method = "uuid"
multi_file_policy = "allow"

[languages.html]
image_snippet = '<img src="${url}">'

[uploader]
kind = "s3"
bucket = "assets"
access_key_id = "AKID"
secret_access_key = "secret"
prefix = "notes/"
"#,
        )
        .unwrap();

        let settings = FileSettingsRepository::new(&path).load().await.unwrap();
        assert_eq!(settings.undo_history_size, 5);
        assert_eq!(settings.pipeline.naming_method, NamingMethod::Uuid);
        assert_eq!(
            settings.options_for(Some("html")).snippets.image,
            "<img src=\"${url}\">"
        );
        match settings.uploader {
            UploaderSettings::S3(s3) => {
                assert_eq!(s3.bucket, "assets");
                assert_eq!(s3.prefix, "notes/");
                assert_eq!(s3.region, "us-east-1");
            }
            other => panic!("unexpected uploader {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "pipeline = [").unwrap();

        let err = FileSettingsRepository::new(&path).load().await.unwrap_err();
        assert!(format!("{err:#}").contains("parse settings failed"));
    }
}
