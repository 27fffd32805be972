//! Writes uploads into a directory on the local disk.

use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use pu_core::ports::{ObjectRef, UndoAction, UploadControl, UploadError, UploadOutcome, UploaderPort};
use pu_core::settings::LocalSettings;
use pu_core::Resource;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::s3::encode_key;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct LocalUploader {
    settings: LocalSettings,
}

impl LocalUploader {
    pub fn new(settings: LocalSettings) -> Self {
        Self { settings }
    }

    async fn target_dir(&self) -> Result<PathBuf> {
        let dir = &self.settings.target_dir;
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create target dir failed: {}", dir.display()))?;
        fs::canonicalize(dir)
            .await
            .with_context(|| format!("resolve target dir failed: {}", dir.display()))
    }

    fn reference_uri(&self, path: &Path, file_name: &str) -> Result<String> {
        match &self.settings.link_base {
            Some(base) if !base.is_empty() => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                encode_key(file_name)
            )),
            _ => Url::from_file_path(path)
                .map(String::from)
                .map_err(|()| anyhow!("cannot build file URI for {}", path.display())),
        }
    }

    /// Resolve `file_name` inside the target dir; anything but a single plain segment is refused.
    async fn target_path(&self, file_name: &str) -> Result<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !file_name.contains(['/', '\\']) => {}
            _ => bail!("refusing file name outside the target dir: {file_name:?}"),
        }
        Ok(self.target_dir().await?.join(file_name))
    }

    /// Chunked write so progress and cancellation work for large files.
    async fn write(&self, path: &Path, resource: &Resource, control: &UploadControl) -> Result<()> {
        let mut file = fs::File::create(path)
            .await
            .map_err(UploadError::Io)
            .with_context(|| format!("create file failed: {}", path.display()))?;

        for chunk in resource.data.chunks(CHUNK_SIZE) {
            if control.is_cancelled() {
                return Err(UploadError::Cancelled.into());
            }
            file.write_all(chunk)
                .await
                .map_err(UploadError::Io)
                .with_context(|| format!("write failed: {}", path.display()))?;
            control.advance(chunk.len() as u64);
        }
        file.flush().await.map_err(UploadError::Io)?;
        Ok(())
    }
}

async fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .with_context(|| format!("remove file failed: {}", path.display()))
}

#[async_trait]
impl UploaderPort for LocalUploader {
    fn backend(&self) -> &'static str {
        "local"
    }

    fn validate(&self) -> Result<()> {
        Ok(self.settings.validate()?)
    }

    async fn upload(&self, resource: &Resource, control: UploadControl) -> Result<UploadOutcome> {
        self.settings.validate()?;

        let file_name = resource.file_name();
        let path = self.target_path(&file_name).await?;
        debug!(path = %path.display(), "writing upload");

        if let Err(err) = self.write(&path, resource, &control).await {
            if let Err(cleanup) = remove(&path).await {
                warn!(error = %cleanup, "failed to remove partial file");
            }
            return Err(err);
        }
        info!(path = %path.display(), "upload written");

        let reference_uri = self.reference_uri(&path, &file_name)?;
        let undo_path = path.clone();
        let undo = UndoAction::new(format!("Delete {file_name}"), move || async move {
            remove(&undo_path).await
        });

        Ok(UploadOutcome {
            object_ref: ObjectRef(path.to_string_lossy().into_owned()),
            reference_uri,
            undo: Some(undo),
        })
    }

    async fn delete(&self, object: &ObjectRef) -> Result<()> {
        remove(Path::new(object.as_str())).await
    }
}
