use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use pu_core::ports::{FileKind, FileStat, FileSystemPort};
use tokio::fs;
use url::Url;

/// `file://` locations on the local disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn path_of(uri: &Url) -> Result<PathBuf> {
        if uri.scheme() != "file" {
            bail!("unsupported location scheme `{}`: {uri}", uri.scheme());
        }
        uri.to_file_path()
            .map_err(|()| anyhow!("not a local file path: {uri}"))
    }
}

#[async_trait]
impl FileSystemPort for TokioFileSystem {
    async fn stat(&self, uri: &Url) -> Result<FileStat> {
        let path = Self::path_of(uri)?;
        let meta = fs::metadata(&path)
            .await
            .with_context(|| format!("stat failed: {}", path.display()))?;

        let kind = if meta.is_file() {
            FileKind::File
        } else if meta.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };

        Ok(FileStat {
            kind,
            size: meta.len(),
        })
    }

    async fn read(&self, uri: &Url) -> Result<Bytes> {
        let path = Self::path_of(uri)?;
        let data = fs::read(&path)
            .await
            .with_context(|| format!("read failed: {}", path.display()))?;
        Ok(Bytes::from(data))
    }
}
