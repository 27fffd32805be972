use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub kind: FileKind,
    pub size: u64,
}

/// Read access to the locations a data transfer can reference.
#[async_trait]
pub trait FileSystemPort: Send + Sync {
    async fn stat(&self, uri: &Url) -> Result<FileStat>;

    async fn read(&self, uri: &Url) -> Result<Bytes>;
}

#[async_trait]
impl<T: FileSystemPort + ?Sized> FileSystemPort for Arc<T> {
    async fn stat(&self, uri: &Url) -> Result<FileStat> {
        (**self).stat(uri).await
    }

    async fn read(&self, uri: &Url) -> Result<Bytes> {
        (**self).read(uri).await
    }
}
