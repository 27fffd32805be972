//! Storage backend contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::resource::{Resource, OCTET_STREAM};

/// Object name used by [`UploaderPort::test_connection`].
pub const CONNECTION_TEST_NAME: &str = "pasteup-connection-test";
pub const CONNECTION_TEST_SIZE: usize = 1024;

/// Backend specific locator of an uploaded object (S3 key, file path).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub String);

impl ObjectRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ObjectRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferProgress {
    pub sent: u64,
    pub total: u64,
}

impl TransferProgress {
    /// Completed share in `0.0..=1.0`; an empty transfer counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.sent as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Progress sink and cancellation handle for one upload.
#[derive(Debug, Clone)]
pub struct UploadControl {
    progress: Arc<watch::Sender<TransferProgress>>,
    cancel: CancellationToken,
}

impl UploadControl {
    pub fn new(total: u64) -> Self {
        let (tx, _rx) = watch::channel(TransferProgress { sent: 0, total });
        Self {
            progress: Arc::new(tx),
            cancel: CancellationToken::new(),
        }
    }

    /// Control nobody observes, for internal transfers such as connection tests.
    pub fn detached() -> Self {
        Self::new(0)
    }

    pub fn subscribe(&self) -> watch::Receiver<TransferProgress> {
        self.progress.subscribe()
    }

    pub fn progress(&self) -> TransferProgress {
        *self.progress.borrow()
    }

    /// Record `bytes` more bytes as sent.
    pub fn advance(&self, bytes: u64) {
        self.progress.send_modify(|p| {
            p.sent = p.sent.saturating_add(bytes);
            if p.total > 0 {
                p.sent = p.sent.min(p.total);
            }
        });
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload cancelled")]
    Cancelled,

    #[error("storage backend answered {status}: {body}")]
    Status { status: u16, body: String },

    /// Reading or writing the stored bytes failed.
    #[error(transparent)]
    Io(std::io::Error),
}

impl UploadError {
    /// Whether an error chain ends in a user cancellation.
    pub fn is_cancellation(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<UploadError>(), Some(UploadError::Cancelled))
    }
}

type UndoFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

/// Reverses one upload. Consumed by [`UndoAction::run`], so it runs at most once.
pub struct UndoAction {
    pub title: String,
    run: UndoFn,
}

impl UndoAction {
    pub fn new<F, Fut>(title: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            title: title.into(),
            run: Box::new(move || f().boxed()),
        }
    }

    pub async fn run(self) -> Result<()> {
        (self.run)().await
    }
}

impl fmt::Debug for UndoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoAction")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct UploadOutcome {
    pub object_ref: ObjectRef,
    /// Locator inserted into the document.
    pub reference_uri: String,
    pub undo: Option<UndoAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCheck {
    Ok,
    /// The test object reached the store but could not be removed again.
    UploadedButNotDeleted { object: ObjectRef, reason: String },
}

#[async_trait]
pub trait UploaderPort: Send + Sync {
    /// Short backend label for messages (`s3`, `local`).
    fn backend(&self) -> &'static str;

    /// Check the backend settings without touching the network.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Push the resource bytes, reporting progress and honouring cancellation through `control`.
    async fn upload(&self, resource: &Resource, control: UploadControl) -> Result<UploadOutcome>;

    async fn delete(&self, object: &ObjectRef) -> Result<()>;

    /// Upload a small synthetic object under a well-known name and delete it again.
    async fn test_connection(&self) -> Result<ConnectionCheck> {
        let test_object = Resource {
            mime: OCTET_STREAM.to_string(),
            name: CONNECTION_TEST_NAME.to_string(),
            extension: String::new(),
            data: Bytes::from(vec![0u8; CONNECTION_TEST_SIZE]),
        };

        let outcome = self.upload(&test_object, UploadControl::detached()).await?;
        match self.delete(&outcome.object_ref).await {
            Ok(()) => Ok(ConnectionCheck::Ok),
            Err(err) => Ok(ConnectionCheck::UploadedButNotDeleted {
                object: outcome.object_ref,
                reason: format!("{err:#}"),
            }),
        }
    }
}

#[async_trait]
impl<T: UploaderPort + ?Sized> UploaderPort for Arc<T> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn validate(&self) -> Result<()> {
        (**self).validate()
    }

    async fn upload(&self, resource: &Resource, control: UploadControl) -> Result<UploadOutcome> {
        (**self).upload(resource, control).await
    }

    async fn delete(&self, object: &ObjectRef) -> Result<()> {
        (**self).delete(object).await
    }

    async fn test_connection(&self) -> Result<ConnectionCheck> {
        (**self).test_connection().await
    }
}
