use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::uploader::TransferProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A visible progress indicator; dropped or finished once the transfer ends.
pub trait ProgressIndicator: Send {
    fn finish(self: Box<Self>);
}

/// Everything the pipeline needs from the person in front of the editor.
#[async_trait]
pub trait UserInteractionPort: Send + Sync {
    /// Transient notification; never blocks the pipeline.
    fn notify(&self, level: NotificationLevel, message: &str);

    /// Yes/no question. Anything but an explicit "yes" is `false`.
    async fn confirm(&self, question: &str) -> bool;

    /// Free text input pre-filled with `initial`. `None` when dismissed.
    async fn input(&self, prompt: &str, initial: Option<&str>) -> Option<String>;

    /// Pick one of `items`, returning its index. `None` when dismissed.
    async fn pick(&self, title: &str, items: &[String]) -> Option<usize>;

    /// Show a cancellable indicator fed by `progress`; cancelling it fires `cancel`.
    fn show_progress(
        &self,
        title: &str,
        progress: watch::Receiver<TransferProgress>,
        cancel: CancellationToken,
    ) -> Box<dyn ProgressIndicator>;
}
