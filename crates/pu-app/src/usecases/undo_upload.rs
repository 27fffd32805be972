use std::sync::Arc;

use pu_core::ports::{NotificationLevel, UserInteractionPort};
use tracing::{info, warn};

use crate::UndoLedger;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoResult {
    NothingToUndo,
    Dismissed,
    /// The picked entry was evicted or taken by a concurrent run.
    Gone,
    Undone(String),
    Failed(String),
}

/// Lets the user pick a previous upload and reverse it.
pub struct UndoUpload {
    ledger: Arc<UndoLedger>,
    ui: Arc<dyn UserInteractionPort>,
}

impl UndoUpload {
    pub fn new(ledger: Arc<UndoLedger>, ui: Arc<dyn UserInteractionPort>) -> Self {
        Self { ledger, ui }
    }

    /// Entries are listed newest first. The picked entry leaves the ledger
    /// before it runs, so a failed undo is never retried.
    #[tracing::instrument(name = "usecase.undo_upload.execute", skip_all)]
    pub async fn execute(&self) -> UndoResult {
        let mut entries = self.ledger.entries().await;
        if entries.is_empty() {
            self.ui
                .notify(NotificationLevel::Info, "There are no uploads to undo");
            return UndoResult::NothingToUndo;
        }
        entries.reverse();

        let titles: Vec<String> = entries.iter().map(|(_, title)| title.clone()).collect();
        let Some(index) = self.ui.pick("Undo an upload", &titles).await else {
            return UndoResult::Dismissed;
        };
        let Some((id, title)) = entries.into_iter().nth(index) else {
            warn!(index, "picker returned an index out of range");
            return UndoResult::Dismissed;
        };

        let Some(action) = self.ledger.take(id).await else {
            info!(%title, "undo entry no longer available");
            return UndoResult::Gone;
        };

        match action.run().await {
            Ok(()) => {
                info!(%title, "upload undone");
                self.ui
                    .notify(NotificationLevel::Info, &format!("{title}: done"));
                UndoResult::Undone(title)
            }
            Err(err) => {
                warn!(%title, error = %format!("{err:#}"), "undo failed");
                self.ui.notify(
                    NotificationLevel::Error,
                    &format!("{title} failed: {err:#}"),
                );
                UndoResult::Failed(title)
            }
        }
    }
}
