use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use pu_core::ports::{
    NotificationLevel, UploadControl, UploadError, UploadOutcome, UploaderPort,
    UserInteractionPort,
};
use pu_core::Resource;
use tracing::{debug, info, warn};

use crate::UndoLedger;

/// How long an upload may run before a progress indicator appears.
pub const PROGRESS_GRACE_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct UploadedResource {
    pub resource: Resource,
    pub reference_uri: String,
}

/// Uploads a gated batch one resource at a time.
///
/// A failed or cancelled upload is reported and skipped; the rest of the
/// batch still goes out. Reversible uploads land in the undo ledger.
pub struct UploadResources {
    uploader: Arc<dyn UploaderPort>,
    ui: Arc<dyn UserInteractionPort>,
    ledger: Arc<UndoLedger>,
    grace: Duration,
}

impl UploadResources {
    pub fn new(
        uploader: Arc<dyn UploaderPort>,
        ui: Arc<dyn UserInteractionPort>,
        ledger: Arc<UndoLedger>,
    ) -> Self {
        Self {
            uploader,
            ui,
            ledger,
            grace: PROGRESS_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    #[tracing::instrument(
        name = "usecase.upload_resources.execute",
        skip_all,
        fields(count = batch.len(), backend = self.uploader.backend())
    )]
    pub async fn execute(&self, batch: Vec<Resource>) -> Vec<UploadedResource> {
        let mut uploaded = Vec::with_capacity(batch.len());

        for resource in batch {
            let file_name = resource.file_name();
            match self.upload_one(&resource).await {
                Ok(outcome) => {
                    info!(file = %file_name, object = %outcome.object_ref, "uploaded");
                    if let Some(undo) = outcome.undo {
                        for title in self.ledger.record(undo).await {
                            debug!(%title, "undo entry evicted");
                        }
                    }
                    uploaded.push(UploadedResource {
                        resource,
                        reference_uri: outcome.reference_uri,
                    });
                }
                Err(err) if UploadError::is_cancellation(&err) => {
                    info!(file = %file_name, "upload cancelled");
                    self.ui.notify(
                        NotificationLevel::Info,
                        &format!("Upload of {file_name} cancelled"),
                    );
                }
                Err(err) => {
                    warn!(file = %file_name, error = %format!("{err:#}"), "upload failed");
                    self.ui.notify(
                        NotificationLevel::Error,
                        &format!("Failed to upload {file_name}: {err:#}"),
                    );
                }
            }
        }

        uploaded
    }

    /// Races the upload against the grace timer; the progress indicator only
    /// appears when the timer wins.
    async fn upload_one(&self, resource: &Resource) -> Result<UploadOutcome> {
        let control = UploadControl::new(resource.size_bytes());
        let upload = self.uploader.upload(resource, control.clone());
        tokio::pin!(upload);

        let result = tokio::select! {
            biased;
            result = &mut upload => result,
            _ = tokio::time::sleep(self.grace) => {
                let indicator = self.ui.show_progress(
                    &format!("Uploading {}", resource.file_name()),
                    control.subscribe(),
                    control.cancellation().clone(),
                );
                let result = (&mut upload).await;
                indicator.finish();
                result
            }
        };

        match result {
            Err(err) if control.is_cancelled() && !UploadError::is_cancellation(&err) => {
                debug!(error = %err, "failure after cancellation");
                Err(UploadError::Cancelled.into())
            }
            other => other,
        }
    }
}
