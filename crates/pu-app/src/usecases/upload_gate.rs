use std::sync::Arc;

use anyhow::{Context, Result};
use pu_core::policy::{check_multiple_files, check_total_size, MimeFilter, PolicyAbort, PolicyCheck};
use pu_core::ports::{NotificationLevel, UserInteractionPort};
use pu_core::{PipelineOptions, Resource};
use tracing::{debug, info};

/// Applies the MIME filter, the multi-file policy and the size limit to a completed batch.
pub struct ApplyUploadPolicy {
    ui: Arc<dyn UserInteractionPort>,
}

impl ApplyUploadPolicy {
    pub fn new(ui: Arc<dyn UserInteractionPort>) -> Self {
        Self { ui }
    }

    /// Returns the resources allowed through, or an empty batch when the run is aborted.
    ///
    /// `raw_item_count` is the number of items the event carried, before any were dropped.
    /// Fails only when the configured MIME filter is not a valid expression.
    #[tracing::instrument(
        name = "usecase.upload_gate.execute",
        skip_all,
        fields(count = batch.len(), raw_item_count = raw_item_count)
    )]
    pub async fn execute(
        &self,
        batch: Vec<Resource>,
        raw_item_count: usize,
        options: &PipelineOptions,
    ) -> Result<Vec<Resource>> {
        let batch = match options.mime_filter.as_deref() {
            Some(pattern) => {
                let filter = MimeFilter::new(pattern)
                    .with_context(|| format!("invalid mime filter `{pattern}`"))?;
                let before = batch.len();
                let kept = filter.retain(batch);
                if kept.len() < before {
                    debug!(dropped = before - kept.len(), pattern, "mime filter dropped resources");
                }
                kept
            }
            None => batch,
        };

        if batch.is_empty() {
            return Ok(batch);
        }

        if let Err(abort) = self
            .gate(check_multiple_files(raw_item_count, options.multi_file_policy))
            .await
        {
            return Ok(self.abort(abort));
        }

        if let Err(abort) = self.gate(check_total_size(&batch, options.size_limit)).await {
            return Ok(self.abort(abort));
        }

        Ok(batch)
    }

    async fn gate(&self, check: PolicyCheck) -> Result<(), PolicyAbort> {
        match check {
            PolicyCheck::Pass => Ok(()),
            PolicyCheck::Abort(abort) => Err(abort),
            PolicyCheck::AskUser {
                question,
                on_decline,
            } => {
                if self.ui.confirm(&question).await {
                    Ok(())
                } else {
                    Err(on_decline)
                }
            }
        }
    }

    fn abort(&self, reason: PolicyAbort) -> Vec<Resource> {
        info!(%reason, "upload batch aborted");
        self.ui.notify(NotificationLevel::Warning, &reason.to_string());
        Vec::new()
    }
}
