//! The paste/drop action: payload in, snippet out.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use pu_core::ports::NotificationLevel;
use pu_core::snippet::{join_snippets, render_snippet};
use pu_core::transfer::{LocationFilter, NoExclusion, WorkspaceExclusion};
use pu_core::DataTransfer;
use tracing::{debug, error, info};

use super::upload_resources::PROGRESS_GRACE_PERIOD;
use super::{ApplyUploadPolicy, CompleteResources, ExtractTransfer, UploadResources, UploadedResource};
use crate::AppDeps;

/// Where the payload landed.
#[derive(Debug, Clone, Default)]
pub struct PasteContext {
    /// Language id of the target document, selecting per-language options.
    pub language: Option<String>,
    pub workspace_roots: Vec<PathBuf>,
}

/// Text the host inserts at the original cursor or drop position.
#[derive(Debug, Clone)]
pub struct PasteEdit {
    pub text: String,
    pub uploaded: Vec<UploadedResource>,
}

pub struct PasteUploadPipeline {
    deps: AppDeps,
    grace: Duration,
}

impl PasteUploadPipeline {
    pub fn new(deps: AppDeps) -> Self {
        Self {
            deps,
            grace: PROGRESS_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Run one paste/drop event.
    ///
    /// `None` means the host should fall back to its default paste behavior:
    /// the pipeline is disabled, nothing usable was found, the batch was
    /// aborted, or every upload failed. Errors are shown to the user, never returned.
    #[tracing::instrument(
        name = "usecase.paste_upload.execute",
        skip_all,
        fields(language = ?context.language, items = transfer.len())
    )]
    pub async fn execute(&self, transfer: &DataTransfer, context: &PasteContext) -> Option<PasteEdit> {
        match self.run(transfer, context).await {
            Ok(edit) => edit,
            Err(err) => {
                error!(error = %format!("{err:#}"), "paste upload failed");
                self.deps
                    .ui
                    .notify(NotificationLevel::Error, &format!("Upload failed: {err:#}"));
                None
            }
        }
    }

    async fn run(&self, transfer: &DataTransfer, context: &PasteContext) -> Result<Option<PasteEdit>> {
        let settings = self
            .deps
            .settings
            .load()
            .await
            .context("failed to load settings")?;
        let options = settings.options_for(context.language.as_deref());
        if !options.enabled {
            debug!("paste upload disabled for this document");
            return Ok(None);
        }
        self.deps
            .uploader
            .validate()
            .context("upload backend is not configured")?;

        let exclusion: Box<dyn LocationFilter> = if options.ignore_workspace_files {
            Box::new(WorkspaceExclusion::new(context.workspace_roots.iter().cloned()))
        } else {
            Box::new(NoExclusion)
        };

        let extracted = ExtractTransfer::new(self.deps.file_system.clone())
            .execute(transfer, exclusion.as_ref())
            .await;
        if extracted.is_empty() {
            return Ok(None);
        }
        let raw_item_count = extracted.len();

        let completed = CompleteResources::new(self.deps.ui.clone(), self.deps.clock.clone())
            .execute(extracted, &options)
            .await;
        if completed.is_empty() {
            return Ok(None);
        }

        let gated = ApplyUploadPolicy::new(self.deps.ui.clone())
            .execute(completed, raw_item_count, &options)
            .await?;
        if gated.is_empty() {
            return Ok(None);
        }

        let uploaded = UploadResources::new(
            self.deps.uploader.clone(),
            self.deps.ui.clone(),
            self.deps.ledger.clone(),
        )
        .with_grace_period(self.grace)
        .execute(gated)
        .await;
        if uploaded.is_empty() {
            return Ok(None);
        }

        let text = join_snippets(
            uploaded
                .iter()
                .map(|u| render_snippet(&options.snippets, &u.resource, &u.reference_uri)),
        );
        info!(count = uploaded.len(), "paste upload finished");

        Ok(Some(PasteEdit { text, uploaded }))
    }
}
