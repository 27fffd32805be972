use std::sync::Arc;

use anyhow::Result;
use pu_core::ports::{ConnectionCheck, NotificationLevel, UploaderPort, UserInteractionPort};
use tracing::{info, warn};

/// Round-trips a test object through the configured backend and tells the user how it went.
pub struct TestConnection {
    uploader: Arc<dyn UploaderPort>,
    ui: Arc<dyn UserInteractionPort>,
}

impl TestConnection {
    pub fn new(uploader: Arc<dyn UploaderPort>, ui: Arc<dyn UserInteractionPort>) -> Self {
        Self { uploader, ui }
    }

    #[tracing::instrument(
        name = "usecase.test_connection.execute",
        skip_all,
        fields(backend = self.uploader.backend())
    )]
    pub async fn execute(&self) -> Result<ConnectionCheck> {
        let backend = self.uploader.backend();

        match self.uploader.test_connection().await {
            Ok(ConnectionCheck::Ok) => {
                info!("connection test passed");
                self.ui.notify(
                    NotificationLevel::Info,
                    &format!("Connection to the {backend} backend works"),
                );
                Ok(ConnectionCheck::Ok)
            }
            Ok(ConnectionCheck::UploadedButNotDeleted { object, reason }) => {
                warn!(%object, %reason, "test object uploaded but not deleted");
                self.ui.notify(
                    NotificationLevel::Warning,
                    &format!(
                        "Upload to the {backend} backend works, but deleting {object} failed: {reason}"
                    ),
                );
                Ok(ConnectionCheck::UploadedButNotDeleted { object, reason })
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "connection test failed");
                self.ui.notify(
                    NotificationLevel::Error,
                    &format!("Connection to the {backend} backend failed: {err:#}"),
                );
                Err(err)
            }
        }
    }
}
