//! Adapters behind the pu-core ports: storage backends, the local file
//! system, the system clock and the settings file.

pub mod fs;
pub mod local;
pub mod s3;
pub mod settings;
pub mod time;

use std::sync::Arc;

use anyhow::Result;
use pu_core::ports::UploaderPort;
use pu_core::UploaderSettings;

pub use fs::TokioFileSystem;
pub use local::LocalUploader;
pub use s3::S3Uploader;
pub use settings::FileSettingsRepository;
pub use time::SystemClock;

/// Backend selected by configuration.
///
/// Parameters are validated on every upload, so an incomplete configuration
/// still builds and fails with a readable error at first use.
pub fn build_uploader(settings: &UploaderSettings) -> Result<Arc<dyn UploaderPort>> {
    let uploader: Arc<dyn UploaderPort> = match settings {
        UploaderSettings::S3(s3) => Arc::new(S3Uploader::new(s3.clone())?),
        UploaderSettings::Local(local) => Arc::new(LocalUploader::new(local.clone())),
    };
    Ok(uploader)
}
