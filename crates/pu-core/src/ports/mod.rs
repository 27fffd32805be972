//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and the infrastructure
//! implementations (storage backends, file system, terminal or editor UI).
//! Use cases depend on these traits only, so every backend is interchangeable.

mod clock;
mod file_system;
pub mod settings;
pub mod uploader;
pub mod user_interaction;

pub use clock::ClockPort;
pub use file_system::{FileKind, FileStat, FileSystemPort};
pub use settings::SettingsPort;
pub use uploader::{
    ConnectionCheck, ObjectRef, TransferProgress, UndoAction, UploadControl, UploadError,
    UploadOutcome, UploaderPort,
};
pub use user_interaction::{NotificationLevel, ProgressIndicator, UserInteractionPort};
