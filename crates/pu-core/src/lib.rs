//! # pu-core
//!
//! Core domain models and business rules for pasteup.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Everything that touches the network, the file system or the user goes through a port.

// Public module exports
pub mod naming;
pub mod policy;
pub mod ports;
pub mod resource;
pub mod settings;
pub mod snippet;
pub mod transfer;

// Re-export commonly used types at the crate root
pub use resource::{IncompleteResource, Resource};
pub use settings::{
    MimeDetection, MultiFilePolicy, NamingMethod, PipelineOptions, Settings, SnippetTemplates,
    UploaderSettings,
};
pub use transfer::{DataTransfer, FileAttachment, TransferItem};
