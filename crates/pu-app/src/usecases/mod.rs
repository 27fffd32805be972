//! Business logic use cases
//!
//! One paste/drop runs through them in order:
//!
//! ExtractTransfer      → incomplete resources
//!         ↓
//! CompleteResources    → named, typed, deduplicated resources
//!         ↓
//! ApplyUploadPolicy    → same batch, or nothing
//!         ↓
//! UploadResources      → reference URIs (+ undo ledger entries)
//!         ↓
//! render_snippet       → text for the edit site
//!
//! `PasteUploadPipeline` chains them; `UndoUpload` and `TestConnection` are
//! the other externally invokable actions.

pub mod complete_resources;
pub mod extract_transfer;
pub mod paste_upload;
pub mod test_connection;
pub mod undo_upload;
pub mod upload_gate;
pub mod upload_resources;

pub use complete_resources::CompleteResources;
pub use extract_transfer::ExtractTransfer;
pub use upload_gate::ApplyUploadPolicy;
pub use upload_resources::{UploadResources, UploadedResource};
