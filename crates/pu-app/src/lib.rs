//! pasteup application layer
//!
//! Use cases that turn a paste/drop payload into uploaded objects and a snippet,
//! plus the undo ledger shared by every run.

pub mod deps;
pub mod undo_ledger;
pub mod usecases;

pub use deps::AppDeps;
pub use undo_ledger::UndoLedger;
pub use usecases::paste_upload::{PasteContext, PasteEdit, PasteUploadPipeline};
pub use usecases::test_connection::TestConnection;
pub use usecases::undo_upload::{UndoResult, UndoUpload};

#[cfg(test)]
pub(crate) mod test_support;
