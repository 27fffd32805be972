//! # Dependency Injection / 依赖注入模块
//!
//! The only place that knows pu-infra, pu-app and the terminal adapters at
//! the same time. Assembly only, no decisions.

use std::sync::Arc;

use anyhow::Result;
use pu_app::{AppDeps, UndoLedger};
use pu_core::ports::{SettingsPort, UserInteractionPort};
use pu_core::Settings;
use pu_infra::{build_uploader, SystemClock, TokioFileSystem};

/// Build every port implementation for one process.
///
/// The backend is taken from `settings` once; the undo ledger lives as long
/// as the returned dependencies.
pub fn wire_dependencies(
    settings: &Settings,
    settings_port: Arc<dyn SettingsPort>,
    ui: Arc<dyn UserInteractionPort>,
) -> Result<AppDeps> {
    Ok(AppDeps {
        uploader: build_uploader(&settings.uploader)?,
        file_system: Arc::new(TokioFileSystem::new()),
        settings: settings_port,
        ui,
        clock: Arc::new(SystemClock),
        ledger: Arc::new(UndoLedger::new(settings.undo_history_size)),
    })
}
