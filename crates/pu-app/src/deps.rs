//! # Application Dependencies / 应用依赖
//!
//! Dependency grouping for constructing the pipeline and its actions.
//!
//! **Note**: This is NOT a Builder pattern. No build steps, no default
//! values, no hidden logic; just parameter grouping.

use std::sync::Arc;

use pu_core::ports::*;

use crate::UndoLedger;

/// All dependencies are required.
#[derive(Clone)]
pub struct AppDeps {
    // Storage backend / 存储后端
    pub uploader: Arc<dyn UploaderPort>,

    // Input / 输入
    pub file_system: Arc<dyn FileSystemPort>,

    // Settings / 设置
    pub settings: Arc<dyn SettingsPort>,

    // UI / 界面
    pub ui: Arc<dyn UserInteractionPort>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,

    // Process-wide undo history / 撤销历史
    pub ledger: Arc<UndoLedger>,
}
