pub mod file_repo;

pub use file_repo::{default_settings_path, FileSettingsRepository};
