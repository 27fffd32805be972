pub mod app_dirs;
mod local_fs;

pub use local_fs::TokioFileSystem;
