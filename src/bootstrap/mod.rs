pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{init_config, load_settings, resolve_config_path};
pub use wiring::wire_dependencies;
