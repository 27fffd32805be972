mod defaults;
pub mod model;
mod validation;

pub use model::*;
pub use validation::ConfigError;
