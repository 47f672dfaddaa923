pub mod defaults;
pub mod error;
pub mod input;
pub mod loader;
pub mod types;
mod validate;

pub use defaults::{DEFAULT_CONFIG_TOML, DEFAULT_RENDER_TIMEOUT_MS, DEFAULT_TIMEOUT_MS};
pub use error::ConfigError;
pub use input::*;
pub use loader::ConfigLoader;
pub use types::*;
