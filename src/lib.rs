pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod registry;
pub mod template;
pub mod utils;

pub use error::{Error, Result};
