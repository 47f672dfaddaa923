use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems; each names the key path it was found at
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {message}")]
    Read { path: PathBuf, message: String },

    #[error("invalid config document: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("instance '{key}' is enabled more than once")]
    DuplicateInstance { path: String, key: String },

    #[error("instance '{key}' refers to unknown module type '{module_type}'")]
    UnknownModuleType {
        path: String,
        key: String,
        module_type: String,
    },

    #[error("unknown theme '{theme}'")]
    UnknownGlobalTheme { theme: String },

    #[error("instance '{key}' uses theme '{theme}', which module type '{module_type}' does not define")]
    UnknownTheme {
        path: String,
        key: String,
        module_type: String,
        theme: String,
    },

    #[error("invalid color '{color}'")]
    InvalidColor { path: String, color: String },

    #[error("invalid template: {source}")]
    Template {
        path: String,
        #[source]
        source: TemplateError,
    },
}

impl ConfigError {
    /// Where in the configuration the problem is
    pub fn key_path(&self) -> String {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => {
                path.display().to_string()
            }
            ConfigError::UnknownGlobalTheme { .. } => "theme".to_string(),
            ConfigError::DuplicateInstance { path, .. }
            | ConfigError::UnknownModuleType { path, .. }
            | ConfigError::UnknownTheme { path, .. }
            | ConfigError::InvalidColor { path, .. }
            | ConfigError::Template { path, .. } => path.clone(),
        }
    }

    /// `<key path>: <reason>`
    pub fn pretty(&self) -> String {
        format!("{}: {}", self.key_path(), self)
    }
}
