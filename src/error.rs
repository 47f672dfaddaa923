use crate::config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
}

impl Error {
    /// One-line message for stderr; configuration errors lead with their key path
    pub fn pretty(&self) -> String {
        match self {
            Error::Config(err) => err.pretty(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
