use super::defaults::DEFAULT_CONFIG_TOML;
use super::error::ConfigError;
use super::types::{Config, ConfigDocument};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// The default config file path (~/.claude/statusline.toml)
    pub fn default_path() -> PathBuf {
        if let Some(home) = dirs::home_dir() {
            home.join(".claude").join("statusline.toml")
        } else {
            PathBuf::from(".claude/statusline.toml")
        }
    }

    /// Built-in defaults layered with the file at `path` (or the default path).
    /// A missing file leaves the defaults in place.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        Self::load_from_path(&path)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let doc = Self::parse_document(&content, path)?;

        let mut config = Config::default();
        config.layer(doc);
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse_document(content: &str, path: &Path) -> Result<ConfigDocument, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.message().to_string(),
        })
    }

    /// Write the commented default document; refuses to overwrite unless `force`
    pub fn init(path: &Path, force: bool) -> io::Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG_TOML)?;
        Ok(true)
    }
}

impl Config {
    /// Parse one TOML layer on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Config, ConfigError> {
        let doc = ConfigLoader::parse_document(content, Path::new("<inline>"))?;
        let mut config = Config::default();
        config.layer(doc);
        Ok(config)
    }

    /// The effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
