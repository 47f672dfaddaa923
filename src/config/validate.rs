use super::error::ConfigError;
use super::types::Config;
use crate::core::resolve::{module_type_name, resolve_instance, ModuleInstance};
use crate::registry::ModuleRegistry;
use crate::template::{Style, Template};
use std::collections::HashSet;

impl Config {
    /// Check the configuration against the registry and resolve every enabled
    /// instance, in order. The first problem found is returned.
    pub fn validate(&self, registry: &ModuleRegistry) -> Result<Vec<ModuleInstance>, ConfigError> {
        if !registry.has_theme(&self.theme) {
            return Err(ConfigError::UnknownGlobalTheme {
                theme: self.theme.clone(),
            });
        }

        let mut seen = HashSet::new();
        for (index, key) in self.enabled.iter().enumerate() {
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateInstance {
                    path: format!("enabled[{}]", index),
                    key: key.clone(),
                });
            }
        }

        let mut instances = Vec::with_capacity(self.enabled.len());
        for key in &self.enabled {
            self.check_theme_tables(key, registry)?;
            instances.push(resolve_instance(key, self, registry)?);
        }
        Ok(instances)
    }

    /// Per-theme tables are checked even for themes not currently active
    fn check_theme_tables(&self, key: &str, registry: &ModuleRegistry) -> Result<(), ConfigError> {
        let Some(over) = self.modules.get(key) else {
            return Ok(());
        };
        // An unknown type is reported by resolution
        let Some(module_type) = registry.get(module_type_name(key, Some(over))) else {
            return Ok(());
        };

        for (theme, variables) in &over.themes {
            if module_type.theme(theme).is_none() {
                return Err(ConfigError::UnknownTheme {
                    path: format!("modules.{}.themes.{}", key, theme),
                    key: key.to_string(),
                    module_type: module_type.name.clone(),
                    theme: theme.clone(),
                });
            }
            if let Some(format) = variables.get("format") {
                Template::compile(format).map_err(|source| ConfigError::Template {
                    path: format!("modules.{}.themes.{}.format", key, theme),
                    source,
                })?;
            }
            if let Some(color) = variables.get("color").filter(|c| !c.is_empty()) {
                if Style::parse(color).is_none() {
                    return Err(ConfigError::InvalidColor {
                        path: format!("modules.{}.themes.{}.color", key, theme),
                        color: color.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
