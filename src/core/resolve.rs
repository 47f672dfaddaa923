//! Theme, variable, format and color resolution for one instance.
//!
//! Every rule here is a pure function of the configuration and the registry;
//! a [`ModuleInstance`] is derived fresh and never mutated.

use crate::config::{Config, ConfigError, InstanceOverride};
use crate::registry::{ModuleRegistry, ModuleType, Variables};
use crate::template::{Style, Template};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ModuleInstance {
    pub key: String,
    pub module_type: Arc<ModuleType>,
    pub theme: String,
    pub variables: Variables,
    pub template: Template,
    pub color: Option<Style>,
    pub timeout: Duration,
}

impl ModuleInstance {
    pub fn format(&self) -> &str {
        self.template.source()
    }
}

/// The instance's explicit `type`, or the key itself
pub fn module_type_name<'a>(key: &'a str, over: Option<&'a InstanceOverride>) -> &'a str {
    over.and_then(|o| o.module_type.as_deref()).unwrap_or(key)
}

pub fn effective_theme<'a>(over: Option<&'a InstanceOverride>, config: &'a Config) -> &'a str {
    over.and_then(|o| o.theme.as_deref())
        .unwrap_or(&config.theme)
}

/// Built-in theme variables with the instance's overrides for that theme merged per key
pub fn effective_variables(
    builtin: &Variables,
    over: Option<&InstanceOverride>,
    theme: &str,
) -> Variables {
    let mut variables = builtin.clone();
    if let Some(overrides) = over.and_then(|o| o.themes.get(theme)) {
        variables.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    variables
}

/// Literal `format` override, then the theme's `format`, then the type default
pub fn effective_format<'a>(
    over: Option<&'a InstanceOverride>,
    variables: &'a Variables,
    module_type: &'a ModuleType,
) -> &'a str {
    over.and_then(|o| o.format.as_deref())
        .or_else(|| variables.get("format").map(String::as_str))
        .unwrap_or(&module_type.default_format)
}

/// Instance `color`, then the theme's `color`; an empty string means no color
pub fn effective_color<'a>(
    over: Option<&'a InstanceOverride>,
    variables: &'a Variables,
) -> Option<&'a str> {
    over.and_then(|o| o.color.as_deref())
        .or_else(|| variables.get("color").map(String::as_str))
        .filter(|color| !color.is_empty())
}

pub fn resolve_instance(
    key: &str,
    config: &Config,
    registry: &ModuleRegistry,
) -> Result<ModuleInstance, ConfigError> {
    let over = config.modules.get(key);
    let type_name = module_type_name(key, over);
    let module_type = registry
        .get(type_name)
        .ok_or_else(|| ConfigError::UnknownModuleType {
            path: if over.and_then(|o| o.module_type.as_ref()).is_some() {
                format!("modules.{}.type", key)
            } else {
                "enabled".to_string()
            },
            key: key.to_string(),
            module_type: type_name.to_string(),
        })?;

    let theme = effective_theme(over, config);
    let builtin = module_type
        .theme(theme)
        .ok_or_else(|| ConfigError::UnknownTheme {
            path: if over.and_then(|o| o.theme.as_ref()).is_some() {
                format!("modules.{}.theme", key)
            } else {
                "theme".to_string()
            },
            key: key.to_string(),
            module_type: module_type.name.clone(),
            theme: theme.to_string(),
        })?;

    let variables = effective_variables(builtin.variables(), over, theme);

    let format = effective_format(over, &variables, module_type);
    let template = Template::compile(format).map_err(|source| ConfigError::Template {
        path: format_path(key, over, &variables, theme),
        source,
    })?;

    let color = match effective_color(over, &variables) {
        Some(spec) => Some(Style::parse(spec).ok_or_else(|| ConfigError::InvalidColor {
            path: if over.and_then(|o| o.color.as_ref()).is_some() {
                format!("modules.{}.color", key)
            } else {
                format!("modules.{}.themes.{}.color", key, theme)
            },
            color: spec.to_string(),
        })?),
        None => None,
    };

    let timeout_ms = over
        .and_then(|o| o.timeout_ms)
        .unwrap_or(config.timeout_ms);

    Ok(ModuleInstance {
        key: key.to_string(),
        module_type: Arc::clone(module_type),
        theme: theme.to_string(),
        template,
        variables,
        color,
        timeout: Duration::from_millis(timeout_ms),
    })
}

/// Key path of whichever layer supplied the effective format
fn format_path(
    key: &str,
    over: Option<&InstanceOverride>,
    variables: &Variables,
    theme: &str,
) -> String {
    if over.and_then(|o| o.format.as_ref()).is_some() {
        format!("modules.{}.format", key)
    } else if variables.contains_key("format") {
        format!("modules.{}.themes.{}.format", key, theme)
    } else {
        format!("modules.{}", key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Theme;

    fn config(source: &str) -> Config {
        Config::from_toml(source).unwrap()
    }

    fn resolve(source: &str, key: &str) -> Result<ModuleInstance, ConfigError> {
        resolve_instance(key, &config(source), &ModuleRegistry::builtin())
    }

    #[test]
    fn test_instance_theme_beats_global() {
        let cfg = config("theme = 'ascii'\n[modules.model]\ntheme = 'emoji'");
        assert_eq!(effective_theme(cfg.modules.get("model"), &cfg), "emoji");
        assert_eq!(effective_theme(cfg.modules.get("workspace"), &cfg), "ascii");
    }

    #[test]
    fn test_variable_override_keeps_other_keys() {
        let builtin = Theme::new("\u{ee0d} ").with_color("cyan");
        let cfg = config("[modules.model.themes.nerd]\nlabel = 'M '");
        let vars = effective_variables(builtin.variables(), cfg.modules.get("model"), "nerd");
        assert_eq!(vars["label"], "M ");
        assert_eq!(vars["color"], "cyan");

        // Overrides for another theme do not apply
        let vars = effective_variables(builtin.variables(), cfg.modules.get("model"), "ascii");
        assert_eq!(vars["label"], "\u{ee0d} ");
    }

    #[test]
    fn test_format_precedence() {
        let registry = ModuleRegistry::builtin();
        let model = registry.get("model").unwrap();
        let cfg = config(
            "[modules.model]\nformat = 'literal'\n[modules.model.themes.nerd]\nformat = 'themed'",
        );
        let over = cfg.modules.get("model");
        let vars = effective_variables(model.theme("nerd").unwrap().variables(), over, "nerd");
        assert_eq!(effective_format(over, &vars, model), "literal");

        let mut without_literal = over.cloned().unwrap();
        without_literal.format = None;
        assert_eq!(effective_format(Some(&without_literal), &vars, model), "themed");

        let plain = Variables::new();
        assert_eq!(
            effective_format(Some(&without_literal), &plain, model),
            model.default_format
        );
    }

    #[test]
    fn test_color_precedence() {
        let mut vars = Variables::new();
        vars.insert("color".into(), "cyan".into());
        let over = InstanceOverride {
            color: Some("red".into()),
            ..InstanceOverride::default()
        };
        assert_eq!(effective_color(Some(&over), &vars), Some("red"));
        assert_eq!(effective_color(None, &vars), Some("cyan"));

        let cleared = InstanceOverride {
            color: Some(String::new()),
            ..InstanceOverride::default()
        };
        assert_eq!(effective_color(Some(&cleared), &vars), None);
    }

    #[test]
    fn test_alias_resolves_to_its_type() {
        let instance = resolve("[modules.branch]\ntype = 'git'\ncolor = 'red'", "branch").unwrap();
        assert_eq!(instance.module_type.name, "git");
        assert_eq!(instance.key, "branch");
        assert_eq!(instance.color, Style::parse("red"));
    }

    #[test]
    fn test_builtin_context_bar_alias() {
        let instance = resolve("", "context_bar").unwrap();
        assert_eq!(instance.module_type.name, "context");
        assert!(instance.format().contains("progress_bar"));
    }

    #[test]
    fn test_unknown_type_names_key() {
        let err = resolve("[modules.foo]\ntype = 'nonexistent'", "foo").unwrap_err();
        assert_eq!(err.key_path(), "modules.foo.type");
        assert!(err.to_string().contains("'foo'"));

        let err = resolve("", "nonexistent").unwrap_err();
        assert_eq!(err.key_path(), "enabled");
    }

    #[test]
    fn test_unknown_theme_names_instance_and_theme() {
        let err = resolve("[modules.model]\ntheme = 'solarized'", "model").unwrap_err();
        assert_eq!(err.key_path(), "modules.model.theme");
        let message = err.to_string();
        assert!(message.contains("'model'") && message.contains("'solarized'"));
    }

    #[test]
    fn test_bad_theme_format_reports_path() {
        let err = resolve("[modules.model.themes.nerd]\nformat = '{{ x | nope }}'", "model")
            .unwrap_err();
        assert_eq!(err.key_path(), "modules.model.themes.nerd.format");
    }

    #[test]
    fn test_invalid_color() {
        let err = resolve("[modules.model]\ncolor = 'chartreuse'", "model").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidColor {
                path: "modules.model.color".into(),
                color: "chartreuse".into()
            }
        );
    }

    #[test]
    fn test_instance_timeout() {
        let cfg = "timeout_ms = 200\n[modules.git]\ntimeout_ms = 50";
        assert_eq!(resolve(cfg, "git").unwrap().timeout, Duration::from_millis(50));
        assert_eq!(resolve(cfg, "model").unwrap().timeout, Duration::from_millis(200));
    }
}
