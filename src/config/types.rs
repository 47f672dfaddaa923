use crate::registry::Variables;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Effective configuration after all layers are applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub theme: String,
    pub color: bool,
    pub separator: String,
    pub enabled: Vec<String>,
    /// Default bound on each module's data collection
    pub timeout_ms: u64,
    /// Bound on the whole render
    pub render_timeout_ms: u64,
    pub modules: BTreeMap<String, InstanceOverride>,
}

/// Per-instance settings from `[modules.<key>]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstanceOverride {
    /// Module type backing this instance; the key itself when absent
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Variable overrides keyed by theme name
    #[serde(
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_theme_tables"
    )]
    pub themes: BTreeMap<String, Variables>,
}

/// One configuration layer as written in TOML; absent keys leave lower layers alone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDocument {
    pub theme: Option<String>,
    pub color: Option<bool>,
    pub separator: Option<String>,
    pub enabled: Option<Vec<String>>,
    pub timeout_ms: Option<u64>,
    pub render_timeout_ms: Option<u64>,
    pub modules: BTreeMap<String, InstanceOverride>,
}

/// Overrides taken from `render`/`preview` flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOverrides {
    pub theme: Option<String>,
    pub color: Option<bool>,
    pub modules: Option<Vec<String>>,
    pub separator: Option<String>,
}

impl InstanceOverride {
    /// Field-by-field merge; theme variables merge per key
    pub fn layer(&mut self, over: InstanceOverride) {
        if over.module_type.is_some() {
            self.module_type = over.module_type;
        }
        if over.color.is_some() {
            self.color = over.color;
        }
        if over.theme.is_some() {
            self.theme = over.theme;
        }
        if over.format.is_some() {
            self.format = over.format;
        }
        if over.timeout_ms.is_some() {
            self.timeout_ms = over.timeout_ms;
        }
        for (theme, variables) in over.themes {
            self.themes.entry(theme).or_default().extend(variables);
        }
    }
}

impl Config {
    pub fn layer(&mut self, doc: ConfigDocument) {
        if let Some(theme) = doc.theme {
            self.theme = theme;
        }
        if let Some(color) = doc.color {
            self.color = color;
        }
        if let Some(separator) = doc.separator {
            self.separator = separator;
        }
        if let Some(enabled) = doc.enabled {
            self.enabled = enabled;
        }
        if let Some(timeout_ms) = doc.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(render_timeout_ms) = doc.render_timeout_ms {
            self.render_timeout_ms = render_timeout_ms;
        }
        for (key, over) in doc.modules {
            match self.modules.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(over);
                }
                Entry::Occupied(mut entry) => entry.get_mut().layer(over),
            }
        }
    }

    /// Apply command-line flags, the topmost layer
    pub fn apply_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(theme) = &overrides.theme {
            self.theme = theme.clone();
            // A forced theme applies to every instance
            for instance in self.modules.values_mut() {
                instance.theme = None;
            }
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        if let Some(modules) = &overrides.modules {
            self.enabled = modules.clone();
        }
        if let Some(separator) = &overrides.separator {
            self.separator = separator.clone();
        }
    }
}

/// Theme variables may be any TOML scalar; templates see them as strings
fn deserialize_theme_tables<'de, D>(deserializer: D) -> Result<BTreeMap<String, Variables>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, BTreeMap<String, toml::Value>>::deserialize(deserializer)?;
    let mut tables = BTreeMap::new();

    for (theme, values) in raw {
        let mut variables = Variables::new();
        for (name, value) in values {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                toml::Value::Datetime(d) => d.to_string(),
                toml::Value::Array(_) | toml::Value::Table(_) => {
                    return Err(de::Error::custom(format!(
                        "theme variable '{}.{}' must be a string, number or boolean",
                        theme, name
                    )))
                }
            };
            variables.insert(name, text);
        }
        tables.insert(theme, variables);
    }

    Ok(tables)
}
