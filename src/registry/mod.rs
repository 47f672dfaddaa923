//! Catalogue of module types.
//!
//! A module type pairs a data collector with a default format template and a
//! table of built-in themes. Config instances refer to types by name, so one
//! type can back several independently configured instances.

mod builtin;

use crate::core::segments::Collector;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Theme variables, e.g. `label`, `format`, `color`
pub type Variables = BTreeMap<String, String>;

pub const DEFAULT_THEME: &str = "nerd";
pub const BUILTIN_THEMES: [&str; 4] = ["nerd", "ascii", "emoji", "minimal"];

/// Built-in variables of one theme for one module type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    variables: Variables,
}

impl Theme {
    pub fn new(label: &str) -> Self {
        let mut variables = Variables::new();
        variables.insert("label".to_string(), label.to_string());
        Self { variables }
    }

    pub fn with_format(self, format: &str) -> Self {
        self.with("format", format)
    }

    pub fn with_color(self, color: &str) -> Self {
        self.with("color", color)
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.variables.insert(key.to_string(), value.to_string());
        self
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }
}

/// A data field a module type exposes to templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub description: &'static str,
}

pub struct ModuleType {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
    pub default_format: String,
    pub themes: BTreeMap<String, Theme>,
    pub collector: Arc<dyn Collector>,
}

impl ModuleType {
    pub fn new(
        name: &str,
        description: &str,
        default_format: &str,
        collector: Arc<dyn Collector>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            fields: Vec::new(),
            default_format: default_format.to_string(),
            themes: BTreeMap::new(),
            collector,
        }
    }

    pub fn with_field(mut self, name: &'static str, description: &'static str) -> Self {
        self.fields.push(Field { name, description });
        self
    }

    pub fn with_theme(mut self, name: &str, theme: Theme) -> Self {
        self.themes.insert(name.to_string(), theme);
        self
    }

    pub fn theme(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }
}

impl fmt::Debug for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleType")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("default_format", &self.default_format)
            .field("themes", &self.themes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    types: BTreeMap<String, Arc<ModuleType>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in module type
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for module_type in builtin::module_types() {
            registry.register(module_type);
        }
        registry
    }

    /// Add a type, replacing any earlier type of the same name
    pub fn register(&mut self, module_type: ModuleType) {
        self.types
            .insert(module_type.name.clone(), Arc::new(module_type));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModuleType>> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<ModuleType>> {
        self.types.values()
    }

    /// Whether any registered type defines `theme`
    pub fn has_theme(&self, theme: &str) -> bool {
        self.types.values().any(|t| t.themes.contains_key(theme))
    }
}
