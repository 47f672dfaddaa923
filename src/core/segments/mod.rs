pub mod context;
pub mod cost;
pub mod events;
pub mod git;
pub mod model;
pub mod version;
pub mod workspace;

use crate::config::RenderContext;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

/// Data provider bound to a module type.
///
/// Collectors may block (subprocesses, file reads); the generator runs each
/// one on the blocking pool under a deadline.
pub trait Collector: Send + Sync {
    /// `Ok(None)` when the module has nothing to show for this context
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError>;
}

impl<F> Collector for F
where
    F: Fn(&RenderContext) -> Result<Option<SegmentData>, CollectError> + Send + Sync,
{
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        self(context)
    }
}

/// Wrap a closure as a shareable collector
pub fn collector_fn<F>(f: F) -> Arc<dyn Collector>
where
    F: Fn(&RenderContext) -> Result<Option<SegmentData>, CollectError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("unreadable output from {command}: {message}")]
    Output {
        command: &'static str,
        message: String,
    },
    #[error("could not encode module data: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

/// Fields a collector hands to the template, exposed under the module type's name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentData {
    fields: Map<String, Value>,
}

impl SegmentData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Take every field of a serializable struct
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, CollectError> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(CollectError::Other(format!(
                "module data must be an object, got {}",
                other
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

// Re-export all collector types
pub use context::ContextSegment;
pub use cost::CostSegment;
pub use events::EventsSegment;
pub use git::GitSegment;
pub use model::ModelSegment;
pub use version::VersionSegment;
pub use workspace::WorkspaceSegment;
