use super::resolve::ModuleInstance;
use super::segments::SegmentData;
use crate::config::{Config, ConfigError, RenderContext};
use crate::registry::ModuleRegistry;
use crate::template::{paint, plain_text, Span, Style};
use crate::utils::runtime::block_on;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// One instance's output for a render
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Not applicable, failed or timed out
    Absent,
    Rendered(Vec<Span>),
}

/// Renders status lines for one validated configuration.
///
/// Construction validates the configuration and resolves every enabled
/// instance; rendering only reads that state, so one generator can serve
/// concurrent renders.
#[derive(Debug, Clone)]
pub struct StatusLineGenerator {
    config: Arc<Config>,
    instances: Vec<ModuleInstance>,
}

impl StatusLineGenerator {
    pub fn new(registry: &ModuleRegistry, config: Config) -> Result<Self, ConfigError> {
        let instances = config.validate(registry)?;
        Ok(Self {
            config: Arc::new(config),
            instances,
        })
    }

    /// Blocking render on the shared runtime
    pub fn generate(&self, context: RenderContext) -> String {
        block_on(self.render(Arc::new(context)))
    }

    pub async fn render(&self, context: Arc<RenderContext>) -> String {
        let segments = self.collect_segments(context).await;
        assemble_line(&segments, &self.config.separator, self.config.color)
    }

    /// Run every collector concurrently and render the instances in order.
    ///
    /// Each collector gets the earlier of its own deadline and the render
    /// deadline; one that misses it is abandoned and its segment is absent.
    pub async fn collect_segments(&self, context: Arc<RenderContext>) -> Vec<Segment> {
        let started = Instant::now();
        let render_deadline = started + Duration::from_millis(self.config.render_timeout_ms);

        let handles: Vec<_> = self
            .instances
            .iter()
            .map(|instance| {
                let collector = Arc::clone(&instance.module_type.collector);
                let context = Arc::clone(&context);
                tokio::task::spawn_blocking(move || collector.collect(&context))
            })
            .collect();

        let base = context.template_context();
        let mut segments = Vec::with_capacity(handles.len());

        for (instance, mut handle) in self.instances.iter().zip(handles) {
            let deadline = (started + instance.timeout).min(render_deadline);
            let outcome = timeout_at(deadline, &mut handle).await;
            let segment = match outcome {
                Err(_) => {
                    handle.abort();
                    tracing::debug!(instance = %instance.key, "collector timed out");
                    Segment::Absent
                }
                Ok(Err(err)) => {
                    tracing::debug!(instance = %instance.key, error = %err, "collector panicked");
                    Segment::Absent
                }
                Ok(Ok(Err(err))) => {
                    tracing::debug!(instance = %instance.key, error = %err, "collector failed");
                    Segment::Absent
                }
                Ok(Ok(Ok(None))) => {
                    tracing::debug!(instance = %instance.key, "not applicable");
                    Segment::Absent
                }
                Ok(Ok(Ok(Some(data)))) => {
                    render_instance(instance, &base, data, self.config.color)
                }
            };
            segments.push(segment);
        }

        segments
    }
}

/// Evaluate an instance's template against the render context, its theme
/// variables (as `theme`) and its module data (under the module type name)
pub fn render_instance(
    instance: &ModuleInstance,
    base: &Map<String, Value>,
    data: SegmentData,
    color: bool,
) -> Segment {
    let mut context = base.clone();
    let theme = instance
        .variables
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    context.insert("theme".to_string(), Value::Object(theme));
    context.insert(instance.module_type.name.clone(), data.into_value());

    let style = match instance.color {
        Some(style) if color => style,
        _ => Style::default(),
    };
    let rendered = instance
        .template
        .render_styled(&Value::Object(context), style);
    for warning in &rendered.warnings {
        tracing::warn!(instance = %instance.key, "{}", warning);
    }

    if rendered.is_empty() {
        return Segment::Absent;
    }
    Segment::Rendered(rendered.spans)
}

/// Join rendered segments; absent and empty ones leave no separator behind
pub fn assemble_line(segments: &[Segment], separator: &str, color: bool) -> String {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Rendered(spans) if !plain_text(spans).is_empty() => Some(paint(spans, color)),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(separator)
}
