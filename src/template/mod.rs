//! Format-template language.
//!
//! A template is literal text with `{{ path | filter(args) }}` references and
//! `[color]...[/color]` markup:
//!
//! ```text
//! [cyan]{{ theme.label }}{{ model.display_name }}[/cyan] {{ cost.total_cost_usd | format_cost }}
//! ```
//!
//! Templates are compiled once (tokenizer + parser), which is where unknown
//! filters and malformed markup are reported. Rendering never fails: an
//! undefined reference renders as an empty string and is reported as a
//! [`RenderWarning`].

mod eval;
pub mod filters;
mod lexer;
mod parser;
pub mod style;

pub use eval::{RenderWarning, Rendered};
pub use filters::Filter;
pub use style::{paint, plain_text, Color, Span, Style};

use parser::Node;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unterminated '{{{{' at offset {offset}")]
    UnterminatedExpression { offset: usize },
    #[error("unterminated string literal at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        offset: usize,
        found: String,
        expected: &'static str,
    },
    #[error("unexpected end of template, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unknown filter '{name}' at offset {offset}")]
    UnknownFilter { offset: usize, name: String },
    #[error("filter '{filter}' at offset {offset} {message}")]
    InvalidArguments {
        offset: usize,
        filter: &'static str,
        message: String,
    },
    #[error("closing tag [/{tag}] at offset {offset} has no matching open tag")]
    UnbalancedTag { offset: usize, tag: String },
}

/// A compiled format template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    nodes: Vec<Node>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let tokens = lexer::tokenize(source)?;
        let nodes = parser::parse(tokens)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against a JSON object context, with `base` as the outermost style
    pub fn render_styled(&self, context: &Value, base: Style) -> Rendered {
        let mut out = Rendered::default();
        eval::render_nodes(&self.nodes, context, base, &mut out);
        out
    }

    pub fn render(&self, context: &Value) -> Rendered {
        self.render_styled(context, Style::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> Value {
        json!({
            "model": { "display_name": "Opus 4.5", "id": "claude-opus-4-5" },
            "workspace": { "current_dir": "/home/user/my-project" },
            "context": { "used_percentage": 42.4 },
            "theme": { "label": "Model: " },
        })
    }

    fn render_plain(source: &str) -> (String, Vec<RenderWarning>) {
        let rendered = Template::compile(source).unwrap().render(&context());
        (plain_text(&rendered.spans), rendered.warnings)
    }

    #[test]
    fn test_substitutes_variables() {
        let (text, warnings) = render_plain("{{ theme.label }}{{ model.display_name }}");
        assert_eq!(text, "Model: Opus 4.5");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_filters_apply_left_to_right() {
        let (text, _) = render_plain("{{ workspace.current_dir | basename | upper | truncate(4) }}");
        assert_eq!(text, "MY-P…");
    }

    #[test]
    fn test_undefined_variable_is_empty_with_warning() {
        let (text, warnings) = render_plain("a{{ git.branch }}b");
        assert_eq!(text, "ab");
        assert_eq!(
            warnings,
            vec![RenderWarning::UndefinedVariable("git.branch".into())]
        );
    }

    #[test]
    fn test_default_filter_silences_undefined() {
        let (text, warnings) = render_plain("{{ git.branch | default('none') }}");
        assert_eq!(text, "none");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_filter_failure_is_warning() {
        let (text, warnings) = render_plain("[{{ model.id | format_percent }}]");
        assert_eq!(text, "[]");
        assert!(matches!(
            warnings[0],
            RenderWarning::FilterFailed { filter: "format_percent", .. }
        ));
    }

    #[test]
    fn test_color_markup_produces_styled_spans() {
        let rendered = Template::compile("[cyan]{{ model.display_name }}[/cyan]!")
            .unwrap()
            .render(&context());
        assert_eq!(rendered.spans[0].text, "Opus 4.5");
        assert_eq!(rendered.spans[0].style, Style::parse("cyan").unwrap());
        assert!(rendered.spans[1].style.is_plain());
    }

    #[test]
    fn test_base_style_under_markup() {
        let base = Style::parse("bold red").unwrap();
        let rendered = Template::compile("a[green]b[/green]")
            .unwrap()
            .render_styled(&context(), base);
        assert_eq!(rendered.spans[0].style, base);
        assert_eq!(rendered.spans[1].style.fg, Color::parse("green"));
        assert!(rendered.spans[1].style.bold);
    }

    #[test]
    fn test_data_is_never_markup() {
        let ctx = json!({ "git": { "branch": "[red]oops[/red]" } });
        let rendered = Template::compile("{{ git.branch }}").unwrap().render(&ctx);
        assert_eq!(plain_text(&rendered.spans), "[red]oops[/red]");
        assert!(rendered.spans[0].style.is_plain());
    }

    #[test]
    fn test_progress_bar_keeps_its_color() {
        let rendered = Template::compile("{{ context.used_percentage | progress_bar }}")
            .unwrap()
            .render(&context());
        assert_eq!(plain_text(&rendered.spans), "[████      ] 42%");
        assert_eq!(rendered.spans[0].style.fg, Color::parse("green"));
    }

    #[test]
    fn test_null_counts_as_undefined() {
        let ctx = json!({ "cost": null });
        let rendered = Template::compile("{{ cost.total_cost_usd }}")
            .unwrap()
            .render(&ctx);
        assert_eq!(rendered.warnings.len(), 1);
    }

    #[test]
    fn test_compile_errors_are_reported() {
        assert!(matches!(
            Template::compile("{{ model.id | nope }}"),
            Err(TemplateError::UnknownFilter { .. })
        ));
        assert!(matches!(
            Template::compile("{{ model.id"),
            Err(TemplateError::UnterminatedExpression { offset: 0 })
        ));
    }
}
