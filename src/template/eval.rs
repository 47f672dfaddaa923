use super::filters::{value_to_string, Fragment};
use super::parser::{Expr, Head, Node};
use super::style::{Span, Style};
use serde_json::Value;
use thiserror::Error;

/// Non-fatal problem found while rendering a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderWarning {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),
    #[error("filter '{filter}' failed on '{variable}': {message}")]
    FilterFailed {
        filter: &'static str,
        variable: String,
        message: String,
    },
}

/// Output of evaluating a template against a context
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub spans: Vec<Span>,
    pub warnings: Vec<RenderWarning>,
}

impl Rendered {
    pub fn is_empty(&self) -> bool {
        self.spans.iter().all(|span| span.text.is_empty())
    }
}

pub fn render_nodes(nodes: &[Node], context: &Value, style: Style, out: &mut Rendered) {
    for node in nodes {
        match node {
            Node::Text(text) => out.spans.push(Span::new(text.clone(), style)),
            Node::Styled {
                style: inner,
                children,
            } => render_nodes(children, context, inner.over(style), out),
            Node::Expr(expr) => render_expr(expr, context, style, out),
        }
    }
}

fn render_expr(expr: &Expr, context: &Value, style: Style, out: &mut Rendered) {
    let mut fragment = match &expr.head {
        Head::Literal(value) => Fragment::Value(value.clone()),
        Head::Path(path) => lookup(context, path)
            .cloned()
            .map(Fragment::Value)
            .unwrap_or(Fragment::Missing),
    };

    for call in &expr.filters {
        match call.filter.apply(fragment, &call.args) {
            Ok(next) => fragment = next,
            Err(message) => {
                out.warnings.push(RenderWarning::FilterFailed {
                    filter: call.filter.name(),
                    variable: describe_head(&expr.head),
                    message,
                });
                return;
            }
        }
    }

    match fragment {
        Fragment::Missing => out
            .warnings
            .push(RenderWarning::UndefinedVariable(describe_head(&expr.head))),
        Fragment::Value(value) => out.spans.push(Span::new(value_to_string(&value), style)),
        Fragment::Styled(spans) => out.spans.extend(
            spans
                .into_iter()
                .map(|span| Span::new(span.text, span.style.over(style))),
        ),
    }
}

/// Walk a dotted path; JSON `null` counts as undefined
fn lookup<'a>(context: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = context;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    (!current.is_null()).then_some(current)
}

fn describe_head(head: &Head) -> String {
    match head {
        Head::Path(path) => path.join("."),
        Head::Literal(value) => value.to_string(),
    }
}
