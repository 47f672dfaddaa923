use super::filters::Filter;
use super::lexer::{Token, TokenKind};
use super::style::Style;
use super::TemplateError;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Expr(Expr),
    Styled { style: Style, children: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub head: Head,
    pub filters: Vec<FilterCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Head {
    /// Dotted lookup into the render context, e.g. `model.display_name`
    Path(Vec<String>),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub filter: Filter,
    pub args: Vec<Value>,
}

struct Frame {
    name: Option<String>,
    style: Style,
    children: Vec<Node>,
}

pub fn parse(tokens: Vec<Token>) -> Result<Vec<Node>, TemplateError> {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
    };
    parser.template()
}

struct Parser {
    tokens: std::iter::Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn template(&mut self) -> Result<Vec<Node>, TemplateError> {
        let mut stack = vec![Frame {
            name: None,
            style: Style::default(),
            children: Vec::new(),
        }];

        while let Some(token) = self.tokens.next() {
            match token.kind {
                TokenKind::Text(text) => push_node(&mut stack, Node::Text(text)),
                TokenKind::OpenTag { name, style } => stack.push(Frame {
                    name: Some(name),
                    style,
                    children: Vec::new(),
                }),
                TokenKind::CloseTag(name) => {
                    let matches = match (&name, stack.last()) {
                        (_, None) => false,
                        (None, Some(top)) => top.name.is_some(),
                        (Some(name), Some(top)) => top.name.as_deref() == Some(name.as_str()),
                    };
                    if stack.len() < 2 || !matches {
                        return Err(TemplateError::UnbalancedTag {
                            offset: token.offset,
                            tag: name.unwrap_or_default(),
                        });
                    }
                    close_frame(&mut stack);
                }
                TokenKind::ExprOpen => {
                    let expr = self.expr()?;
                    push_node(&mut stack, Node::Expr(expr));
                }
                other => {
                    return Err(TemplateError::UnexpectedToken {
                        offset: token.offset,
                        found: other.describe(),
                        expected: "text or '{{'",
                    })
                }
            }
        }

        // Unclosed tags extend to the end of the template
        while stack.len() > 1 {
            close_frame(&mut stack);
        }
        Ok(stack.pop().map(|root| root.children).unwrap_or_default())
    }

    fn next(&mut self, expected: &'static str) -> Result<Token, TemplateError> {
        self.tokens
            .next()
            .ok_or(TemplateError::UnexpectedEnd { expected })
    }

    fn expr(&mut self) -> Result<Expr, TemplateError> {
        let token = self.next("a variable or literal")?;
        let head = match token.kind {
            TokenKind::Ident(name) if name == "true" || name == "false" => {
                Head::Literal(Value::Bool(name == "true"))
            }
            TokenKind::Ident(name) => self.path(name)?,
            TokenKind::Str(_) | TokenKind::Int(_) | TokenKind::Float(_) => {
                Head::Literal(literal(token.kind))
            }
            other => {
                return Err(TemplateError::UnexpectedToken {
                    offset: token.offset,
                    found: other.describe(),
                    expected: "a variable or literal",
                })
            }
        };

        let mut filters = Vec::new();
        loop {
            let token = self.next("'|' or '}}'")?;
            match token.kind {
                TokenKind::ExprClose => break,
                TokenKind::Pipe => filters.push(self.filter_call()?),
                other => {
                    return Err(TemplateError::UnexpectedToken {
                        offset: token.offset,
                        found: other.describe(),
                        expected: "'|' or '}}'",
                    })
                }
            }
        }

        Ok(Expr { head, filters })
    }

    fn path(&mut self, first: String) -> Result<Head, TemplateError> {
        let mut segments = vec![first];
        while matches!(self.tokens.peek(), Some(Token { kind: TokenKind::Dot, .. })) {
            self.tokens.next();
            let token = self.next("a field name")?;
            match token.kind {
                TokenKind::Ident(name) => segments.push(name),
                TokenKind::Int(index) if index >= 0 => segments.push(index.to_string()),
                other => {
                    return Err(TemplateError::UnexpectedToken {
                        offset: token.offset,
                        found: other.describe(),
                        expected: "a field name",
                    })
                }
            }
        }
        Ok(Head::Path(segments))
    }

    fn filter_call(&mut self) -> Result<FilterCall, TemplateError> {
        let token = self.next("a filter name")?;
        let offset = token.offset;
        let name = match token.kind {
            TokenKind::Ident(name) => name,
            other => {
                return Err(TemplateError::UnexpectedToken {
                    offset,
                    found: other.describe(),
                    expected: "a filter name",
                })
            }
        };
        let filter =
            Filter::from_name(&name).ok_or(TemplateError::UnknownFilter { offset, name })?;

        let mut args = Vec::new();
        if matches!(self.tokens.peek(), Some(Token { kind: TokenKind::LParen, .. })) {
            self.tokens.next();
            loop {
                let token = self.next("an argument or ')'")?;
                match token.kind {
                    TokenKind::RParen if args.is_empty() => break,
                    TokenKind::Str(_) | TokenKind::Int(_) | TokenKind::Float(_) => {
                        args.push(literal(token.kind))
                    }
                    TokenKind::Ident(name) if name == "true" || name == "false" => {
                        args.push(Value::Bool(name == "true"))
                    }
                    other => {
                        return Err(TemplateError::UnexpectedToken {
                            offset: token.offset,
                            found: other.describe(),
                            expected: "a literal argument",
                        })
                    }
                }

                let token = self.next("',' or ')'")?;
                match token.kind {
                    TokenKind::Comma => continue,
                    TokenKind::RParen => break,
                    other => {
                        return Err(TemplateError::UnexpectedToken {
                            offset: token.offset,
                            found: other.describe(),
                            expected: "',' or ')'",
                        })
                    }
                }
            }
        }

        filter
            .check_args(&args)
            .map_err(|message| TemplateError::InvalidArguments {
                offset,
                filter: filter.name(),
                message,
            })?;

        Ok(FilterCall { filter, args })
    }
}

fn literal(kind: TokenKind) -> Value {
    match kind {
        TokenKind::Str(s) => Value::String(s),
        TokenKind::Int(n) => Value::from(n),
        TokenKind::Float(f) => Value::from(f),
        _ => Value::Null,
    }
}

fn push_node(stack: &mut [Frame], node: Node) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn close_frame(stack: &mut Vec<Frame>) {
    if let Some(frame) = stack.pop() {
        push_node(
            stack,
            Node::Styled {
                style: frame.style,
                children: frame.children,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parse_str(source: &str) -> Result<Vec<Node>, TemplateError> {
        parse(tokenize(source)?)
    }

    #[test]
    fn test_path_with_filters() {
        let nodes = parse_str("{{ cost.total_cost_usd | round(2) | default('0') }}").unwrap();
        let Node::Expr(expr) = &nodes[0] else {
            panic!("expected expression");
        };
        assert_eq!(
            expr.head,
            Head::Path(vec!["cost".into(), "total_cost_usd".into()])
        );
        assert_eq!(expr.filters.len(), 2);
        assert_eq!(expr.filters[0].filter, Filter::Round);
        assert_eq!(expr.filters[1].args, vec![Value::from("0")]);
    }

    #[test]
    fn test_nested_styles() {
        let nodes = parse_str("[bold][cyan]a[/cyan]b[/]").unwrap();
        let Node::Styled { children, .. } = &nodes[0] else {
            panic!("expected styled node");
        };
        assert!(matches!(children[0], Node::Styled { .. }));
        assert_eq!(children[1], Node::Text("b".into()));
    }

    #[test]
    fn test_unclosed_tag_runs_to_end() {
        let nodes = parse_str("[red]alert").unwrap();
        assert!(matches!(&nodes[0], Node::Styled { children, .. } if children.len() == 1));
    }

    #[test]
    fn test_mismatched_close_tag() {
        assert_eq!(
            parse_str("[cyan]x[/red]"),
            Err(TemplateError::UnbalancedTag {
                offset: 7,
                tag: "red".into()
            })
        );
        assert!(matches!(
            parse_str("x[/]"),
            Err(TemplateError::UnbalancedTag { offset: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_filter() {
        assert_eq!(
            parse_str("{{ model.id | shout }}"),
            Err(TemplateError::UnknownFilter {
                offset: 14,
                name: "shout".into()
            })
        );
    }

    #[test]
    fn test_filter_arity_checked() {
        assert!(matches!(
            parse_str("{{ x | truncate }}"),
            Err(TemplateError::InvalidArguments { filter: "truncate", .. })
        ));
        assert!(matches!(
            parse_str("{{ x | upper(3) }}"),
            Err(TemplateError::InvalidArguments { filter: "upper", .. })
        ));
    }

    #[test]
    fn test_oversized_filter_arguments_rejected() {
        assert!(matches!(
            parse_str("{{ context_window.used_percentage | progress_bar(9223372036854775807) }}"),
            Err(TemplateError::InvalidArguments { filter: "progress_bar", .. })
        ));
        assert!(matches!(
            parse_str("{{ cost.total_cost_usd | round(1000) }}"),
            Err(TemplateError::InvalidArguments { filter: "round", .. })
        ));
        assert!(parse_str("{{ x | progress_bar(200) | default('') }}").is_ok());
    }

    #[test]
    fn test_empty_expression_is_error() {
        assert!(matches!(
            parse_str("{{ }}"),
            Err(TemplateError::UnexpectedToken { .. })
        ));
    }
}
