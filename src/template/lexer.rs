use super::style::Style;
use super::TemplateError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Text(String),
    /// `[name]` where `name` parses as a style
    OpenTag { name: String, style: Style },
    /// `[/name]`, or `[/]` which closes the innermost tag
    CloseTag(Option<String>),
    ExprOpen,
    ExprClose,
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    Dot,
    Pipe,
    Comma,
    LParen,
    RParen,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Text(_) => "text".to_string(),
            TokenKind::OpenTag { name, .. } => format!("tag [{}]", name),
            TokenKind::CloseTag(Some(name)) => format!("tag [/{}]", name),
            TokenKind::CloseTag(None) => "tag [/]".to_string(),
            TokenKind::ExprOpen => "'{{'".to_string(),
            TokenKind::ExprClose => "'}}'".to_string(),
            TokenKind::Ident(name) => format!("identifier '{}'", name),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Int(_) | TokenKind::Float(_) => "number".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset into the template source
    pub offset: usize,
}

/// Split a template into tokens.
///
/// Outside `{{ ... }}` the source is literal text interleaved with style
/// tags; inside, it is a small expression grammar of paths, literals, pipes
/// and filter calls. Bracketed text that is not a valid style stays literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        tokens: Vec::new(),
        text: String::new(),
        text_start: 0,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Token>,
    text: String,
    text_start: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn push(&mut self, kind: TokenKind, offset: usize) {
        self.tokens.push(Token { kind, offset });
    }

    fn push_text_char(&mut self, c: char) {
        if self.text.is_empty() {
            self.text_start = self.pos;
        }
        self.text.push(c);
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.push(TokenKind::Text(text), self.text_start);
        }
    }

    fn run(&mut self) -> Result<(), TemplateError> {
        while let Some(c) = self.peek() {
            let rest = self.rest();
            if c == '\\' {
                match rest[1..].chars().next() {
                    Some(escaped @ ('[' | '{' | '\\')) => {
                        self.push_text_char(escaped);
                        self.pos += 1 + escaped.len_utf8();
                    }
                    _ => {
                        self.push_text_char('\\');
                        self.pos += 1;
                    }
                }
            } else if rest.starts_with("{{") {
                self.flush_text();
                let start = self.pos;
                self.push(TokenKind::ExprOpen, start);
                self.pos += 2;
                self.expression(start)?;
            } else if c == '[' {
                if !self.tag() {
                    self.push_text_char('[');
                    self.pos += 1;
                }
            } else {
                self.push_text_char(c);
                self.pos += c.len_utf8();
            }
        }
        self.flush_text();
        Ok(())
    }

    /// Try to lex a style tag at the cursor; returns false if it is plain text
    fn tag(&mut self) -> bool {
        let rest = self.rest();
        let Some(end) = rest.find(']') else {
            return false;
        };
        let inner = &rest[1..end];

        let kind = if let Some(name) = inner.strip_prefix('/') {
            let name = name.trim();
            if name.is_empty() {
                TokenKind::CloseTag(None)
            } else if Style::parse(name).is_some() {
                TokenKind::CloseTag(Some(name.to_string()))
            } else {
                return false;
            }
        } else {
            match Style::parse(inner) {
                Some(style) => TokenKind::OpenTag {
                    name: inner.trim().to_string(),
                    style,
                },
                None => return false,
            }
        };

        self.flush_text();
        let offset = self.pos;
        self.push(kind, offset);
        self.pos += end + 1;
        true
    }

    fn expression(&mut self, open: usize) -> Result<(), TemplateError> {
        loop {
            let Some(c) = self.peek() else {
                return Err(TemplateError::UnterminatedExpression { offset: open });
            };
            let offset = self.pos;

            if c.is_whitespace() {
                self.pos += c.len_utf8();
                continue;
            }
            if self.rest().starts_with("}}") {
                self.push(TokenKind::ExprClose, offset);
                self.pos += 2;
                return Ok(());
            }

            let kind = match c {
                '.' => TokenKind::Dot,
                '|' => TokenKind::Pipe,
                ',' => TokenKind::Comma,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '"' | '\'' => {
                    let kind = self.string(c)?;
                    self.push(kind, offset);
                    continue;
                }
                c if c.is_ascii_digit() || c == '-' => {
                    let kind = self.number()?;
                    self.push(kind, offset);
                    continue;
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let len = self
                        .rest()
                        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
                        .unwrap_or(self.rest().len());
                    let ident = self.rest()[..len].to_string();
                    self.pos += len;
                    self.push(TokenKind::Ident(ident), offset);
                    continue;
                }
                found => return Err(TemplateError::UnexpectedChar { offset, found }),
            };
            self.pos += 1;
            self.push(kind, offset);
        }
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, TemplateError> {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();

        while let Some(c) = self.peek() {
            self.pos += c.len_utf8();
            if c == quote {
                return Ok(TokenKind::Str(value));
            }
            if c == '\\' {
                if let Some(next) = self.peek() {
                    self.pos += next.len_utf8();
                    value.push(next);
                    continue;
                }
            }
            value.push(c);
        }

        Err(TemplateError::UnterminatedString { offset: start })
    }

    fn number(&mut self) -> Result<TokenKind, TemplateError> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(i, ch)| !(ch.is_ascii_digit() || ch == '.' || (i == 0 && ch == '-')))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let literal = &rest[..len];
        self.pos += len;

        if let Ok(value) = literal.parse::<i64>() {
            return Ok(TokenKind::Int(value));
        }
        literal
            .parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| TemplateError::UnexpectedChar {
                offset: start,
                found: literal.chars().next().unwrap_or('-'),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn test_plain_text_is_single_token() {
        assert_eq!(kinds("Model: x"), vec![TokenKind::Text("Model: x".into())]);
    }

    #[test]
    fn test_expression_tokens() {
        assert_eq!(
            kinds("{{ cost.total | round(2) }}"),
            vec![
                TokenKind::ExprOpen,
                TokenKind::Ident("cost".into()),
                TokenKind::Dot,
                TokenKind::Ident("total".into()),
                TokenKind::Pipe,
                TokenKind::Ident("round".into()),
                TokenKind::LParen,
                TokenKind::Int(2),
                TokenKind::RParen,
                TokenKind::ExprClose,
            ]
        );
    }

    #[test]
    fn test_style_tags_and_literal_brackets() {
        let tokens = kinds("[cyan]a[/cyan] [main] [/]");
        assert!(matches!(&tokens[0], TokenKind::OpenTag { name, .. } if name == "cyan"));
        assert_eq!(tokens[1], TokenKind::Text("a".into()));
        assert_eq!(tokens[2], TokenKind::CloseTag(Some("cyan".into())));
        assert_eq!(tokens[3], TokenKind::Text(" [main] ".into()));
        assert_eq!(tokens[4], TokenKind::CloseTag(None));
    }

    #[test]
    fn test_escaped_bracket_is_text() {
        assert_eq!(kinds(r"\[red]"), vec![TokenKind::Text("[red]".into())]);
    }

    #[test]
    fn test_string_literals_with_escapes() {
        let tokens = kinds(r#"{{ "a\"b" }}"#);
        assert_eq!(tokens[1], TokenKind::Str("a\"b".into()));
        let tokens = kinds("{{ 'n/a' }}");
        assert_eq!(tokens[1], TokenKind::Str("n/a".into()));
    }

    #[test]
    fn test_unterminated_expression() {
        assert_eq!(
            tokenize("ab {{ model"),
            Err(TemplateError::UnterminatedExpression { offset: 3 })
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("{{ a + b }}"),
            Err(TemplateError::UnexpectedChar {
                offset: 5,
                found: '+'
            })
        );
    }
}
