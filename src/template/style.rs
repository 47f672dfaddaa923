use ansi_term::{Colour, Style as AnsiStyle};

const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Foreground color of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Palette index 0-15 (8-15 are the `bright_` variants)
    Ansi(u8),
    Rgb(u8, u8, u8),
}

impl Color {
    pub fn parse(word: &str) -> Option<Self> {
        if let Some(hex) = word.strip_prefix('#') {
            return parse_hex(hex);
        }

        let (base, offset) = match word.strip_prefix("bright_") {
            Some(base) => (base, 8),
            None => (word, 0),
        };

        COLOR_NAMES
            .iter()
            .position(|name| *name == base)
            .map(|index| Color::Ansi(index as u8 + offset))
    }

    fn to_ansi(self) -> Colour {
        match self {
            Color::Ansi(0) => Colour::Black,
            Color::Ansi(1) => Colour::Red,
            Color::Ansi(2) => Colour::Green,
            Color::Ansi(3) => Colour::Yellow,
            Color::Ansi(4) => Colour::Blue,
            Color::Ansi(5) => Colour::Purple,
            Color::Ansi(6) => Colour::Cyan,
            Color::Ansi(7) => Colour::White,
            Color::Ansi(n) => Colour::Fixed(n),
            Color::Rgb(r, g, b) => Colour::RGB(r, g, b),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Text attributes carried by a rendered span.
///
/// A style is written as space-separated words, e.g. `bold cyan` or
/// `dim #ff8800`. Converting to terminal escape codes only happens when the
/// line is assembled, so the same spans can be emitted with or without color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    /// Parse a style spec; `None` if any word is not a known color or modifier
    pub fn parse(spec: &str) -> Option<Self> {
        let mut style = Style::default();
        let mut words = 0;

        for word in spec.split_whitespace() {
            words += 1;
            match word {
                "bold" => style.bold = true,
                "dim" => style.dim = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                other => style.fg = Some(Color::parse(other)?),
            }
        }

        (words > 0).then_some(style)
    }

    /// Layer this style over `base`: own color wins, modifiers accumulate
    pub fn over(self, base: Style) -> Style {
        Style {
            fg: self.fg.or(base.fg),
            bold: self.bold || base.bold,
            dim: self.dim || base.dim,
            italic: self.italic || base.italic,
            underline: self.underline || base.underline,
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Style::default()
    }

    fn to_ansi(self) -> AnsiStyle {
        let mut style = AnsiStyle::new();
        if let Some(fg) = self.fg {
            style = style.fg(fg.to_ansi());
        }
        if self.bold {
            style = style.bold();
        }
        if self.dim {
            style = style.dimmed();
        }
        if self.italic {
            style = style.italic();
        }
        if self.underline {
            style = style.underline();
        }
        style
    }
}

/// A run of text with a single style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }
}

/// Concatenate span texts, dropping all styling
pub fn plain_text(spans: &[Span]) -> String {
    spans.iter().map(|span| span.text.as_str()).collect()
}

/// Render spans to a string, emitting ANSI escapes only when `color` is set
pub fn paint(spans: &[Span], color: bool) -> String {
    if !color {
        return plain_text(spans);
    }

    let mut out = String::new();
    let mut pending: Option<(Style, String)> = None;

    for span in spans.iter().filter(|span| !span.text.is_empty()) {
        match pending.as_mut() {
            Some((style, text)) if *style == span.style => text.push_str(&span.text),
            _ => {
                if let Some((style, text)) = pending.take() {
                    out.push_str(&paint_run(style, &text));
                }
                pending = Some((span.style, span.text.clone()));
            }
        }
    }
    if let Some((style, text)) = pending {
        out.push_str(&paint_run(style, &text));
    }

    out
}

fn paint_run(style: Style, text: &str) -> String {
    if style.is_plain() {
        text.to_string()
    } else {
        style.to_ansi().paint(text).to_string()
    }
}
