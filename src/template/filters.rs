use super::style::{plain_text, Color, Span, Style};
use serde_json::Value;
use std::path::Path;

/// Widest bar `progress_bar` will draw
pub const MAX_BAR_WIDTH: u64 = 200;
/// Most decimal places `round` will print
pub const MAX_ROUND_DIGITS: u64 = 20;

/// The closed set of filters a template may pipe values through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Basename,
    FormatCost,
    FormatPercent,
    FormatTokens,
    FormatDuration,
    Round,
    Truncate,
    TruncateLeft,
    Upper,
    Lower,
    Default,
    ProgressBar,
}

/// Intermediate value flowing through a filter chain
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Reference resolved to nothing
    Missing,
    Value(Value),
    /// Pre-styled output (only `progress_bar` produces this)
    Styled(Vec<Span>),
}

impl Filter {
    pub const ALL: [Filter; 12] = [
        Filter::Basename,
        Filter::FormatCost,
        Filter::FormatPercent,
        Filter::FormatTokens,
        Filter::FormatDuration,
        Filter::Round,
        Filter::Truncate,
        Filter::TruncateLeft,
        Filter::Upper,
        Filter::Lower,
        Filter::Default,
        Filter::ProgressBar,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Filter::Basename => "basename",
            Filter::FormatCost => "format_cost",
            Filter::FormatPercent => "format_percent",
            Filter::FormatTokens => "format_tokens",
            Filter::FormatDuration => "format_duration",
            Filter::Round => "round",
            Filter::Truncate => "truncate",
            Filter::TruncateLeft => "truncate_left",
            Filter::Upper => "upper",
            Filter::Lower => "lower",
            Filter::Default => "default",
            Filter::ProgressBar => "progress_bar",
        }
    }

    /// Check literal arguments at compile time
    pub fn check_args(self, args: &[Value]) -> Result<(), String> {
        let (min, max) = match self {
            Filter::Round | Filter::ProgressBar => (0, 1),
            Filter::Truncate | Filter::TruncateLeft | Filter::Default => (1, 1),
            _ => (0, 0),
        };
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                min.to_string()
            } else {
                format!("{} to {}", min, max)
            };
            return Err(format!(
                "takes {} argument(s), got {}",
                expected,
                args.len()
            ));
        }

        match self {
            Filter::Round | Filter::Truncate | Filter::TruncateLeft | Filter::ProgressBar => {
                let Some(arg) = args.first() else {
                    return Ok(());
                };
                let Some(n) = arg.as_u64() else {
                    return Err(format!("expects a non-negative integer, got {}", arg));
                };
                match self.arg_limit() {
                    Some(limit) if n > limit => {
                        Err(format!("argument must be at most {}, got {}", limit, n))
                    }
                    _ => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn arg_limit(self) -> Option<u64> {
        match self {
            Filter::Round => Some(MAX_ROUND_DIGITS),
            Filter::ProgressBar => Some(MAX_BAR_WIDTH),
            _ => None,
        }
    }

    /// Apply the filter; `Err` carries a message recorded as a render warning
    pub fn apply(self, input: Fragment, args: &[Value]) -> Result<Fragment, String> {
        if self == Filter::Default {
            return Ok(match input {
                Fragment::Missing | Fragment::Value(Value::Null) => {
                    Fragment::Value(args.first().cloned().unwrap_or(Value::Null))
                }
                Fragment::Value(Value::String(ref s)) if s.is_empty() => {
                    Fragment::Value(args.first().cloned().unwrap_or(Value::Null))
                }
                other => other,
            });
        }

        let value = match input {
            Fragment::Missing => return Ok(Fragment::Missing),
            Fragment::Value(value) => value,
            Fragment::Styled(spans) => Value::String(plain_text(&spans)),
        };
        let int_arg = |default: u64| {
            let n = args.first().and_then(Value::as_u64).unwrap_or(default);
            self.arg_limit().map_or(n, |limit| n.min(limit)) as usize
        };

        let text = match self {
            Filter::Basename => basename(&value_to_string(&value)),
            Filter::FormatCost => format_cost(self.number(&value)?),
            Filter::FormatPercent => format!("{:.0}%", self.number(&value)?),
            Filter::FormatTokens => format_tokens(self.number(&value)?),
            Filter::FormatDuration => format_duration(self.number(&value)?),
            Filter::Round => format!("{:.*}", int_arg(0), self.number(&value)?),
            Filter::Truncate => truncate(&value_to_string(&value), int_arg(0)),
            Filter::TruncateLeft => truncate_left(&value_to_string(&value), int_arg(0)),
            Filter::Upper => value_to_string(&value).to_uppercase(),
            Filter::Lower => value_to_string(&value).to_lowercase(),
            Filter::ProgressBar => {
                return Ok(Fragment::Styled(progress_bar(
                    self.number(&value)?,
                    int_arg(10),
                )))
            }
            Filter::Default => return Ok(Fragment::Value(value)),
        };

        Ok(Fragment::Value(Value::String(text)))
    }

    fn number(self, value: &Value) -> Result<f64, String> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| format!("'{}' expects a number, got {}", self.name(), value))
    }
}

/// Display form of a context value
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{:.0}", f)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn basename(path: &str) -> String {
    if path.is_empty() {
        return "~".to_string();
    }
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string()
}

fn format_cost(usd: f64) -> String {
    if usd < 0.01 {
        format!("${:.4}", usd)
    } else {
        format!("${:.2}", usd)
    }
}

fn format_scaled(value: f64, unit: &str) -> String {
    if value.fract() == 0.0 {
        format!("{}{}", value as u64, unit)
    } else {
        format!("{:.1}{}", value, unit)
    }
}

fn format_tokens(tokens: f64) -> String {
    // One-decimal rounding can carry into the next unit: 999_999 reads 1M
    let scaled = |divisor: f64| (tokens / divisor * 10.0).round() / 10.0;
    if tokens >= 1_000_000.0 || scaled(1000.0) >= 1000.0 {
        format_scaled(scaled(1_000_000.0), "M")
    } else if tokens.round() >= 1000.0 {
        format_scaled(scaled(1000.0), "k")
    } else {
        format!("{:.0}", tokens)
    }
}

fn format_duration(ms: f64) -> String {
    let total = (ms.max(0.0) / 1000.0) as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push('…');
    out
}

fn truncate_left(text: &str, max: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(max)).collect()
}

fn progress_bar(percent: f64, width: usize) -> Vec<Span> {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * width as f64) as usize;
    let bar = format!("[{}{}]", "█".repeat(filled), " ".repeat(width - filled));

    let color = if percent >= 85.0 {
        "red"
    } else if percent >= 70.0 {
        "yellow"
    } else {
        "green"
    };
    let style = Color::parse(color).map(Style::fg).unwrap_or_default();

    vec![
        Span::new(bar, style),
        Span::plain(format!(" {:.0}%", percent)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apply(filter: Filter, input: Value, args: &[Value]) -> String {
        match filter.apply(Fragment::Value(input), args).unwrap() {
            Fragment::Value(value) => value_to_string(&value),
            Fragment::Styled(spans) => plain_text(&spans),
            Fragment::Missing => panic!("unexpected missing value"),
        }
    }

    #[test]
    fn test_every_filter_round_trips_its_name() {
        for filter in Filter::ALL {
            assert_eq!(Filter::from_name(filter.name()), Some(filter));
        }
        assert_eq!(Filter::from_name("shout"), None);
    }

    #[test]
    fn test_basename() {
        assert_eq!(apply(Filter::Basename, json!("/home/user/my-project"), &[]), "my-project");
        assert_eq!(apply(Filter::Basename, json!(""), &[]), "~");
    }

    #[test]
    fn test_format_cost_precision() {
        assert_eq!(apply(Filter::FormatCost, json!(0.0123), &[]), "$0.0123");
        assert_eq!(apply(Filter::FormatCost, json!(1.5), &[]), "$1.50");
        assert_eq!(apply(Filter::FormatCost, json!(0), &[]), "$0.0000");
    }

    #[test]
    fn test_format_percent_and_tokens() {
        assert_eq!(apply(Filter::FormatPercent, json!(42.4), &[]), "42%");
        assert_eq!(apply(Filter::FormatTokens, json!(999), &[]), "999");
        assert_eq!(apply(Filter::FormatTokens, json!(1500), &[]), "1.5k");
        assert_eq!(apply(Filter::FormatTokens, json!(200000), &[]), "200k");
        assert_eq!(apply(Filter::FormatTokens, json!(2000000), &[]), "2M");
    }

    #[test]
    fn test_format_tokens_promotes_at_unit_boundary() {
        assert_eq!(format_tokens(999_999.0), "1M");
        assert_eq!(format_tokens(999_950.0), "1M");
        assert_eq!(format_tokens(999_940.0), "999.9k");
        assert_eq!(format_tokens(999.6), "1k");
        assert_eq!(format_tokens(999.4), "999");
        assert_eq!(format_tokens(950_000.0), "950k");
        assert_eq!(format_tokens(1_049_999.0), "1M");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(apply(Filter::FormatDuration, json!(45000), &[]), "45s");
        assert_eq!(apply(Filter::FormatDuration, json!(90000), &[]), "1m 30s");
        assert_eq!(apply(Filter::FormatDuration, json!(7_500_000), &[]), "2h 5m");
    }

    #[test]
    fn test_round_and_truncate() {
        assert_eq!(apply(Filter::Round, json!(3.14159), &[json!(2)]), "3.14");
        assert_eq!(apply(Filter::Round, json!("2.6"), &[]), "3");
        assert_eq!(apply(Filter::Truncate, json!("feature/long"), &[json!(7)]), "feature…");
        assert_eq!(apply(Filter::Truncate, json!("main"), &[json!(7)]), "main");
        assert_eq!(apply(Filter::TruncateLeft, json!("/a/b/c/project"), &[json!(7)]), "project");
    }

    #[test]
    fn test_default_replaces_missing_and_empty() {
        let fallback = [json!("n/a")];
        assert_eq!(
            Filter::Default.apply(Fragment::Missing, &fallback).unwrap(),
            Fragment::Value(json!("n/a"))
        );
        assert_eq!(apply(Filter::Default, json!(""), &fallback), "n/a");
        assert_eq!(apply(Filter::Default, json!("x"), &fallback), "x");
    }

    #[test]
    fn test_missing_passes_through() {
        assert_eq!(
            Filter::Upper.apply(Fragment::Missing, &[]).unwrap(),
            Fragment::Missing
        );
    }

    #[test]
    fn test_numeric_filter_rejects_text() {
        let err = Filter::FormatPercent
            .apply(Fragment::Value(json!("lots")), &[])
            .unwrap_err();
        assert!(err.contains("format_percent"));
    }

    #[test]
    fn test_progress_bar_thresholds() {
        let green = progress_bar(42.0, 10);
        assert_eq!(green[0].text, "[████      ]");
        assert_eq!(green[0].style.fg, Color::parse("green"));
        assert_eq!(green[1].text, " 42%");

        assert_eq!(progress_bar(70.0, 10)[0].style.fg, Color::parse("yellow"));
        assert_eq!(progress_bar(85.0, 10)[0].style.fg, Color::parse("red"));
        assert_eq!(progress_bar(150.0, 4)[0].text, "[████]");
    }

    #[test]
    fn test_check_args() {
        assert!(Filter::Round.check_args(&[]).is_ok());
        assert!(Filter::Truncate.check_args(&[]).is_err());
        assert!(Filter::Truncate.check_args(&[json!("x")]).is_err());
        assert!(Filter::Upper.check_args(&[json!(1)]).is_err());
        assert!(Filter::Default.check_args(&[json!("-")]).is_ok());
    }

    #[test]
    fn test_check_args_caps_width_and_digits() {
        assert!(Filter::ProgressBar.check_args(&[json!(MAX_BAR_WIDTH)]).is_ok());
        assert!(Filter::ProgressBar.check_args(&[json!(MAX_BAR_WIDTH + 1)]).is_err());
        assert!(Filter::Round.check_args(&[json!(MAX_ROUND_DIGITS)]).is_ok());
        assert!(Filter::Round.check_args(&[json!(1000)]).is_err());
        assert!(Filter::Truncate.check_args(&[json!(100_000)]).is_ok());
    }

    #[test]
    fn test_apply_clamps_oversized_arguments() {
        let spans = progress_bar_spans(json!(50), &[json!(u64::MAX)]);
        assert_eq!(spans[0].text.chars().count(), MAX_BAR_WIDTH as usize + 2);
        let rounded = apply(Filter::Round, json!(1.5), &[json!(i64::MAX)]);
        assert_eq!(rounded.len(), 2 + MAX_ROUND_DIGITS as usize);
    }

    fn progress_bar_spans(input: Value, args: &[Value]) -> Vec<Span> {
        match Filter::ProgressBar.apply(Fragment::Value(input), args).unwrap() {
            Fragment::Styled(spans) => spans,
            other => panic!("expected styled output, got {:?}", other),
        }
    }
}
