use crate::common::NonEmpty;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub span: logos::Span,
    pub slice: String,
}

impl SourcePosition {
    pub(crate) fn new(span: logos::Span, slice: &str) -> Self {
        Self {
            span,
            slice: slice.to_owned(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("(at position {}): unknown token {:?}; expected a number, a die, or one of {}", .pos.span.start, .pos.slice, .expected.fmt_expected())]
    UnknownToken {
        pos: SourcePosition,
        expected: NonEmpty<String>,
    },
    #[error("(at position {}): malformed {kind} {:?}", .pos.span.start, .pos.slice)]
    MalformedOperand {
        pos: SourcePosition,
        kind: &'static str,
    },
    #[error("{0}")]
    Structural(String),
    #[error("(at position {}): {:?} must be followed by a die size such as 'd20', found {}", .pos.span.start, .pos.slice, .found.as_deref().map_or("nothing".to_owned(), |s| format!("{:?}", s)))]
    SettingsDirective {
        pos: SourcePosition,
        found: Option<String>,
    },
}

impl ParseError {
    pub(crate) fn structural(msg: impl ToString) -> Self {
        Self::Structural(msg.to_string())
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [String] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => unreachable!("NonEmpty cannot be empty"),
            [a] => a.to_owned(),
            [a, b] => format!("{} or {}", a, b),
            s => format!("{}, or {}", s[..s.len() - 1].join(", "), &s[s.len() - 1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_expected() {
        let one = vec!["'+'".to_owned()];
        let three = vec!["'+'".to_owned(), "'-'".to_owned(), "'*'".to_owned()];
        assert_eq!(one.fmt_expected(), "'+'");
        assert_eq!(three.fmt_expected(), "'+', '-', or '*'");
    }
}
