use crate::common::is_operator_word;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Integers, dice, superlatives, operator words and settings keywords.
    #[regex(r"[^ \t\r\n+\-*/()<>=!|#&]+")]
    Word,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqualEqual,
    #[token("=")]
    Equal,
    #[token(">=")]
    GreaterEqual,
    #[token("<=")]
    LessEqual,
    #[token("!=")]
    BangEqual,
    #[token("<")]
    LessThan,
    #[token(">")]
    GreaterThan,

    #[token("|")]
    Pipe,
    #[token("#")]
    Hash,
    #[token("&")]
    Ampersand,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Unknown,
}

impl TokenKind {
    pub const OPERATORS: &'static [Self] = &[
        Self::Plus,
        Self::Minus,
        Self::Star,
        Self::Slash,
        Self::LeftParen,
        Self::RightParen,
        Self::GreaterThan,
        Self::LessThan,
        Self::GreaterEqual,
        Self::LessEqual,
        Self::EqualEqual,
        Self::Equal,
        Self::BangEqual,
        Self::Pipe,
        Self::Hash,
        Self::Ampersand,
    ];

    pub const SETTINGS_SEPARATORS: &'static [Self] = &[Self::Pipe, Self::Hash, Self::Ampersand];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Word => "<word>",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            EqualEqual => "'=='",
            Equal => "'='",
            GreaterEqual => "'>='",
            LessEqual => "'<='",
            BangEqual => "'!='",
            LessThan => "'<'",
            GreaterThan => "'>'",
            Pipe => "'|'",
            Hash => "'#'",
            Ampersand => "'&'",
            Unknown => "<unknown>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub slice: &'a str,
    pub span: logos::Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, slice: &'a str, span: logos::Span) -> Self {
        Self { kind, slice, span }
    }

    fn implicit_mul(at: usize) -> Self {
        Self::new(TokenKind::Star, "*", at..at)
    }

    /// Whether this token stands for a value rather than an operation.
    pub fn is_operand(&self) -> bool {
        self.kind == TokenKind::Word && !is_operator_word(self.slice)
    }
}

/// Splits an instruction into tokens, making juxtaposed parentheses explicit
/// multiplications: `2(3)` and `(2)3` both read as products.
pub fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut lexer = TokenKind::lexer(s);
    let mut tokens: Vec<Token<'_>> = Vec::new();
    while let Some(kind) = lexer.next() {
        let token = Token::new(kind, lexer.slice(), lexer.span());
        if let Some(prev) = tokens.last() {
            let opens_after_value = kind == TokenKind::LeftParen
                && (prev.is_operand() || prev.kind == TokenKind::RightParen);
            let value_after_close = prev.kind == TokenKind::RightParen && token.is_operand();
            if opens_after_value || value_after_close {
                tokens.push(Token::implicit_mul(token.span.start));
            }
        }
        tokens.push(token);
    }
    tokens
}
