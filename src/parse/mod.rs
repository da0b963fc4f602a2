pub mod ast;
mod error;
mod lexer;
mod parser;
mod settings;

pub use error::{ParseError, SourcePosition};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{build, insert, PAREN_PRIORITY_OFFSET};
pub use settings::{extract_settings, CRITICAL_KEYWORDS};
