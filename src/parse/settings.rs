use super::error::{ParseError, SourcePosition};
use super::lexer::{Token, TokenKind};
use crate::session::{Scope, SessionState};

/// Words that flag the following die size as critical.
pub const CRITICAL_KEYWORDS: &[&str] = &["crits", "crit", "warn", "warns", "critical", "c"];

/// Applies the criticality directives in front of the first settings separator
/// and returns the index at which the expression starts.
///
/// `crit d20 & d20` flags d20s for the whole session and then rolls one;
/// `crit d6 | 2d6` flags d6s for this command only.
pub fn extract_settings(
    tokens: &[Token<'_>],
    session: &mut SessionState,
) -> Result<usize, ParseError> {
    let split = match tokens
        .iter()
        .position(|t| TokenKind::SETTINGS_SEPARATORS.contains(&t.kind))
    {
        Some(i) => i,
        None => return Ok(0),
    };
    let scope = match tokens[split].kind {
        TokenKind::Ampersand => Scope::Persistent,
        _ => Scope::Command,
    };

    let mut directives = tokens[..split].iter();
    while let Some(token) = directives.next() {
        // only keywords matter; `-c` lexes as a minus followed by `c`
        if !is_keyword(token) {
            continue;
        }
        match directives.next() {
            Some(tag) if is_die_size(tag) => session.mark_critical(tag.slice, scope),
            other => {
                return Err(ParseError::SettingsDirective {
                    pos: SourcePosition::new(token.span.clone(), token.slice),
                    found: other.map(|t| t.slice.to_owned()),
                })
            }
        }
    }
    Ok(split + 1)
}

fn is_keyword(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Word
        && CRITICAL_KEYWORDS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(token.slice))
}

fn is_die_size(token: &Token<'_>) -> bool {
    let digits = match token.slice.strip_prefix(&['d', 'D'][..]) {
        Some(digits) => digits,
        None => return false,
    };
    token.kind == TokenKind::Word
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && digits.bytes().any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::sides;
    use crate::parse::tokenize;

    fn extract(s: &str, session: &mut SessionState) -> Result<usize, ParseError> {
        extract_settings(&tokenize(s), session)
    }

    #[test]
    fn test_no_settings() {
        let mut session = SessionState::new();
        assert_eq!(extract("2d6 + 3", &mut session), Ok(0));
        assert_eq!(session, SessionState::new());
    }

    #[test]
    fn test_persistent() {
        let mut session = SessionState::new();
        assert_eq!(extract("crit d20 & d20", &mut session), Ok(3));
        assert_eq!(session.persistent(), ["d20"]);
        assert!(session.command().is_empty());
    }

    #[test]
    fn test_command_scope() {
        let mut session = SessionState::new();
        assert_eq!(extract("warn d6 crit D8 | 2d6", &mut session), Ok(5));
        assert_eq!(session.command(), ["d6", "d8"]);
        assert!(session.is_critical(sides(8)));

        let mut session = SessionState::new();
        assert_eq!(extract("-c d4 # d4", &mut session), Ok(4));
        assert_eq!(session.command(), ["d4"]);
    }

    #[test]
    fn test_bad_directive() {
        let mut session = SessionState::new();
        let err = extract("crit 20 & d20", &mut session).unwrap_err();
        assert!(matches!(
            err,
            ParseError::SettingsDirective { found: Some(ref s), .. } if s == "20"
        ));
        assert!(matches!(
            extract("crit 1d20 & d20", &mut session),
            Err(ParseError::SettingsDirective { .. })
        ));
        assert!(matches!(
            extract("crit & d20", &mut session),
            Err(ParseError::SettingsDirective { found: None, .. })
        ));
        assert!(matches!(
            extract("crit |", &mut session),
            Err(ParseError::SettingsDirective { found: None, .. })
        ));
        assert!(matches!(
            extract("crit d0 | d20", &mut session),
            Err(ParseError::SettingsDirective { .. })
        ));
    }

    #[test]
    fn test_other_words_ignored() {
        let mut session = SessionState::new();
        assert_eq!(extract("loud d20 | d20", &mut session), Ok(3));
        assert!(session.command().is_empty());

        assert_eq!(extract("please crit d6 now # 2d6", &mut session), Ok(5));
        assert_eq!(session.command(), ["d6"]);
    }
}
