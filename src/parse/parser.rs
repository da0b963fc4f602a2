use super::ast::*;
use super::error::{ParseError, SourcePosition};
use super::lexer::{Token, TokenKind};
use crate::common::*;
use crate::session::SessionState;

type PResult<T> = Result<T, ParseError>;

/// Priority added to everything between a `(` and its `)`.
pub const PAREN_PRIORITY_OFFSET: i32 = 10;

/// Builds the expression tree of `tokens` in a single left-to-right pass.
///
/// Parentheses only shift the priority of what they enclose, so they need not
/// balance: `(2+3` reads as `2+3` and a stray `)` lowers what follows.
pub fn build(tokens: &[Token<'_>], session: &SessionState) -> PResult<Node> {
    Builder::new(session).build(tokens)
}

struct Builder<'s> {
    session: &'s SessionState,
    base_priority: i32,
    next_id: u32,
}

impl<'s> Builder<'s> {
    fn new(session: &'s SessionState) -> Self {
        Self {
            session,
            base_priority: 0,
            next_id: 0,
        }
    }

    fn build(mut self, tokens: &[Token<'_>]) -> PResult<Node> {
        let mut root: Option<Node> = None;
        for token in tokens {
            match token.kind {
                TokenKind::LeftParen => self.base_priority += PAREN_PRIORITY_OFFSET,
                TokenKind::RightParen => self.base_priority -= PAREN_PRIORITY_OFFSET,
                _ => {
                    let node = self.classify(token)?;
                    root = Some(match root {
                        None => node,
                        Some(tree) => insert(tree, node)?,
                    });
                }
            }
        }
        let root = root.ok_or(ParseError::Empty)?;
        root.validate()?;
        Ok(root)
    }

    fn node(&mut self, kind: impl Into<NodeKind>) -> Node {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        Node::new(id, self.base_priority, kind)
    }

    /// Maps a token onto the node variant it denotes.
    fn classify(&mut self, token: &Token<'_>) -> PResult<Node> {
        use TokenKind::*;

        let kind: NodeKind = match token.kind {
            Plus => Binary::new(BinaryOperator::Add).into(),
            Minus => Binary::new(BinaryOperator::Sub).into(),
            Star => Binary::new(BinaryOperator::Mul).into(),
            Slash => Binary::new(BinaryOperator::Div).into(),
            LessThan => Comparison::new(ComparisonOperator::Lt).into(),
            GreaterThan => Comparison::new(ComparisonOperator::Gt).into(),
            LessEqual => Comparison::new(ComparisonOperator::Le).into(),
            GreaterEqual => Comparison::new(ComparisonOperator::Ge).into(),
            EqualEqual | Equal => Comparison::new(ComparisonOperator::Eq).into(),
            BangEqual => Comparison::new(ComparisonOperator::Ne).into(),
            Word => self.classify_word(token)?,
            Pipe | Hash | Ampersand => {
                return Err(ParseError::structural(format!(
                    "(at position {}): settings separator {:?} inside an expression",
                    token.span.start, token.slice
                )))
            }
            LeftParen | RightParen | Unknown => return Err(unknown_token(token)),
        };
        Ok(self.node(kind))
    }

    fn classify_word(&self, token: &Token<'_>) -> PResult<NodeKind> {
        let word = token.slice.to_ascii_lowercase();
        let malformed = |kind| ParseError::MalformedOperand {
            pos: SourcePosition::new(token.span.clone(), token.slice),
            kind,
        };

        if ADVANTAGE_WORDS.contains(&word.as_str()) {
            return Ok(Repeat::new(AdvType::Adv).into());
        }
        if DISADVANTAGE_WORDS.contains(&word.as_str()) {
            return Ok(Repeat::new(AdvType::Dis).into());
        }
        if DROP_WORDS.contains(&word.as_str()) {
            return Ok(Drop::new().into());
        }
        if word.bytes().all(|b| b.is_ascii_digit()) {
            return word
                .parse()
                .map(|x| Value(x).into())
                .map_err(|_| malformed("number"));
        }
        for (prefix, extreme) in [("highest", Extreme::Highest), ("lowest", Extreme::Lowest)] {
            if let Some(n) = word.strip_prefix(prefix) {
                return parse_superlative(extreme, n)
                    .map(Into::into)
                    .ok_or_else(|| malformed("superlative"));
            }
        }
        match word.split_once('d') {
            Some((num, sides)) if num.bytes().all(|b| b.is_ascii_digit()) => {
                let dice = parse_dice(num, sides).ok_or_else(|| malformed("die"))?;
                let critical = self.session.is_critical(dice.sides);
                Ok(Dice::new(dice.num, dice.sides, critical).into())
            }
            _ => Err(unknown_token(token)),
        }
    }
}

fn parse_dice(num: &str, sides: &str) -> Option<Dice> {
    let num = if num.is_empty() { 1 } else { num.parse().ok()? };
    if sides.is_empty() || !sides.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sides = sides.parse().ok()?;
    Some(Dice::new(num, sides, false))
}

fn parse_superlative(extreme: Extreme, n: &str) -> Option<Superlative> {
    let n = if n.is_empty() {
        1
    } else if n.bytes().all(|b| b.is_ascii_digit()) {
        n.parse().ok()?
    } else {
        return None;
    };
    Some(Superlative::new(extreme, n))
}

fn unknown_token(token: &Token<'_>) -> ParseError {
    let mut expected = NonEmpty::new(String::from("'adv'"));
    let symbols = TokenKind::OPERATORS.iter().map(TokenKind::as_str);
    for symbol in symbols.chain(["'dadv'", "'drop'", "'highest'", "'lowest'"]) {
        expected.push(symbol.to_owned());
    }
    ParseError::UnknownToken {
        pos: SourcePosition::new(token.span.clone(), token.slice),
        expected,
    }
}

/// Adds `node` to `tree`, returning the new root.
///
/// Operands and tighter-binding operators sink into the right-hand slot, as does
/// any operator arriving while that slot is still open (`2 * -3`). Anything
/// else takes the whole tree as its left operand, which makes equal priorities
/// associate to the left.
pub fn insert(mut tree: Node, mut node: Node) -> PResult<Node> {
    if tree.is_operand() {
        if node.is_operand() {
            return Err(ParseError::structural(format!(
                "two side-by-side values: {} and {}",
                tree, node
            )));
        }
        adopt_left(&mut node, tree)?;
        return Ok(node);
    }

    let open = match tree.kind.right_mut() {
        Some(slot) => slot.is_none(),
        None => {
            return Err(ParseError::structural(format!(
                "{} cannot take a right operand",
                tree_label(&tree)
            )))
        }
    };
    if !(open || node.is_operand() || node.priority() > tree.priority()) {
        adopt_left(&mut node, tree)?;
        return Ok(node);
    }
    if let Some(slot) = tree.kind.right_mut() {
        *slot = Some(Box::new(match slot.take() {
            None => node,
            Some(right) => insert(*right, node)?,
        }));
    }
    Ok(tree)
}

fn adopt_left(node: &mut Node, left: Node) -> PResult<()> {
    let label = tree_label(node);
    match node.kind.left_mut() {
        Some(slot) if slot.is_none() => {
            *slot = Some(Box::new(left));
            Ok(())
        }
        _ => Err(ParseError::structural(format!(
            "{} cannot take {} as its left operand",
            label, left
        ))),
    }
}

fn tree_label(node: &Node) -> String {
    format!("{:?}", node.to_string())
}
