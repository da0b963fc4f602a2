use super::error::ParseError;
use crate::common::*;
use crate::roll::Evaluate;
use enum_dispatch::enum_dispatch;
use std::fmt;

type PResult<T> = Result<T, ParseError>;

/// Identifies a node within the tree of one command.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32);

type Slot = Option<Box<Node>>;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub base_priority: i32,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: NodeId, base_priority: i32, kind: impl Into<NodeKind>) -> Self {
        Self {
            id,
            base_priority,
            kind: kind.into(),
        }
    }

    pub fn priority(&self) -> i32 {
        self.base_priority + self.kind.priority_modifier()
    }

    pub fn is_operand(&self) -> bool {
        self.kind.is_operand()
    }

    pub fn children(&self) -> Vec<&Node> {
        self.kind.children()
    }

    /// Checks that every operator has the children it needs, recursively.
    pub fn validate(&self) -> PResult<()> {
        if let NodeKind::Superlative(s) = &self.kind {
            return Err(ParseError::structural(format!(
                "{:?} can only follow 'drop'",
                s.to_string()
            )));
        }
        self.kind.validate()?;
        for child in self.children() {
            child.validate_child_of(self)?;
        }
        Ok(())
    }

    fn validate_child_of(&self, parent: &Node) -> PResult<()> {
        match (&parent.kind, &self.kind) {
            (NodeKind::Drop(_), NodeKind::Superlative(_)) => Ok(()),
            _ => self.validate(),
        }
    }

    /// The dice pool, if this node is a bare `NdM`.
    pub fn as_dice(&self) -> Option<&Dice> {
        match &self.kind {
            NodeKind::Dice(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Shape of a node as seen by the tree builder.
#[enum_dispatch]
pub trait Structure {
    fn priority_modifier(&self) -> i32;

    fn is_operand(&self) -> bool {
        false
    }

    fn left_mut(&mut self) -> Option<&mut Option<Box<Node>>> {
        None
    }

    fn right_mut(&mut self) -> Option<&mut Option<Box<Node>>> {
        None
    }

    fn children(&self) -> Vec<&Node> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), ParseError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(Structure, Evaluate)]
pub enum NodeKind {
    Value(Value),
    Dice(Dice),
    Binary(Binary),
    Repeat(Repeat),
    Drop(Drop),
    Superlative(Superlative),
    Comparison(Comparison),
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(x) => fmt::Display::fmt(x, f),
            Self::Dice(x) => fmt::Display::fmt(x, f),
            Self::Binary(x) => fmt::Display::fmt(x, f),
            Self::Repeat(x) => fmt::Display::fmt(x, f),
            Self::Drop(x) => fmt::Display::fmt(x, f),
            Self::Superlative(x) => fmt::Display::fmt(x, f),
            Self::Comparison(x) => fmt::Display::fmt(x, f),
        }
    }
}

fn slots<'a>(left: &'a Slot, right: &'a Slot) -> Vec<&'a Node> {
    left.iter().chain(right.iter()).map(|n| &**n).collect()
}

fn missing(side: &str, op: impl fmt::Display) -> ParseError {
    ParseError::structural(format!("{:?} is missing its {} operand", op.to_string(), side))
}

fn fmt_slot(slot: &Slot, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match slot {
        Some(node) => fmt::Display::fmt(node, f),
        None => f.write_str("_"),
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Value(pub Int);

impl Structure for Value {
    fn priority_modifier(&self) -> i32 {
        0
    }

    fn is_operand(&self) -> bool {
        true
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Dice {
    pub num: UInt,
    pub sides: Sides,
    pub critical: bool,
}

impl Dice {
    pub fn new(num: UInt, sides: Sides, critical: bool) -> Self {
        Self {
            num,
            sides,
            critical,
        }
    }
}

impl Structure for Dice {
    fn priority_modifier(&self) -> i32 {
        0
    }

    fn is_operand(&self) -> bool {
        true
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num, self.sides)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinaryOperator,
    pub left: Slot,
    pub right: Slot,
}

impl Binary {
    pub fn new(op: BinaryOperator) -> Self {
        Self {
            op,
            left: None,
            right: None,
        }
    }
}

impl Structure for Binary {
    fn priority_modifier(&self) -> i32 {
        self.op.priority_modifier()
    }

    fn left_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.left)
    }

    fn right_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.right)
    }

    fn children(&self) -> Vec<&Node> {
        slots(&self.left, &self.right)
    }

    fn validate(&self) -> PResult<()> {
        let signed = matches!(self.op, BinaryOperator::Add | BinaryOperator::Sub);
        if self.left.is_none() && !signed {
            Err(missing("left", self.op))
        } else if self.right.is_none() {
            Err(missing("right", self.op))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(left) = &self.left {
            write!(f, "{} ", left)?;
        }
        write!(f, "{} ", self.op)?;
        fmt_slot(&self.right, f)?;
        f.write_str(")")
    }
}

/// Advantage or disadvantage: `count` repeats of `expr`, keeping the best or worst.
#[derive(Debug, Clone, PartialEq)]
pub struct Repeat {
    pub kind: AdvType,
    pub count: Slot,
    pub expr: Slot,
}

impl Repeat {
    pub const DEFAULT_COUNT: Int = 2;
    pub const PRIORITY_MODIFIER: i32 = 4;

    pub fn new(kind: AdvType) -> Self {
        Self {
            kind,
            count: None,
            expr: None,
        }
    }
}

impl Structure for Repeat {
    fn priority_modifier(&self) -> i32 {
        Self::PRIORITY_MODIFIER
    }

    fn left_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.count)
    }

    fn right_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.expr)
    }

    fn children(&self) -> Vec<&Node> {
        slots(&self.count, &self.expr)
    }

    fn validate(&self) -> PResult<()> {
        match self.expr {
            Some(_) => Ok(()),
            None => Err(missing("right", self.kind)),
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(count) = &self.count {
            write!(f, "{} ", count)?;
        }
        write!(f, "{} ", self.kind)?;
        fmt_slot(&self.expr, f)?;
        f.write_str(")")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub dice: Slot,
    pub which: Slot,
}

impl Drop {
    pub const PRIORITY_MODIFIER: i32 = 5;

    pub fn new() -> Self {
        Self {
            dice: None,
            which: None,
        }
    }
}

impl Default for Drop {
    fn default() -> Self {
        Self::new()
    }
}

impl Structure for Drop {
    fn priority_modifier(&self) -> i32 {
        Self::PRIORITY_MODIFIER
    }

    fn left_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.dice)
    }

    fn right_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.which)
    }

    fn children(&self) -> Vec<&Node> {
        slots(&self.dice, &self.which)
    }

    fn validate(&self) -> PResult<()> {
        match self.dice.as_deref().map(|n| &n.kind) {
            Some(NodeKind::Dice(_)) => {}
            Some(other) => {
                return Err(ParseError::structural(format!(
                    "'drop' can only operate on dice, found {:?}",
                    other.to_string()
                )))
            }
            None => return Err(missing("left", "drop")),
        }
        match self.which.as_deref().map(|n| &n.kind) {
            Some(NodeKind::Superlative(_)) => Ok(()),
            Some(other) => Err(ParseError::structural(format!(
                "'drop' must be followed by 'highest' or 'lowest', found {:?}",
                other.to_string()
            ))),
            None => Err(missing("right", "drop")),
        }
    }
}

impl fmt::Display for Drop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt_slot(&self.dice, f)?;
        f.write_str(" drop ")?;
        fmt_slot(&self.which, f)?;
        f.write_str(")")
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Superlative {
    pub extreme: Extreme,
    pub n: UInt,
}

impl Superlative {
    pub fn new(extreme: Extreme, n: UInt) -> Self {
        Self { extreme, n }
    }
}

impl Structure for Superlative {
    fn priority_modifier(&self) -> i32 {
        0
    }

    fn is_operand(&self) -> bool {
        true
    }
}

impl fmt::Display for Superlative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.extreme, self.n)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub op: ComparisonOperator,
    pub left: Slot,
    pub right: Slot,
}

impl Comparison {
    /// Comparisons bind loosest, so both sides are complete arithmetic.
    pub const PRIORITY_MODIFIER: i32 = 0;

    pub fn new(op: ComparisonOperator) -> Self {
        Self {
            op,
            left: None,
            right: None,
        }
    }
}

impl Structure for Comparison {
    fn priority_modifier(&self) -> i32 {
        Self::PRIORITY_MODIFIER
    }

    fn left_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.left)
    }

    fn right_mut(&mut self) -> Option<&mut Slot> {
        Some(&mut self.right)
    }

    fn children(&self) -> Vec<&Node> {
        slots(&self.left, &self.right)
    }

    fn validate(&self) -> PResult<()> {
        if self.left.is_none() {
            Err(missing("left", self.op))
        } else if self.right.is_none() {
            Err(missing("right", self.op))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt_slot(&self.left, f)?;
        write!(f, " {} ", self.op)?;
        fmt_slot(&self.right, f)?;
        f.write_str(")")
    }
}
