use crate::roll::RollError;
use std::cmp::Ordering;
use std::fmt::{self, Write};
use std::num::NonZeroU32;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type Float = f64;

/// The number of faces on a die.
pub type Sides = NonZeroUInt;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Spellings that classify a word token as the advantage operator.
pub const ADVANTAGE_WORDS: &[&str] = &["adv", "advantage"];
/// Spellings that classify a word token as the disadvantage operator.
pub const DISADVANTAGE_WORDS: &[&str] = &["dadv", "dis", "disadv", "disadvantage"];
/// Spellings that classify a word token as the drop operator.
pub const DROP_WORDS: &[&str] = &["drop"];

pub(crate) fn is_operator_word(word: &str) -> bool {
    let word = word.to_ascii_lowercase();
    ADVANTAGE_WORDS
        .iter()
        .chain(DISADVANTAGE_WORDS)
        .chain(DROP_WORDS)
        .any(|&w| w == word)
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub const fn priority_modifier(self) -> i32 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Div => 2,
            Self::Mul => 3,
        }
    }

    /// Applies the operator; division floors toward negative infinity.
    pub fn apply(self, left: Int, right: Int) -> Result<Int, RollError> {
        let ret = match self {
            Self::Add => left.checked_add(right),
            Self::Sub => left.checked_sub(right),
            Self::Mul => left.checked_mul(right),
            Self::Div => return floor_div(left, right),
        };
        ret.ok_or(RollError::Overflow)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

pub(crate) fn floor_div(left: Int, right: Int) -> Result<Int, RollError> {
    if right == 0 {
        return Err(RollError::ZeroDivision);
    }
    // only `Int::MIN / -1` is left to overflow
    let quotient = left.checked_div(right).ok_or(RollError::Overflow)?;
    if left % right != 0 && (left < 0) != (right < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ComparisonOperator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl ComparisonOperator {
    pub fn holds(self, left: Int, right: Int) -> bool {
        let ord = left.cmp(&right);
        match self {
            Self::Lt => ord == Ordering::Less,
            Self::Gt => ord == Ordering::Greater,
            Self::Le => ord != Ordering::Greater,
            Self::Ge => ord != Ordering::Less,
            Self::Eq => ord == Ordering::Equal,
            Self::Ne => ord != Ordering::Equal,
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        f.write_str(s)
    }
}

/// Which repeat of an advantage-style roll is kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AdvType {
    Adv,
    Dis,
}

impl AdvType {
    pub fn pick(self, a: Int, b: Int) -> Int {
        match self {
            Self::Adv => a.max(b),
            Self::Dis => a.min(b),
        }
    }
}

impl fmt::Display for AdvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adv => f.write_str("adv"),
            Self::Dis => f.write_str("dadv"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Extreme {
    Highest,
    Lowest,
}

impl fmt::Display for Extreme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Highest => f.write_str("highest"),
            Self::Lowest => f.write_str("lowest"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CritType {
    Success,
    Failure,
}

impl CritType {
    /// Classifies a natural face; a one-sided die only ever fails.
    pub fn of(face: Int, sides: Sides) -> Option<Self> {
        if face == 1 {
            Some(Self::Failure)
        } else if face == Int::from(sides.get()) {
            Some(Self::Success)
        } else {
            None
        }
    }
}

impl fmt::Display for CritType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("critical success"),
            Self::Failure => f.write_str("critical failure"),
        }
    }
}
