use crate::common::{CritType, Int};
use crate::parse::ast::Dice;
use std::fmt;

/// A natural 1 or natural maximum rolled by a die flagged as critical.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CriticalRoll {
    pub dice: Dice,
    /// 1-based position of the die within its pool.
    pub index: usize,
    pub face: Int,
    pub kind: CritType,
}

impl CriticalRoll {
    pub fn new(dice: Dice, index: usize, face: Int, kind: CritType) -> Self {
        Self {
            dice,
            index,
            face,
            kind,
        }
    }
}

impl fmt::Display for CriticalRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "die {} of {} rolled a natural {}, a {}",
            self.index, self.dice, self.face, self.kind
        )
    }
}
