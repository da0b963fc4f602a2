use crate::common::Int;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RollError {
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("solving {0} would take too many combinations")]
    TooManyCombinations(String),
    #[error("cannot divide by zero")]
    ZeroDivision,
    #[error("integer overflow")]
    Overflow,
    #[error("cannot repeat a roll {0} times")]
    InvalidRepeatCount(Int),
    #[error("repeating a roll {0} times is too many")]
    TooManyRepeats(Int),
    #[error("{0:?} is missing an operand")]
    MissingOperand(String),
    #[error("{0:?} has no value on its own")]
    Standalone(String),
}
