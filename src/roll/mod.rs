mod crit;
mod ctx;
mod distribution;
mod error;
mod eval;
mod roller;
mod special;

type RResult<T> = Result<T, RollError>;

pub use crit::CriticalRoll;
pub use ctx::{DefaultRoller, Evaluation, RollContext};
pub use distribution::Distribution;
pub use error::RollError;
pub use eval::Evaluate;
pub use roller::Roller;

#[cfg(test)]
pub(crate) use roller::StepRoller;

