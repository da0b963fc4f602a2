//! Dice notation such as `2d6+3`, `adv d20 > 14` or `4d6 drop lowest`,
//! rolled once and solved exactly.
//!
//! ```no_run
//! let mut session = dice_odds::SessionState::new();
//! let result = dice_odds::interpret("crit d20 | adv d20 + 5", &mut session)?;
//! println!("rolled {} ({:.1} expected)", result.rolled, result.expected);
//! for crit in &result.criticals {
//!     println!("{}", crit);
//! }
//! # Ok::<(), dice_odds::Error>(())
//! ```

mod common;
mod roll;

pub mod parse;

mod error;
mod session;

#[cfg(test)]
mod test_strategies;

use std::rc::Rc;

pub use common::{
    AdvType, BinaryOperator, ComparisonOperator, CritType, Extreme, Float, Int, Sides, UInt,
    ADVANTAGE_WORDS, DISADVANTAGE_WORDS, DROP_WORDS,
};
pub use error::Error;
pub use roll::{
    CriticalRoll, DefaultRoller, Distribution, Evaluate, Evaluation, RollContext, RollError,
    Roller,
};
pub use session::{Scope, SessionState};

/// Everything known about one rolled command.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub rolled: Int,
    pub max: Int,
    pub expected: Float,
    pub distribution: Rc<Distribution>,
    pub criticals: Vec<CriticalRoll>,
}

impl Interpretation {
    /// `P(X <= rolled)`: how lucky the roll was.
    pub fn percentile(&self) -> Float {
        self.distribution.cumulative(self.rolled)
    }
}

/// Rolls `command` with the thread-local rng and the default guards.
pub fn interpret(command: &str, session: &mut SessionState) -> Result<Interpretation, Error> {
    interpret_with(command, session, RollContext::<DefaultRoller>::default())
}

/// Rolls `command` within `ctx`.
///
/// Critical directives scoped to the command are forgotten afterwards, whether
/// or not the command succeeded.
pub fn interpret_with<R: Roller>(
    command: &str,
    session: &mut SessionState,
    ctx: RollContext<R>,
) -> Result<Interpretation, Error> {
    let ret = run(command, session, ctx);
    session.end_command();
    ret
}

fn run<R: Roller>(
    command: &str,
    session: &mut SessionState,
    mut ctx: RollContext<R>,
) -> Result<Interpretation, Error> {
    let tokens = parse::tokenize(command);
    let start = parse::extract_settings(&tokens, session)?;
    let tree = parse::build(&tokens[start..], session)?;
    let Evaluation {
        value,
        distribution,
    } = ctx.evaluate(&tree)?;
    Ok(Interpretation {
        rolled: value,
        max: distribution.max().unwrap_or(value),
        expected: distribution.expected_value(),
        distribution,
        criticals: ctx.take_criticals(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;
    use crate::parse::ParseError;
    use crate::roll::StepRoller;
    use crate::test_strategies::*;
    use proptest::prelude::*;

    fn stepping(command: &str, session: &mut SessionState) -> Result<Interpretation, Error> {
        interpret_with(command, session, RollContext::new_bounded(1000, StepRoller::new(1, 1)))
    }

    fn check(command: &str, expected: Int) {
        let result = stepping(command, &mut SessionState::new()).unwrap();
        assert_eq!(result.rolled, expected, "while interpreting {:?}", command);
    }

    #[test]
    fn test_arithmetic() {
        check("2+3*4", 14);
        check("(2+3)*4", 20);
        check("2(3+4)", 14);
        check("10 - 2 - 3", 5);
        check("(0 - 7) / 2", -4);
    }

    #[test]
    fn test_summary() {
        let result = stepping("2d6 + 1", &mut SessionState::new()).unwrap();
        assert_eq!(result.rolled, 1 + 2 + 1);
        assert_eq!(result.max, 13);
        assert_close(result.expected, 8.0);
        // P(2d6 <= 3)
        assert_close(result.percentile(), 3.0 / 36.0);
        assert!(result.criticals.is_empty());
    }

    #[test]
    fn test_point_distribution() {
        let result = stepping("5d1 > 0", &mut SessionState::new()).unwrap();
        assert_eq!(result.rolled, 5);
        assert_eq!(*result.distribution, Distribution::point(5));
        assert_close(result.percentile(), 1.0);
    }

    #[test]
    fn test_command_criticals() {
        let mut session = SessionState::new();
        let result = stepping("crit d6 | 6d6", &mut session).unwrap();
        let faces: Vec<_> = result.criticals.iter().map(|c| c.face).collect();
        assert_eq!(faces, [1, 6]);
        assert!(session.command().is_empty());
        assert!(session.persistent().is_empty());

        let result = stepping("6d6", &mut session).unwrap();
        assert!(result.criticals.is_empty());
    }

    #[test]
    fn test_persistent_criticals() {
        let mut session = SessionState::new();
        stepping("crit d20 & 3", &mut session).unwrap();
        assert_eq!(session.persistent(), ["d20"]);

        let result = stepping("d20 + d20", &mut session).unwrap();
        assert_eq!(result.criticals.len(), 1);
        assert_eq!(result.criticals[0].kind, CritType::Failure);
        assert_eq!(
            result.criticals[0].to_string(),
            "die 1 of 1d20 rolled a natural 1, a critical failure"
        );

        session.reset();
        let result = stepping("d20", &mut session).unwrap();
        assert!(result.criticals.is_empty());
    }

    #[test]
    fn test_criticals_counted_in_pools() {
        let mut session = SessionState::new();
        let result = stepping("-c d6 # 6d6 >= 5", &mut session).unwrap();
        assert_eq!(result.rolled, 2);
        assert_eq!(result.criticals.len(), 2);
    }

    #[test]
    fn test_command_set_cleared_on_failure() {
        let mut session = SessionState::new();
        let err = stepping("crit d6 | 2d6 / 0", &mut session).unwrap_err();
        assert_eq!(err, Error::Roll(RollError::ZeroDivision));
        assert!(session.command().is_empty());

        let err = stepping("crit d6 | 2d6 +", &mut session).unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Structural(_))));
        assert!(session.command().is_empty());
    }

    #[test]
    fn test_error_taxonomy() {
        let mut session = SessionState::new();
        let mut err = |s: &str| stepping(s, &mut session).unwrap_err();
        assert_eq!(err(""), Error::Parse(ParseError::Empty));
        assert!(matches!(err("2 ? 3"), Error::Parse(ParseError::UnknownToken { .. })));
        assert!(matches!(err("2d0"), Error::Parse(ParseError::MalformedOperand { .. })));
        assert!(matches!(err("2 3"), Error::Parse(ParseError::Structural(_))));
        assert!(matches!(err("crit | d6"), Error::Parse(ParseError::SettingsDirective { .. })));
        assert_eq!(err("1001d2"), Error::Roll(RollError::TooManyRolls));
        assert_eq!(err("0 adv d6"), Error::Roll(RollError::InvalidRepeatCount(0)));
        assert_eq!(
            err("9d20 drop lowest"),
            Error::Roll(RollError::TooManyCombinations(String::from("9d20")))
        );
        assert_eq!(
            err("300d300"),
            Error::Roll(RollError::TooManyCombinations(String::from("300d300")))
        );
        assert_eq!(err("1000000000 adv 1"), Error::Roll(RollError::TooManyRepeats(1_000_000_000)));
        assert_eq!(err("9999999999 * 9999999999"), Error::Roll(RollError::Overflow));
    }

    #[test]
    fn test_default_context() {
        let result = interpret("adv d20", &mut SessionState::new()).unwrap();
        assert!((1..=20).contains(&result.rolled));
        assert_eq!(result.max, 20);
    }

    #[test]
    fn test_repeated_evaluation_is_cached() {
        let tree = tree("adv (3d6 + d4)");
        let mut ctx = RollContext::new_bounded(1000, seeded(3));
        let first = ctx.evaluate(&tree).unwrap();
        let rolls = ctx.rolls();
        let second = ctx.evaluate(&tree).unwrap();
        assert_eq!(first, second);
        assert_eq!(ctx.rolls(), rolls);

        ctx.resample(&tree);
        ctx.sample(&tree).unwrap();
        assert_eq!(ctx.rolls(), 2 * rolls);
    }

    proptest! {
        #[test]
        fn prop_distribution_is_normalized(expr in dice_expression_strategy(), seed in any::<u64>()) {
            let ctx = RollContext::new_bounded(1000, seeded(seed));
            let result = match interpret_with(&expr, &mut SessionState::new(), ctx) {
                Err(Error::Roll(RollError::TooManyCombinations(_))) => return Ok(()),
                result => result.unwrap(),
            };
            prop_assert!((result.distribution.total_mass() - 1.0).abs() < TOLERANCE);
            prop_assert!(result.distribution.probability(result.rolled) > 0.0);
            prop_assert!(result.rolled <= result.max);
        }

        #[test]
        fn prop_single_die_is_uniform(n in 1u32..=100) {
            let result = interpret(&format!("d{}", n), &mut SessionState::new()).unwrap();
            prop_assert_eq!(result.distribution.len(), n as usize);
            for face in 1..=Int::from(n) {
                prop_assert!((result.distribution.probability(face) - 1.0 / n as Float).abs() < TOLERANCE);
            }
        }

        #[test]
        fn prop_advantage_dominates(n in 1u32..=30) {
            let mut session = SessionState::new();
            let plain = interpret(&format!("d{}", n), &mut session).unwrap().distribution;
            let adv = interpret(&format!("adv d{}", n), &mut session).unwrap().distribution;
            let dis = interpret(&format!("dadv d{}", n), &mut session).unwrap().distribution;
            for k in 1..=Int::from(n) {
                prop_assert!(adv.cumulative(k) <= plain.cumulative(k) + TOLERANCE);
                prop_assert!(dis.cumulative(k) + TOLERANCE >= plain.cumulative(k));
            }
        }
    }
}
