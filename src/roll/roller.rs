use crate::common::{Float, Int, Sides};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// Source of randomness for one command.
pub trait Roller {
    /// A uniform face in `1..=sides`.
    fn roll(&mut self, sides: Sides) -> Int;

    /// A uniform draw in `[0, 1)`, used for inverse-CDF sampling.
    fn unit(&mut self) -> Float;

    fn roll_n(&mut self, num: usize, sides: Sides) -> Vec<Int> {
        (0..num).map(|_| self.roll(sides)).collect()
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: Sides) -> Int {
        Int::from(self.gen_range(1..=sides.get()))
    }

    fn unit(&mut self) -> Float {
        self.gen()
    }

    fn roll_n(&mut self, num: usize, sides: Sides) -> Vec<Int> {
        Uniform::new_inclusive(1, sides.get())
            .sample_iter(self)
            .take(num)
            .map(Int::from)
            .collect()
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;
    use crate::common::UInt;

    /// Cycles through faces: `initial`, `initial + step`, ... wrapped to the die.
    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
        unit: Float,
    }

    impl StepRoller {
        pub fn new(initial: UInt, step: UInt) -> Self {
            Self {
                current: initial,
                step,
                unit: 0.5,
            }
        }

        pub fn with_unit(mut self, unit: Float) -> Self {
            self.unit = unit;
            self
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, sides: Sides) -> Int {
            let ret = (self.current - 1) % sides.get() + 1;
            self.current += self.step;
            Int::from(ret)
        }

        fn unit(&mut self) -> Float {
            self.unit
        }
    }

    #[test]
    fn test_step_roller() {
        let d6 = Sides::new(6).unwrap();
        let mut roller = StepRoller::new(4, 1);
        assert_eq!(roller.roll_n(5, d6), [4, 5, 6, 1, 2]);
    }
}
