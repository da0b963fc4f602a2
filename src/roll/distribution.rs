use crate::common::{Float, Int, Sides};
use std::collections::btree_map::{self, BTreeMap};

/// Exact probability mass over integer outcomes.
///
/// Masses sum to one; outcomes with no mass are never stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution(BTreeMap<Int, Float>);

impl Distribution {
    /// The certain outcome `value`.
    pub fn point(value: Int) -> Self {
        Self(BTreeMap::from([(value, 1.0)]))
    }

    /// A single fair die.
    pub fn uniform(sides: Sides) -> Self {
        let mass = 1.0 / Float::from(sides.get());
        Self((1..=Int::from(sides.get())).map(|face| (face, mass)).collect())
    }

    /// Builds a distribution from raw `(outcome, mass)` pairs, merging duplicates.
    pub fn from_masses(masses: impl IntoIterator<Item = (Int, Float)>) -> Self {
        let mut ret = Self::default();
        for (value, mass) in masses {
            ret.add(value, mass);
        }
        ret
    }

    pub(crate) fn add(&mut self, value: Int, mass: Float) {
        if mass > 0.0 {
            *self.0.entry(value).or_insert(0.0) += mass;
        }
    }

    /// Distribution of `op(x, y)` for independent `x ~ self` and `y ~ other`.
    pub fn combine(&self, other: &Self, mut op: impl FnMut(Int, Int) -> Int) -> Self {
        let mut ret = Self::default();
        for (&x, &px) in &self.0 {
            for (&y, &py) in &other.0 {
                ret.add(op(x, y), px * py);
            }
        }
        ret
    }

    /// Like [`combine`](Self::combine), for operators that can fail.
    pub fn try_combine<E>(
        &self,
        other: &Self,
        mut op: impl FnMut(Int, Int) -> Result<Int, E>,
    ) -> Result<Self, E> {
        let mut ret = Self::default();
        for (&x, &px) in &self.0 {
            for (&y, &py) in &other.0 {
                ret.add(op(x, y)?, px * py);
            }
        }
        Ok(ret)
    }

    /// Combines `n` independent copies of `self` under `op`.
    ///
    /// `n` must be at least one.
    pub fn repeat(&self, n: usize, mut op: impl FnMut(Int, Int) -> Int) -> Self {
        let mut ret = self.clone();
        for _ in 1..n {
            ret = ret.combine(self, &mut op);
        }
        ret
    }

    /// Mixes distributions, each weighted by the probability of its branch.
    pub fn mix(branches: impl IntoIterator<Item = (Float, Self)>) -> Self {
        let mut ret = Self::default();
        for (weight, branch) in branches {
            for (value, mass) in branch.0 {
                ret.add(value, weight * mass);
            }
        }
        ret
    }

    pub fn probability(&self, value: Int) -> Float {
        self.0.get(&value).copied().unwrap_or(0.0)
    }

    /// `P(X <= value)`.
    pub fn cumulative(&self, value: Int) -> Float {
        self.0.range(..=value).map(|(_, p)| p).sum()
    }

    pub fn total_mass(&self) -> Float {
        self.0.values().sum()
    }

    pub fn expected_value(&self) -> Float {
        self.0.iter().map(|(&v, &p)| v as Float * p).sum()
    }

    pub fn max(&self) -> Option<Int> {
        self.0.keys().next_back().copied()
    }

    pub fn min(&self) -> Option<Int> {
        self.0.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Int, Float> {
        self.0.iter()
    }

    /// Inverse-CDF lookup of a uniform draw `u` in `[0, 1)`.
    pub fn sample(&self, u: Float) -> Option<Int> {
        let mut acc = 0.0;
        for (&value, &mass) in &self.0 {
            acc += mass;
            if u < acc {
                return Some(value);
            }
        }
        // rounding can leave the total a hair under one
        self.max()
    }
}

impl<'a> IntoIterator for &'a Distribution {
    type Item = (&'a Int, &'a Float);
    type IntoIter = btree_map::Iter<'a, Int, Float>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Distribution> for BTreeMap<Int, Float> {
    fn from(d: Distribution) -> Self {
        d.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_utils::*;

    #[test]
    fn test_uniform() {
        let d = Distribution::uniform(sides(4));
        assert_eq!(d.len(), 4);
        for face in 1..=4 {
            assert_close(d.probability(face), 0.25);
        }
        assert_close(d.total_mass(), 1.0);
        assert_close(d.expected_value(), 2.5);
    }

    #[test]
    fn test_combine_sum() {
        let d6 = Distribution::uniform(sides(6));
        let two = d6.combine(&d6, |x, y| x + y);
        assert_eq!(two.len(), 11);
        assert_eq!((two.min(), two.max()), (Some(2), Some(12)));
        assert_close(two.probability(7), 6.0 / 36.0);
        assert_close(two.probability(2), 1.0 / 36.0);
        assert_close(two.total_mass(), 1.0);
    }

    #[test]
    fn test_combine_drops_empty_outcomes() {
        let coin = Distribution::from_masses([(0, 0.0), (1, 1.0)]);
        assert_eq!(coin.len(), 1);
        assert_eq!(coin.repeat(5, |x, y| x + y), Distribution::point(5));
    }

    #[test]
    fn test_try_combine() {
        let d = Distribution::from_masses([(0, 0.5), (2, 0.5)]);
        let ok = Distribution::point(4).try_combine(&Distribution::point(2), |x, y| {
            Ok::<_, ()>(x / y)
        });
        assert_eq!(ok, Ok(Distribution::point(2)));
        let err =
            Distribution::point(4).try_combine(&d, |x, y| if y == 0 { Err(()) } else { Ok(x / y) });
        assert_eq!(err, Err(()));
    }

    #[test]
    fn test_repeat_max() {
        let d20 = Distribution::uniform(sides(20));
        let adv = d20.repeat(2, Int::max);
        assert_close(adv.probability(20), 39.0 / 400.0);
        assert_close(adv.probability(1), 1.0 / 400.0);
        assert_close(adv.total_mass(), 1.0);
        assert_eq!(d20.repeat(1, Int::max), d20);
    }

    #[test]
    fn test_mix() {
        let mixed = Distribution::mix([
            (0.25, Distribution::point(1)),
            (0.75, Distribution::from_masses([(1, 0.5), (2, 0.5)])),
        ]);
        assert_close(mixed.probability(1), 0.25 + 0.375);
        assert_close(mixed.probability(2), 0.375);
    }

    #[test]
    fn test_cumulative_and_sample() {
        let d4 = Distribution::uniform(sides(4));
        assert_close(d4.cumulative(2), 0.5);
        assert_close(d4.cumulative(0), 0.0);
        assert_close(d4.cumulative(10), 1.0);
        assert_eq!(d4.sample(0.0), Some(1));
        assert_eq!(d4.sample(0.3), Some(2));
        assert_eq!(d4.sample(0.99), Some(4));
        assert_eq!(d4.sample(1.0), Some(4));
        assert_eq!(Distribution::default().sample(0.5), None);
    }
}
