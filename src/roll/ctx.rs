use super::{
    crit::CriticalRoll, distribution::Distribution, error::RollError, roller::Roller, Evaluate,
    RResult,
};
use crate::common::*;
use crate::parse::ast::{Dice, Node, NodeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// The sampled outcome of a node together with its exact distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: Int,
    pub distribution: Rc<Distribution>,
}

/// Evaluation state for the tree of a single command.
///
/// Outcomes and distributions are cached per node, so evaluating a node twice
/// yields the same roll. [`resample`](Self::resample) forgets the outcomes of a
/// subtree to re-roll it while keeping its distributions.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    max_combinations: Option<u64>,
    rolls: usize,
    combinations: u64,
    roller: R,
    outcomes: HashMap<NodeId, Int>,
    fields: HashMap<NodeId, Rc<Distribution>>,
    criticals: Vec<CriticalRoll>,
}

impl<R: Roller> RollContext<R> {
    pub const DEFAULT_MAX_ROLLS: usize = 1000;
    pub const DEFAULT_MAX_COMBINATIONS: u64 = 1_000_000;

    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            max_combinations: Some(Self::DEFAULT_MAX_COMBINATIONS),
            rolls: 0,
            combinations: 0,
            roller,
            outcomes: HashMap::new(),
            fields: HashMap::new(),
            criticals: Vec::new(),
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    /// No limit on dice rolled nor on the work spent solving.
    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller).with_max_combinations(None)
    }

    /// Caps the pairs of outcomes combined while solving, summed over the tree.
    pub fn with_max_combinations(mut self, max: Option<u64>) -> Self {
        self.max_combinations = max;
        self
    }

    /// Samples `node` and computes its distribution, both memoized.
    pub fn evaluate(&mut self, node: &Node) -> RResult<Evaluation> {
        let value = self.sample(node)?;
        let distribution = self.distribution(node)?;
        Ok(Evaluation {
            value,
            distribution,
        })
    }

    pub fn sample(&mut self, node: &Node) -> RResult<Int> {
        if let Some(&value) = self.outcomes.get(&node.id) {
            return Ok(value);
        }
        let value = node.kind.sample(node.id, self)?;
        self.outcomes.insert(node.id, value);
        Ok(value)
    }

    pub fn distribution(&mut self, node: &Node) -> RResult<Rc<Distribution>> {
        self.field(node.id, |ctx| node.kind.distribution(node.id, ctx))
    }

    pub(crate) fn field(
        &mut self,
        id: NodeId,
        compute: impl FnOnce(&mut Self) -> RResult<Distribution>,
    ) -> RResult<Rc<Distribution>> {
        if let Some(field) = self.fields.get(&id) {
            return Ok(Rc::clone(field));
        }
        let field = Rc::new(compute(self)?);
        self.fields.insert(id, Rc::clone(&field));
        Ok(field)
    }

    /// Forgets the sampled outcomes of `node` and everything below it.
    pub fn resample(&mut self, node: &Node) {
        self.outcomes.remove(&node.id);
        for child in node.children() {
            self.resample(child);
        }
    }

    pub fn is_sampled(&self, node: &Node) -> bool {
        self.outcomes.contains_key(&node.id)
    }

    fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls += n;
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(RollError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    /// Rolls every die of the pool, recording critical faces.
    pub(crate) fn roll_dice(&mut self, dice: &Dice) -> RResult<Vec<Int>> {
        let num = dice.num as usize;
        self.count_rolls(num)?;
        let faces = self.roller.roll_n(num, dice.sides);
        if dice.critical {
            for (i, &face) in faces.iter().enumerate() {
                if let Some(kind) = CritType::of(face, dice.sides) {
                    self.criticals.push(CriticalRoll::new(*dice, i + 1, face, kind));
                }
            }
        }
        Ok(faces)
    }

    pub(crate) fn unit(&mut self) -> Float {
        self.roller.unit()
    }

    /// Charges `n` combinations to the budget before solving `what`.
    ///
    /// A refused charge is not kept, so a smaller request may still succeed.
    pub(crate) fn count_combinations(&mut self, n: u64, what: impl fmt::Display) -> RResult<()> {
        let total = self.combinations.saturating_add(n);
        if self.max_combinations.map_or(false, |max| total > max) {
            return Err(RollError::TooManyCombinations(what.to_string()));
        }
        self.combinations = total;
        Ok(())
    }

    /// Charges every face sequence of `dice`, returning how many there are.
    pub(crate) fn count_sequences(&mut self, dice: &Dice) -> RResult<u64> {
        let n = u64::from(dice.sides.get())
            .checked_pow(dice.num)
            .ok_or_else(|| RollError::TooManyCombinations(dice.to_string()))?;
        self.count_combinations(n, dice)?;
        Ok(n)
    }

    pub fn max_rolls(&self) -> Option<usize> {
        self.max_rolls
    }

    pub fn rolls(&self) -> usize {
        self.rolls
    }

    pub fn combinations(&self) -> u64 {
        self.combinations
    }

    pub fn criticals(&self) -> &[CriticalRoll] {
        &self.criticals
    }

    pub fn take_criticals(&mut self) -> Vec<CriticalRoll> {
        std::mem::take(&mut self.criticals)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(Some(Self::DEFAULT_MAX_ROLLS), rand::thread_rng())
    }
}
