use super::{distribution::Distribution, error::RollError, RResult, RollContext, Roller};
use crate::common::*;
use crate::parse::ast::*;
use std::rc::Rc;

/// Sampling and exact distribution of a node kind.
///
/// Implementations recurse through [`RollContext::sample`] and
/// [`RollContext::distribution`] so child results stay memoized.
#[enum_dispatch::enum_dispatch]
pub trait Evaluate {
    fn sample<R: crate::roll::Roller>(
        &self,
        id: crate::parse::ast::NodeId,
        ctx: &mut crate::roll::RollContext<R>,
    ) -> Result<crate::common::Int, crate::roll::RollError>;

    fn distribution<R: crate::roll::Roller>(
        &self,
        id: crate::parse::ast::NodeId,
        ctx: &mut crate::roll::RollContext<R>,
    ) -> Result<crate::roll::Distribution, crate::roll::RollError>;
}

pub(super) fn required<'a>(slot: &'a Option<Box<Node>>, op: impl ToString) -> RResult<&'a Node> {
    slot.as_deref()
        .ok_or_else(|| RollError::MissingOperand(op.to_string()))
}

/// How many outcome pairs combining `left` with `right` visits.
pub(super) fn pairs(left: &Distribution, right: &Distribution) -> u64 {
    (left.len() as u64).saturating_mul(right.len() as u64)
}

impl Dice {
    /// Outcome pairs visited by convolving the pool one die at a time.
    fn convolution_cost(&self) -> u64 {
        let num = u64::from(self.num);
        let sides = u64::from(self.sides.get());
        // the running sum holds (i * (sides - 1) + 1) outcomes before die i
        let spread = (sides - 1)
            .saturating_mul(num)
            .saturating_mul(num.saturating_sub(1))
            / 2;
        sides.saturating_mul(num.saturating_add(spread))
    }
}

impl Evaluate for Value {
    fn sample<R: Roller>(&self, _: NodeId, _: &mut RollContext<R>) -> RResult<Int> {
        Ok(self.0)
    }

    fn distribution<R: Roller>(&self, _: NodeId, _: &mut RollContext<R>) -> RResult<Distribution> {
        Ok(Distribution::point(self.0))
    }
}

impl Evaluate for Dice {
    fn sample<R: Roller>(&self, _: NodeId, ctx: &mut RollContext<R>) -> RResult<Int> {
        Ok(ctx.roll_dice(self)?.into_iter().sum())
    }

    fn distribution<R: Roller>(
        &self,
        _: NodeId,
        ctx: &mut RollContext<R>,
    ) -> RResult<Distribution> {
        ctx.count_combinations(self.convolution_cost(), self)?;
        let face = Distribution::uniform(self.sides);
        let mut ret = Distribution::point(0);
        for _ in 0..self.num {
            ret = ret.combine(&face, |x, y| x + y);
        }
        Ok(ret)
    }
}

impl Evaluate for Binary {
    fn sample<R: Roller>(&self, _: NodeId, ctx: &mut RollContext<R>) -> RResult<Int> {
        // a lone sign reads its missing left side as zero
        let left = match &self.left {
            Some(node) => ctx.sample(node)?,
            None => 0,
        };
        let right = ctx.sample(required(&self.right, self.op)?)?;
        self.op.apply(left, right)
    }

    fn distribution<R: Roller>(
        &self,
        _: NodeId,
        ctx: &mut RollContext<R>,
    ) -> RResult<Distribution> {
        let left = match &self.left {
            Some(node) => ctx.distribution(node)?,
            None => Rc::new(Distribution::point(0)),
        };
        let right = ctx.distribution(required(&self.right, self.op)?)?;
        ctx.count_combinations(pairs(&left, &right), self)?;
        let op = self.op;
        left.try_combine(&right, |x, y| op.apply(x, y))
    }
}

impl Evaluate for Superlative {
    fn sample<R: Roller>(&self, _: NodeId, _: &mut RollContext<R>) -> RResult<Int> {
        Err(RollError::Standalone(self.to_string()))
    }

    fn distribution<R: Roller>(&self, _: NodeId, _: &mut RollContext<R>) -> RResult<Distribution> {
        Err(RollError::Standalone(self.to_string()))
    }
}
