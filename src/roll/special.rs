use super::{
    distribution::Distribution,
    error::RollError,
    eval::{pairs, required},
    Evaluate, RResult, RollContext, Roller,
};
use crate::common::*;
use crate::parse::ast::*;
use std::rc::Rc;

/// Counts below one are invalid; counts above the roll cap are refused.
fn repeat_count(count: Int, max: Option<usize>) -> RResult<usize> {
    match usize::try_from(count) {
        Ok(n) if n >= 1 => match max {
            Some(max) if n > max => Err(RollError::TooManyRepeats(count)),
            _ => Ok(n),
        },
        _ => Err(RollError::InvalidRepeatCount(count)),
    }
}

impl Evaluate for Repeat {
    /// Rolls the expression `count` times from scratch, keeping the best (or worst).
    fn sample<R: Roller>(&self, _: NodeId, ctx: &mut RollContext<R>) -> RResult<Int> {
        let expr = required(&self.expr, self.kind)?;
        let count = match &self.count {
            Some(node) => ctx.sample(node)?,
            None => Repeat::DEFAULT_COUNT,
        };
        let count = repeat_count(count, ctx.max_rolls())?;
        let mut kept = ctx.sample(expr)?;
        for _ in 1..count {
            ctx.resample(expr);
            kept = self.kind.pick(kept, ctx.sample(expr)?);
        }
        Ok(kept)
    }

    fn distribution<R: Roller>(
        &self,
        _: NodeId,
        ctx: &mut RollContext<R>,
    ) -> RResult<Distribution> {
        let field = ctx.distribution(required(&self.expr, self.kind)?)?;
        let counts = match &self.count {
            Some(node) => ctx.distribution(node)?,
            None => Rc::new(Distribution::point(Repeat::DEFAULT_COUNT)),
        };
        let kind = self.kind;
        let mut branches = Vec::with_capacity(counts.len());
        for (&count, &weight) in counts.iter() {
            let n = repeat_count(count, ctx.max_rolls())?;
            let cost = pairs(&field, &field).saturating_mul(n as u64 - 1);
            ctx.count_combinations(cost, self)?;
            branches.push((weight, field.repeat(n, |a, b| kind.pick(a, b))));
        }
        Ok(Distribution::mix(branches))
    }
}

impl Drop {
    fn parts(&self) -> RResult<(&Dice, &Superlative)> {
        let dice = required(&self.dice, "drop")?;
        let which = required(&self.which, "drop")?;
        match (&dice.kind, &which.kind) {
            (NodeKind::Dice(d), NodeKind::Superlative(s)) => Ok((d, s)),
            _ => Err(RollError::MissingOperand(String::from("drop"))),
        }
    }
}

impl Evaluate for Drop {
    /// Drawn from the exact distribution, which is cached under this node's id.
    fn sample<R: Roller>(&self, id: NodeId, ctx: &mut RollContext<R>) -> RResult<Int> {
        let field = ctx.field(id, |ctx| self.distribution(id, ctx))?;
        let u = ctx.unit();
        // enumeration always yields at least one outcome
        Ok(field.sample(u).unwrap_or_default())
    }

    /// Enumerates every face sequence, keeping what survives the drop.
    fn distribution<R: Roller>(
        &self,
        _: NodeId,
        ctx: &mut RollContext<R>,
    ) -> RResult<Distribution> {
        let (dice, which) = self.parts()?;
        let combinations = ctx.count_sequences(dice)?;
        let num = dice.num as usize;
        let sides = Int::from(dice.sides.get());
        let keep = num.saturating_sub(which.n as usize);
        let mass = 1.0 / combinations as Float;

        let mut ret = Distribution::default();
        let mut faces = vec![1; num];
        let mut sorted = Vec::with_capacity(num);
        loop {
            sorted.clone_from(&faces);
            sorted.sort_unstable();
            let kept = match which.extreme {
                Extreme::Lowest => &sorted[num - keep..],
                Extreme::Highest => &sorted[..keep],
            };
            ret.add(kept.iter().sum(), mass);

            // odometer step
            let mut i = 0;
            loop {
                if i == num {
                    return Ok(ret);
                }
                if faces[i] < sides {
                    faces[i] += 1;
                    break;
                }
                faces[i] = 1;
                i += 1;
            }
        }
    }
}

enum Mode<'a> {
    /// Counts the dice of a lone pool that pass against the other side.
    Count {
        dice: &'a Dice,
        other: &'a Node,
        dice_on_left: bool,
    },
    /// 1 when the comparison holds, else 0.
    Single { left: &'a Node, right: &'a Node },
}

impl Comparison {
    fn mode(&self) -> RResult<Mode<'_>> {
        let left = required(&self.left, self.op)?;
        let right = required(&self.right, self.op)?;
        Ok(match (left.as_dice(), right.as_dice()) {
            (Some(dice), None) => Mode::Count {
                dice,
                other: right,
                dice_on_left: true,
            },
            (None, Some(dice)) => Mode::Count {
                dice,
                other: left,
                dice_on_left: false,
            },
            _ => Mode::Single { left, right },
        })
    }

    fn passes(&self, face: Int, other: Int, dice_on_left: bool) -> bool {
        if dice_on_left {
            self.op.holds(face, other)
        } else {
            self.op.holds(other, face)
        }
    }
}

impl Evaluate for Comparison {
    fn sample<R: Roller>(&self, _: NodeId, ctx: &mut RollContext<R>) -> RResult<Int> {
        match self.mode()? {
            Mode::Count {
                dice,
                other,
                dice_on_left,
            } => {
                let target = ctx.sample(other)?;
                let faces = ctx.roll_dice(dice)?;
                let hits = faces
                    .into_iter()
                    .filter(|&face| self.passes(face, target, dice_on_left))
                    .count();
                Ok(hits as Int)
            }
            Mode::Single { left, right } => {
                let left = ctx.sample(left)?;
                let right = ctx.sample(right)?;
                Ok(Int::from(self.op.holds(left, right)))
            }
        }
    }

    fn distribution<R: Roller>(
        &self,
        _: NodeId,
        ctx: &mut RollContext<R>,
    ) -> RResult<Distribution> {
        match self.mode()? {
            Mode::Count {
                dice,
                other,
                dice_on_left,
            } => {
                let targets = ctx.distribution(other)?;
                let num = u64::from(dice.num);
                let per_target = num
                    .saturating_mul(num + 1)
                    .saturating_add(u64::from(dice.sides.get()));
                ctx.count_combinations(per_target.saturating_mul(targets.len() as u64), self)?;
                let sides = Int::from(dice.sides.get());
                let branches = targets.iter().map(|(&target, &weight)| {
                    let hits = (1..=sides)
                        .filter(|&face| self.passes(face, target, dice_on_left))
                        .count();
                    let p = hits as Float / sides as Float;
                    let die = Distribution::from_masses([(0, 1.0 - p), (1, p)]);
                    let mut pool = Distribution::point(0);
                    for _ in 0..dice.num {
                        pool = pool.combine(&die, |x, y| x + y);
                    }
                    (weight, pool)
                });
                Ok(Distribution::mix(branches))
            }
            Mode::Single { left, right } => {
                let left = ctx.distribution(left)?;
                let right = ctx.distribution(right)?;
                ctx.count_combinations(pairs(&left, &right), self)?;
                let op = self.op;
                Ok(left.combine(&right, |x, y| Int::from(op.holds(x, y))))
            }
        }
    }
}
