//! Candidate generation for the two extension strategies.
//!
//! A [`Steering`] only proposes the next configuration. Collision checking
//! of the proposal, acceptance and termination live in
//! [`crate::PathExtender`], shared by both strategies.

use crate::extender::Strategy;
use crate::obstacles::CollisionGate;
use crate::{PlannerError, Result};
use kinematics::{
    CartesianPose, JointConfiguration, KinematicsSolver, Position, decode, position, resolve,
};
use nalgebra::DVector;
use rand::Rng;

/// Source of uniformly distributed reals.
pub trait Sampler {
    /// A value in `[low, high]`. Empty or unbounded ranges yield `low`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<R: Rng> Sampler for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low < high && (high - low).is_finite() {
            self.gen_range(low..=high)
        } else {
            low
        }
    }
}

/// What a steering strategy sees when proposing a step.
pub struct StepContext<'a> {
    pub kinematics: &'a dyn KinematicsSolver,
    pub gate: &'a CollisionGate<'a>,
    pub tip: &'a JointConfiguration,
    pub tip_pose: &'a CartesianPose,
    pub goal: &'a CartesianPose,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Proposal {
    Candidate(JointConfiguration),
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The sampled point itself is too close to an obstacle.
    SampleBlocked,
    NoIkSolution,
}

pub trait Steering {
    fn strategy(&self) -> Strategy;

    fn propose(&mut self, ctx: &StepContext<'_>) -> Result<Proposal>;
}

/// First six components of `goal - current`.
pub fn workspace_delta(goal: &CartesianPose, current: &CartesianPose) -> Result<DVector<f64>> {
    for pose in [goal, current] {
        if pose.len() < 6 {
            return Err(PlannerError::PoseTooShort { len: pose.len() });
        }
    }
    Ok(goal.rows(0, 6) - current.rows(0, 6))
}

/// Differential steering: `q + gain * J^T * dx`.
#[derive(Debug, Clone, Copy)]
pub struct JacobianTransposeSteering {
    pub gain: f64,
}

impl JacobianTransposeSteering {
    pub fn new(gain: f64) -> Self {
        Self { gain }
    }
}

impl Steering for JacobianTransposeSteering {
    fn strategy(&self) -> Strategy {
        Strategy::JacobianTranspose
    }

    fn propose(&mut self, ctx: &StepContext<'_>) -> Result<Proposal> {
        let jt = ctx.kinematics.jacobian_transpose(ctx.tip)?;
        if jt.nrows() != ctx.tip.len() || jt.ncols() != 6 {
            return Err(PlannerError::JacobianShape {
                rows: jt.nrows(),
                cols: jt.ncols(),
                joints: ctx.tip.len(),
            });
        }

        let d_x = workspace_delta(ctx.goal, ctx.tip_pose)?;
        let angles = ctx.tip.angles() + (jt * d_x) * self.gain;
        let candidate = decode(angles.as_slice(), ctx.tip.order())?;
        Ok(Proposal::Candidate(candidate))
    }
}

/// Samples a point in the box spanned by the tip and goal positions, grown
/// by `offset` on every side, and resolves it through inverse kinematics.
pub struct RandomizedSteering<'s, S: Sampler + ?Sized> {
    pub offset: f64,
    /// Minimum obstacle separation of the sampled point.
    pub sample_clearance: f64,
    sampler: &'s mut S,
}

impl<'s, S: Sampler + ?Sized> RandomizedSteering<'s, S> {
    pub fn new(offset: f64, sample_clearance: f64, sampler: &'s mut S) -> Self {
        Self {
            offset,
            sample_clearance,
            sampler,
        }
    }

    pub fn sample_point(&mut self, current: &Position, goal: &Position) -> Position {
        Position::from_fn(|axis, _| {
            let (c, g) = (current[axis], goal[axis]);
            self.sampler
                .uniform(c.min(g) - self.offset, c.max(g) + self.offset)
        })
    }
}

impl<S: Sampler + ?Sized> Steering for RandomizedSteering<'_, S> {
    fn strategy(&self) -> Strategy {
        Strategy::Randomized
    }

    fn propose(&mut self, ctx: &StepContext<'_>) -> Result<Proposal> {
        let point = self.sample_point(&position(ctx.tip_pose), &position(ctx.goal));
        if !ctx.gate.is_free(&point, self.sample_clearance) {
            return Ok(Proposal::Skip(SkipReason::SampleBlocked));
        }

        // Sampled position, goal orientation.
        let mut request = ctx.goal.clone();
        request.rows_mut(0, 3).copy_from(&point);

        match resolve(Some(&request), ctx.kinematics).into_solution() {
            Some(angles) => Ok(Proposal::Candidate(decode(
                angles.as_slice(),
                ctx.tip.order(),
            )?)),
            None => Ok(Proposal::Skip(SkipReason::NoIkSolution)),
        }
    }
}
