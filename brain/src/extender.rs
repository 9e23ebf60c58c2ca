use crate::config::ExtenderConfig;
use crate::obstacles::{CollisionGate, ObstacleWaves, WaveIndex};
use crate::path::MotionPath;
use crate::steering::{
    JacobianTransposeSteering, Proposal, RandomizedSteering, Sampler, StepContext, Steering,
};
use crate::{PlannerError, Result};
use kinematics::{JointConfiguration, KinematicsSolver, pose_distance, position};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    JacobianTranspose,
    Randomized,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::JacobianTranspose => write!(f, "jacobian-transpose"),
            Strategy::Randomized => write!(f, "randomized"),
        }
    }
}

/// Why an extension call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Tip is within `dist_thresh` of the goal.
    GoalReached,
    /// A proposed node was too close to an obstacle.
    Collision,
    /// The strategy accepted as many nodes as it is allowed per call.
    NodeLimit,
    /// Step or attempt budget ran out before any other condition held.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub termination: Termination,
    /// Nodes appended to the path by this call.
    pub appended: usize,
    pub attempts: usize,
}

impl Extension {
    pub fn reached_goal(&self) -> bool {
        self.termination == Termination::GoalReached
    }
}

/// Reported once for every node accepted into a path, after the extension
/// call has appended it.
#[derive(Debug)]
pub struct NodeEvent<'e> {
    pub strategy: Strategy,
    /// Position of the node in the path once appended.
    pub index: usize,
    pub configuration: &'e JointConfiguration,
    pub distance_to_goal: f64,
}

pub trait NodeObserver {
    fn on_node(&mut self, event: &NodeEvent<'_>);
}

impl<F> NodeObserver for F
where
    F: FnMut(&NodeEvent<'_>),
{
    fn on_node(&mut self, event: &NodeEvent<'_>) {
        self(event)
    }
}

struct Limits {
    attempts: usize,
    nodes: Option<usize>,
}

/// Grows a [`MotionPath`] against one obstacle field with one kinematics service.
pub struct PathExtender<'a> {
    kinematics: &'a dyn KinematicsSolver,
    waves: &'a ObstacleWaves,
    index: &'a dyn WaveIndex,
    config: ExtenderConfig,
    observer: Option<Box<dyn NodeObserver + 'a>>,
}

impl<'a> PathExtender<'a> {
    pub fn new(
        kinematics: &'a dyn KinematicsSolver,
        waves: &'a ObstacleWaves,
        index: &'a dyn WaveIndex,
        config: ExtenderConfig,
    ) -> Self {
        Self {
            kinematics,
            waves,
            index,
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl NodeObserver + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Walks the tip toward the goal with Jacobian-transpose steps until it
    /// converges, a step lands near an obstacle, or `max_steps` is spent.
    /// Steps accepted before a collision stay in the path.
    pub fn extend_toward_goal(&mut self, path: &mut MotionPath) -> Result<Extension> {
        let limits = Limits {
            attempts: self.config.max_steps,
            nodes: None,
        };
        let mut steering = JacobianTransposeSteering::new(self.config.step_gain);
        self.run(path, &mut steering, limits)
    }

    /// Hops toward the goal through inverse kinematics of random points near
    /// the tip-to-goal box. Failed samples produce no node and are not retried.
    pub fn extend_randomly<S>(&mut self, path: &mut MotionPath, sampler: &mut S) -> Result<Extension>
    where
        S: Sampler + ?Sized,
    {
        let mut steering = RandomizedSteering::new(
            self.config.random_offset,
            self.config.effective_sample_clearance(),
            sampler,
        );
        let limits = Limits {
            attempts: self.config.max_attempts,
            nodes: Some(self.config.max_random_nodes),
        };
        self.run(path, &mut steering, limits)
    }

    fn run(
        &mut self,
        path: &mut MotionPath,
        steering: &mut dyn Steering,
        limits: Limits,
    ) -> Result<Extension> {
        if path.order() != self.kinematics.joint_order() {
            return Err(PlannerError::JointOrderMismatch);
        }

        let strategy = steering.strategy();
        let gate = CollisionGate::new(self.waves, self.index, path.goal_point());
        let goal = path.goal().clone();
        let mut tip = path.tip().clone();
        let mut tip_pose = self.kinematics.forward_kinematics(&tip)?;
        let mut accepted = Vec::new();
        let mut distances = Vec::new();
        let mut attempts = 0;

        let termination = loop {
            if attempts >= limits.attempts {
                break Termination::Exhausted;
            }
            attempts += 1;

            let ctx = StepContext {
                kinematics: self.kinematics,
                gate: &gate,
                tip: &tip,
                tip_pose: &tip_pose,
                goal: &goal,
            };
            match steering.propose(&ctx)? {
                Proposal::Skip(reason) => {
                    log::trace!("{strategy} attempt {attempts} produced no node: {reason:?}");
                }
                Proposal::Candidate(q_new) => {
                    let pose_new = self.kinematics.forward_kinematics(&q_new)?;
                    if !gate.is_free(&position(&pose_new), self.config.min_clearance) {
                        break Termination::Collision;
                    }

                    let distance = pose_distance(&pose_new, &goal);
                    log::debug!("{strategy}: curr dist to goal: {distance:.4}");

                    accepted.push(q_new.clone());
                    distances.push(distance);
                    tip = q_new;
                    tip_pose = pose_new;
                }
            }

            if pose_distance(&tip_pose, &goal) <= self.config.dist_thresh {
                break Termination::GoalReached;
            }
            if limits.nodes.is_some_and(|max| accepted.len() >= max) {
                break Termination::NodeLimit;
            }
        };

        let extension = Extension {
            termination,
            appended: accepted.len(),
            attempts,
        };
        let first = path.len();
        path.append(accepted);
        if let Some(observer) = self.observer.as_mut() {
            let committed = path.nodes()[first..].iter().zip(distances);
            for (offset, (configuration, distance_to_goal)) in committed.enumerate() {
                observer.on_node(&NodeEvent {
                    strategy,
                    index: first + offset,
                    configuration,
                    distance_to_goal,
                });
            }
        }

        if termination == Termination::Exhausted {
            log::warn!(
                "{strategy} extension exhausted after {attempts} attempts with {} new nodes",
                extension.appended
            );
        } else {
            log::info!(
                "{strategy} extension stopped ({termination:?}): {} new nodes in {attempts} attempts",
                extension.appended
            );
        }
        Ok(extension)
    }
}
