use crate::{PlannerError, Result};
use kinematics::{
    CartesianPose, JointConfiguration, JointOrder, KinematicsSolver, Position, pose_distance,
    position,
};

/// Start configuration, goal pose and the nodes accepted so far.
///
/// Nodes are only ever appended. Each one was derived from its predecessor
/// (or from the start) by a single accepted step.
#[derive(Debug, Clone)]
pub struct MotionPath {
    start: JointConfiguration,
    goal: CartesianPose,
    nodes: Vec<JointConfiguration>,
}

impl MotionPath {
    pub fn new(start: JointConfiguration, goal: CartesianPose) -> Result<Self> {
        if goal.len() < 6 {
            return Err(PlannerError::PoseTooShort { len: goal.len() });
        }
        Ok(Self {
            start,
            goal,
            nodes: Vec::new(),
        })
    }

    pub fn goal(&self) -> &CartesianPose {
        &self.goal
    }

    pub fn goal_point(&self) -> Position {
        position(&self.goal)
    }

    pub fn order(&self) -> &JointOrder {
        self.start.order()
    }

    pub fn nodes(&self) -> &[JointConfiguration] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Last accepted node, or the start configuration when nothing was accepted yet.
    pub fn tip(&self) -> &JointConfiguration {
        self.nodes.last().unwrap_or(&self.start)
    }

    pub fn dist_to_goal<K>(&self, kinematics: &K) -> Result<f64>
    where
        K: KinematicsSolver + ?Sized,
    {
        let tip_pose = kinematics.forward_kinematics(self.tip())?;
        Ok(pose_distance(&tip_pose, &self.goal))
    }

    pub(crate) fn append(&mut self, nodes: Vec<JointConfiguration>) {
        self.nodes.extend(nodes);
    }
}
