use crate::{CartesianPose, KinematicsSolver};
use nalgebra::DVector;

/// Outcome of asking the kinematics service for a pose.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalResolution {
    /// No pose was given, so inverse kinematics never ran.
    NotAttempted,
    Unreachable,
    /// Joint angles in the solver's joint order.
    Solved(DVector<f64>),
}

impl GoalResolution {
    pub fn is_solved(&self) -> bool {
        matches!(self, GoalResolution::Solved(_))
    }

    pub fn solution(&self) -> Option<&DVector<f64>> {
        match self {
            GoalResolution::Solved(angles) => Some(angles),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<DVector<f64>> {
        match self {
            GoalResolution::Solved(angles) => Some(angles),
            _ => None,
        }
    }
}

pub fn resolve<K>(pose: Option<&CartesianPose>, kinematics: &K) -> GoalResolution
where
    K: KinematicsSolver + ?Sized,
{
    let Some(pose) = pose else {
        return GoalResolution::NotAttempted;
    };

    match kinematics.inverse_kinematics(pose) {
        Some(angles) => GoalResolution::Solved(angles),
        None => GoalResolution::Unreachable,
    }
}
