use nalgebra::{DMatrix, DVector, Vector3};
use std::sync::Arc;
use thiserror::Error;

pub mod codec;
pub mod goal;
pub mod jacobian;
pub mod opw_kinematics;
pub mod planar;

pub use codec::{decode, encode};
pub use goal::{GoalResolution, resolve};
pub use planar::TwoLinkArm;

/// End-effector pose: position first, then orientation components.
pub type CartesianPose = DVector<f64>;

pub type Position = Vector3<f64>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    #[error("angle vector has {angles} entries but joint order has {keys}")]
    LengthMismatch { angles: usize, keys: usize },

    #[error("joint '{0}' is not part of this configuration")]
    UnknownJoint(String),
}

pub type Result<T> = std::result::Result<T, KinematicsError>;

/// Ordered list of joint names shared by every configuration of a planning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointOrder(Arc<[String]>);

impl JointOrder {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::<String>::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|n| n == name)
    }
}

/// A joint-name to angle mapping that iterates in its [`JointOrder`].
///
/// Instances are only built through [`codec::decode`], so the angle vector
/// always has exactly one entry per name.
#[derive(Debug, Clone, PartialEq)]
pub struct JointConfiguration {
    order: JointOrder,
    angles: DVector<f64>,
}

impl JointConfiguration {
    pub fn order(&self) -> &JointOrder {
        &self.order
    }

    pub fn angles(&self) -> &DVector<f64> {
        &self.angles
    }

    pub fn len(&self) -> usize {
        self.angles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.order.index_of(name).map(|i| self.angles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.order
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.angles.iter().copied())
    }
}

/// The kinematics service a planner steers with.
///
/// Implementations must be deterministic: the same configuration always
/// yields the same pose and Jacobian.
pub trait KinematicsSolver {
    /// Joint order that inverse kinematics solutions are expressed in.
    fn joint_order(&self) -> &JointOrder;

    fn forward_kinematics(&self, q: &JointConfiguration) -> Result<CartesianPose>;

    /// Returns joint angles in [`Self::joint_order`], or `None` when the pose is unreachable.
    fn inverse_kinematics(&self, pose: &CartesianPose) -> Option<DVector<f64>>;

    /// Transpose of the pose Jacobian: one row per joint, one column per pose component.
    fn jacobian_transpose(&self, q: &JointConfiguration) -> Result<DMatrix<f64>>;
}

/// First three pose components. Missing components read as zero.
pub fn position(pose: &CartesianPose) -> Position {
    Position::from_fn(|i, _| pose.get(i).copied().unwrap_or(0.0))
}

/// Euclidean distance over the components both poses have.
pub fn pose_distance(a: &CartesianPose, b: &CartesianPose) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (y - x) * (y - x))
        .sum::<f64>()
        .sqrt()
}
