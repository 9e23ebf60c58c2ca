//! Single-path motion extension for articulated manipulators.
//!
//! A [`MotionPath`] starts at a joint configuration and grows toward a goal
//! pose, one accepted node at a time, through a [`PathExtender`]. Two steering
//! strategies are available: a Jacobian-transpose walk and a randomized
//! inverse-kinematics hop. Every candidate is checked against a
//! wave-partitioned obstacle field before it is accepted.

use kinematics::KinematicsError;
use thiserror::Error;

pub mod config;
pub mod extender;
pub mod obstacles;
pub mod path;
pub mod steering;

pub use config::ExtenderConfig;
pub use extender::{Extension, NodeEvent, NodeObserver, PathExtender, Strategy, Termination};
pub use obstacles::{
    CollisionGate, DEFAULT_CLEARANCE, DistanceBands, ObstacleWaves, SingleWave, WaveIndex, is_free,
};
pub use path::MotionPath;
pub use steering::{
    JacobianTransposeSteering, Proposal, RandomizedSteering, Sampler, SkipReason, StepContext,
    Steering,
};

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    #[error("pose has {len} components, at least 6 are required")]
    PoseTooShort { len: usize },

    #[error("jacobian transpose is {rows}x{cols}, expected {joints}x6")]
    JacobianShape { rows: usize, cols: usize, joints: usize },

    #[error("joint order of the path does not match the kinematics solver")]
    JointOrderMismatch,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PlannerError {
    fn from(e: toml::de::Error) -> Self {
        PlannerError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
