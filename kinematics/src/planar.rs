//! Planar two-link arm working in the z = 0 plane.

use crate::{CartesianPose, JointConfiguration, JointOrder, KinematicsSolver, Result, encode};
use nalgebra::{DMatrix, DVector};

pub struct TwoLinkArm {
    pub upper_length: f64,
    pub forearm_length: f64,
    order: JointOrder,
}

impl TwoLinkArm {
    pub fn new(upper_length: f64, forearm_length: f64) -> Self {
        Self::with_joint_names(upper_length, forearm_length, "shoulder", "elbow")
    }

    pub fn with_joint_names(
        upper_length: f64,
        forearm_length: f64,
        shoulder: &str,
        elbow: &str,
    ) -> Self {
        Self {
            upper_length,
            forearm_length,
            order: JointOrder::new([shoulder, elbow]),
        }
    }

    pub fn reach(&self) -> f64 {
        self.upper_length + self.forearm_length
    }

    fn joint_angles(&self, q: &JointConfiguration) -> Result<(f64, f64)> {
        let angles = encode(q, &self.order)?;
        Ok((angles[0], angles[1]))
    }
}

impl KinematicsSolver for TwoLinkArm {
    fn joint_order(&self) -> &JointOrder {
        &self.order
    }

    /// Pose is `[x, y, 0, 0, 0, heading]`.
    fn forward_kinematics(&self, q: &JointConfiguration) -> Result<CartesianPose> {
        let (shoulder, elbow) = self.joint_angles(q)?;
        let heading = shoulder + elbow;

        let x = self.upper_length * shoulder.cos() + self.forearm_length * heading.cos();
        let y = self.upper_length * shoulder.sin() + self.forearm_length * heading.sin();

        Ok(CartesianPose::from_vec(vec![x, y, 0.0, 0.0, 0.0, heading]))
    }

    /// Elbow-down solution for the target position projected onto the arm plane.
    /// Orientation components are ignored.
    fn inverse_kinematics(&self, pose: &CartesianPose) -> Option<DVector<f64>> {
        if pose.len() < 2 {
            return None;
        }
        let (x, y) = (pose[0], pose[1]);
        let (l1, l2) = (self.upper_length, self.forearm_length);

        let cos_elbow = (x * x + y * y - l1 * l1 - l2 * l2) / (2.0 * l1 * l2);
        if !cos_elbow.is_finite() || cos_elbow.abs() > 1.0 + 1e-12 {
            return None;
        }
        let elbow = cos_elbow.clamp(-1.0, 1.0).acos();
        let shoulder = y.atan2(x) - (l2 * elbow.sin()).atan2(l1 + l2 * elbow.cos());

        Some(DVector::from_vec(vec![shoulder, elbow]))
    }

    fn jacobian_transpose(&self, q: &JointConfiguration) -> Result<DMatrix<f64>> {
        let (shoulder, elbow) = self.joint_angles(q)?;
        let heading = shoulder + elbow;
        let (l1, l2) = (self.upper_length, self.forearm_length);

        #[rustfmt::skip]
        let jt = DMatrix::from_row_slice(2, 6, &[
            -l1 * shoulder.sin() - l2 * heading.sin(), l1 * shoulder.cos() + l2 * heading.cos(), 0.0, 0.0, 0.0, 1.0,
            -l2 * heading.sin(),                       l2 * heading.cos(),                       0.0, 0.0, 0.0, 1.0,
        ]);
        Ok(jt)
    }
}
