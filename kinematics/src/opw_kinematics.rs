use crate::jacobian::numeric_jacobian_transpose;
use crate::{CartesianPose, JointConfiguration, JointOrder, KinematicsSolver, Result, encode};
use nalgebra::{DMatrix, DVector, Isometry3, Vector3};
use rs_opw_kinematics::kinematic_traits::Kinematics;
use rs_opw_kinematics::kinematics_impl::OPWKinematics;
use rs_opw_kinematics::parameters::opw_kinematics::Parameters;

const JACOBIAN_STEP: f64 = 1e-6;

/// Six-axis arm with an ortho-parallel wrist.
///
/// Poses are `[x, y, z, rx, ry, rz]`: flange translation followed by the
/// rotation vector (axis times angle).
pub struct OpwKinematicsSolver {
    parameters: Parameters,
    order: JointOrder,
}

impl OpwKinematicsSolver {
    pub fn new(c1: f64, c2: f64, c3: f64, c4: f64, a1: f64, a2: f64, b: f64) -> Self {
        let parameters = Parameters {
            c1, c2, c3, c4, a1, a2, b,
            offsets: [0.0; 6],
            sign_corrections: [1; 6],
            dof: 6,
        };
        let order = JointOrder::new((1..=6).map(|i| format!("joint_{}", i)));
        Self { parameters, order }
    }

    pub fn inverse_isometry(&self, pose: &Isometry3<f64>) -> Vec<[f64; 6]> {
        let solver = OPWKinematics::new(self.parameters);
        solver.inverse(pose)
    }

    pub fn forward_isometry(&self, joints: &[f64; 6]) -> Isometry3<f64> {
        let solver = OPWKinematics::new(self.parameters);
        solver.forward(joints)
    }

    fn joints(&self, q: &JointConfiguration) -> Result<[f64; 6]> {
        let angles = encode(q, &self.order)?;
        let mut joints = [0.0; 6];
        joints.copy_from_slice(angles.as_slice());
        Ok(joints)
    }
}

pub fn isometry_to_pose(iso: &Isometry3<f64>) -> CartesianPose {
    let t = iso.translation.vector;
    let r = iso.rotation.scaled_axis();
    CartesianPose::from_vec(vec![t.x, t.y, t.z, r.x, r.y, r.z])
}

pub fn pose_to_isometry(pose: &CartesianPose) -> Option<Isometry3<f64>> {
    if pose.len() < 6 {
        return None;
    }
    Some(Isometry3::new(
        Vector3::new(pose[0], pose[1], pose[2]),
        Vector3::new(pose[3], pose[4], pose[5]),
    ))
}

impl KinematicsSolver for OpwKinematicsSolver {
    fn joint_order(&self) -> &JointOrder {
        &self.order
    }

    fn forward_kinematics(&self, q: &JointConfiguration) -> Result<CartesianPose> {
        let joints = self.joints(q)?;
        Ok(isometry_to_pose(&self.forward_isometry(&joints)))
    }

    /// First finite solution; poses without orientation are unreachable.
    fn inverse_kinematics(&self, pose: &CartesianPose) -> Option<DVector<f64>> {
        let target = pose_to_isometry(pose)?;
        self.inverse_isometry(&target)
            .into_iter()
            .find(|solution| solution.iter().all(|a| a.is_finite()))
            .map(|solution| DVector::from_column_slice(&solution))
    }

    fn jacobian_transpose(&self, q: &JointConfiguration) -> Result<DMatrix<f64>> {
        numeric_jacobian_transpose(self, q, JACOBIAN_STEP)
    }
}
