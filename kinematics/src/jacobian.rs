use crate::{JointConfiguration, KinematicsSolver, Result, decode, encode};
use nalgebra::DMatrix;

/// Jacobian transpose by central differences of forward kinematics.
///
/// Used by solvers without a closed-form Jacobian. `step` is the joint
/// perturbation in radians.
pub fn numeric_jacobian_transpose<K>(
    kinematics: &K,
    q: &JointConfiguration,
    step: f64,
) -> Result<DMatrix<f64>>
where
    K: KinematicsSolver + ?Sized,
{
    let order = kinematics.joint_order();
    let angles = encode(q, order)?;
    if order.is_empty() {
        return Ok(DMatrix::zeros(0, 0));
    }
    let mut rows = Vec::with_capacity(order.len());

    for joint in 0..order.len() {
        let mut plus = angles.clone();
        let mut minus = angles.clone();
        plus[joint] += step;
        minus[joint] -= step;

        let pose_plus = kinematics.forward_kinematics(&decode(plus.as_slice(), order)?)?;
        let pose_minus = kinematics.forward_kinematics(&decode(minus.as_slice(), order)?)?;
        rows.push(((pose_plus - pose_minus) / (2.0 * step)).transpose());
    }

    Ok(DMatrix::from_rows(&rows))
}
