//! Conversion between angle vectors and named joint configurations.

use crate::{JointConfiguration, JointOrder, KinematicsError, Result};
use nalgebra::DVector;

/// Pairs `angles[i]` with the i-th joint name of `order`.
pub fn decode(angles: &[f64], order: &JointOrder) -> Result<JointConfiguration> {
    if angles.len() != order.len() {
        return Err(KinematicsError::LengthMismatch {
            angles: angles.len(),
            keys: order.len(),
        });
    }

    Ok(JointConfiguration {
        order: order.clone(),
        angles: DVector::from_column_slice(angles),
    })
}

/// Extracts the angles of `q` in `order`.
pub fn encode(q: &JointConfiguration, order: &JointOrder) -> Result<DVector<f64>> {
    if q.order() == order {
        return Ok(q.angles().clone());
    }

    let mut angles = DVector::zeros(order.len());
    for (i, name) in order.names().iter().enumerate() {
        angles[i] = q
            .get(name)
            .ok_or_else(|| KinematicsError::UnknownJoint(name.clone()))?;
    }
    Ok(angles)
}
