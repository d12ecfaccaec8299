//! Rigid homogeneous transforms

use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rotation::{quaternion_to_matrix, rotation_from_rpy};

/// A rigid 4x4 transform: rotation block plus translation column.
///
/// This is a value type. Updates return a new transform and never touch the
/// homogeneous row, so a transform built from a rotation stays rigid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    pub matrix: Matrix4<f64>,
}

impl RigidTransform {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation
    pub fn translation(translation: Vector3<f64>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Create a transform from a rotation matrix and a translation
    pub fn from_parts(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self::identity().with_rotation(rotation).with_translation(translation)
    }

    /// Create a transform from roll/pitch/yaw (radians) and a position
    pub fn from_rpy_xyz(roll: f64, pitch: f64, yaw: f64, x: f64, y: f64, z: f64) -> Self {
        Self::from_parts(rotation_from_rpy(roll, pitch, yaw), Vector3::new(x, y, z))
    }

    /// Create a transform from a position and a `(w, x, y, z)` quaternion
    pub fn from_position_quaternion(position: Vector3<f64>, rotation: &Quaternion<f64>) -> Self {
        Self {
            matrix: quaternion_to_matrix(rotation),
        }
        .with_translation(position)
    }

    /// Rotation block
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation column
    pub fn translation_part(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Copy of this transform with the rotation block replaced
    pub fn with_rotation(mut self, rotation: Matrix3<f64>) -> Self {
        self.matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        self
    }

    /// Copy of this transform with the translation column replaced
    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        self
    }

    /// Right-multiply `delta` into the rotation block (a rotation about the local axes)
    pub fn rotated_local(self, delta: &Matrix3<f64>) -> Self {
        let rotation = self.rotation() * delta;
        self.with_rotation(rotation)
    }

    /// Add `offset` (world frame) to the translation column
    pub fn translated(self, offset: &Vector3<f64>) -> Self {
        let translation = self.translation_part() + offset;
        self.with_translation(translation)
    }

    /// Apply the transformation to a point
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Compose this transformation with another (`self · other`)
    pub fn compose(self, other: Self) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Inverse of the full 4x4 matrix.
    ///
    /// Fails with [`Error::DegenerateTransform`] when the matrix is singular or
    /// holds non-finite values.
    pub fn try_inverse(&self) -> Result<Matrix4<f64>> {
        if self.matrix.iter().any(|v| !v.is_finite()) {
            return Err(Error::DegenerateTransform(format!(
                "non-finite entries in {:?}",
                self.matrix
            )));
        }
        self.matrix.try_inverse().ok_or_else(|| {
            Error::DegenerateTransform(format!(
                "singular matrix (determinant {:e})",
                self.matrix.determinant()
            ))
        })
    }

    /// Check that the rotation block is orthonormal within `tolerance`
    pub fn is_rigid(&self, tolerance: f64) -> bool {
        let bottom_ok = self.matrix[(3, 0)] == 0.0
            && self.matrix[(3, 1)] == 0.0
            && self.matrix[(3, 2)] == 0.0
            && self.matrix[(3, 3)] == 1.0;
        bottom_ok && crate::rotation::is_rotation(&self.rotation(), tolerance)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for RigidTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.compose(rhs)
    }
}

impl From<nalgebra::Isometry3<f64>> for RigidTransform {
    fn from(isometry: nalgebra::Isometry3<f64>) -> Self {
        Self {
            matrix: isometry.to_homogeneous(),
        }
    }
}
