//! LiDAR-to-camera extrinsic editing state
//!
//! Holds the translation and roll/pitch/yaw an operator dials in while lining a
//! LiDAR scan up with a camera image, and derives the rotation and quaternion
//! reported back to them.

use nalgebra::{Matrix3, Point3, Quaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::rotation::{matrix_to_quaternion, rotation_from_rpy};
use crate::transform::RigidTransform;

/// Largest translation magnitude accepted per axis
pub const TRANSLATION_LIMIT: f64 = 100.0;

/// Rotation from the body convention (x forward, z up) to the optical
/// convention (z forward, y down).
pub fn optical_from_body() -> Matrix3<f64> {
    Matrix3::new(
        0.0, -1.0, 0.0,
        0.0, 0.0, -1.0,
        1.0, 0.0, 0.0,
    )
}

/// Extrinsic calibration between a LiDAR and a camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LidarCameraExtrinsic {
    translation: Vector3<f64>,
    rpy: Vector3<f64>,
}

impl LidarCameraExtrinsic {
    pub fn new(translation: Vector3<f64>, rpy: Vector3<f64>) -> Self {
        let mut extrinsic = Self::default();
        extrinsic.set_translation(translation);
        extrinsic.set_rpy(rpy);
        extrinsic
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    pub fn rpy(&self) -> Vector3<f64> {
        self.rpy
    }

    /// Set the translation, clamping each axis to ±[`TRANSLATION_LIMIT`]
    pub fn set_translation(&mut self, translation: Vector3<f64>) {
        let clamped = translation.map(|v| v.clamp(-TRANSLATION_LIMIT, TRANSLATION_LIMIT));
        if clamped != translation {
            log::debug!("extrinsic translation {:?} clamped to {:?}", translation, clamped);
        }
        self.translation = clamped;
    }

    /// Set roll/pitch/yaw in radians, clamping each to ±π
    pub fn set_rpy(&mut self, rpy: Vector3<f64>) {
        let clamped = rpy.map(|v| v.clamp(-PI, PI));
        if clamped != rpy {
            log::debug!("extrinsic rpy {:?} clamped to {:?}", rpy, clamped);
        }
        self.rpy = clamped;
    }

    /// Camera-from-LiDAR rotation, `R_oc · R(rpy)`
    pub fn rotation(&self) -> Matrix3<f64> {
        optical_from_body() * rotation_from_rpy(self.rpy.x, self.rpy.y, self.rpy.z)
    }

    /// Camera-from-LiDAR rotation as a `(w, x, y, z)` quaternion
    pub fn quaternion(&self) -> Quaternion<f64> {
        matrix_to_quaternion(&self.rotation())
    }

    pub fn transform(&self) -> RigidTransform {
        RigidTransform::from_parts(self.rotation(), self.translation)
    }

    /// Map a point from the LiDAR frame into the camera frame
    pub fn to_camera_frame(&self, point: &Point3<f64>) -> Point3<f64> {
        self.transform().transform_point(point)
    }

    /// Quaternion formatted as `[w, x, y, z]` with four decimals
    pub fn format_quaternion(&self) -> String {
        let q = self.quaternion();
        format_values(&[q.w, q.i, q.j, q.k])
    }

    /// Translation formatted as `[x, y, z]` with four decimals
    pub fn format_translation(&self) -> String {
        format_values(self.translation.as_slice())
    }
}

impl Default for LidarCameraExtrinsic {
    fn default() -> Self {
        Self {
            translation: Vector3::zeros(),
            rpy: Vector3::zeros(),
        }
    }
}

fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:.4}", v)).collect();
    format!("[{}]", parts.join(", "))
}
