//! Rotation composition and quaternion conversion
//!
//! All functions are pure and operate in double precision. Angles are radians.

use nalgebra::{Matrix3, Matrix4, Quaternion, Vector4};

fn rot_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        1.0, 0.0, 0.0,
        0.0, c, -s,
        0.0, s, c,
    )
}

fn rot_y(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, 0.0, s,
        0.0, 1.0, 0.0,
        -s, 0.0, c,
    )
}

fn rot_z(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(
        c, -s, 0.0,
        s, c, 0.0,
        0.0, 0.0, 1.0,
    )
}

/// Build `Rz(azim) · Ry(elev)`.
///
/// Applied to the unit X axis this yields the ray from an orbit center towards
/// the eye when called with `(-elevation, azimuth)`.
pub fn rotation_from_elev_azim(elev: f64, azim: f64) -> Matrix3<f64> {
    rot_z(azim) * rot_y(elev)
}

/// Build `Rx(roll) · Ry(pitch) · Rz(yaw)`.
pub fn rotation_from_rpy(roll: f64, pitch: f64, yaw: f64) -> Matrix3<f64> {
    rot_x(roll) * rot_y(pitch) * rot_z(yaw)
}

/// Convert a rotation matrix into a quaternion.
///
/// Branches on the trace first and otherwise on the largest diagonal element,
/// which keeps the square root argument away from zero near 180 degree turns.
pub fn matrix_to_quaternion(m: &Matrix3<f64>) -> Quaternion<f64> {
    let trace = m[(0, 0)] + m[(1, 1)] + m[(2, 2)];
    let (w, x, y, z);
    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        w = 0.25 / s;
        x = (m[(2, 1)] - m[(1, 2)]) * s;
        y = (m[(0, 2)] - m[(2, 0)]) * s;
        z = (m[(1, 0)] - m[(0, 1)]) * s;
    } else if m[(0, 0)] > m[(1, 1)] && m[(0, 0)] > m[(2, 2)] {
        let s = 2.0 * (1.0 + m[(0, 0)] - m[(1, 1)] - m[(2, 2)]).sqrt();
        w = (m[(2, 1)] - m[(1, 2)]) / s;
        x = 0.25 * s;
        y = (m[(0, 1)] + m[(1, 0)]) / s;
        z = (m[(0, 2)] + m[(2, 0)]) / s;
    } else if m[(1, 1)] > m[(2, 2)] {
        let s = 2.0 * (1.0 + m[(1, 1)] - m[(0, 0)] - m[(2, 2)]).sqrt();
        w = (m[(0, 2)] - m[(2, 0)]) / s;
        x = (m[(0, 1)] + m[(1, 0)]) / s;
        y = 0.25 * s;
        z = (m[(1, 2)] + m[(2, 1)]) / s;
    } else {
        let s = 2.0 * (1.0 + m[(2, 2)] - m[(0, 0)] - m[(1, 1)]).sqrt();
        w = (m[(1, 0)] - m[(0, 1)]) / s;
        x = (m[(0, 2)] + m[(2, 0)]) / s;
        y = (m[(1, 2)] + m[(2, 1)]) / s;
        z = 0.25 * s;
    }
    Quaternion::new(w, x, y, z)
}

/// Convert a quaternion into a homogeneous rotation matrix.
///
/// The quaternion does not need to be normalized. A quaternion whose squared
/// norm is below `4 * f64::EPSILON` maps to the identity.
pub fn quaternion_to_matrix(q: &Quaternion<f64>) -> Matrix4<f64> {
    // Ordered (w, x, y, z) so the outer product indices read like the formula.
    let v = Vector4::new(q.w, q.i, q.j, q.k);
    let nq = v.dot(&v);
    if nq < f64::EPSILON * 4.0 {
        return Matrix4::identity();
    }
    let v = v * (2.0 / nq).sqrt();
    let o = v * v.transpose();
    Matrix4::new(
        1.0 - o[(2, 2)] - o[(3, 3)], o[(1, 2)] - o[(3, 0)], o[(1, 3)] + o[(2, 0)], 0.0,
        o[(1, 2)] + o[(3, 0)], 1.0 - o[(1, 1)] - o[(3, 3)], o[(2, 3)] - o[(1, 0)], 0.0,
        o[(1, 3)] - o[(2, 0)], o[(2, 3)] + o[(1, 0)], 1.0 - o[(1, 1)] - o[(2, 2)], 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Roll angle of a rotation, `atan2(R32, R33)`.
pub fn roll_from_matrix(m: &Matrix3<f64>) -> f64 {
    m[(2, 1)].atan2(m[(2, 2)])
}

/// True when the matrix is orthonormal with determinant +1 within `tolerance`.
pub fn is_rotation(m: &Matrix3<f64>, tolerance: f64) -> bool {
    let gram = m.transpose() * m;
    (gram - Matrix3::identity()).amax() <= tolerance && (m.determinant() - 1.0).abs() <= tolerance
}
