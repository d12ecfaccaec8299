//! Core math for lidarview
//!
//! This crate provides the pure building blocks of the camera navigation core:
//! rotation composition, quaternion conversion, rigid homogeneous transforms
//! and the LiDAR-camera extrinsic editing state.

pub mod rotation;
pub mod transform;
pub mod extrinsic;
pub mod error;

pub use rotation::*;
pub use transform::*;
pub use extrinsic::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Quaternion, Vector2, Vector3};

/// Common result type for lidarview operations
pub type Result<T> = std::result::Result<T, Error>;
