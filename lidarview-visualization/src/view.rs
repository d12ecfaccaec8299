//! View matrix derivation for the rendering backend

use bytemuck::{Pod, Zeroable};
use nalgebra::{Matrix4, Vector3};

use lidarview_core::Result;

use crate::camera::PoseState;

/// Near clipping plane handed to the projection
pub const DEFAULT_NEAR: f64 = 0.1;
/// Far clipping plane handed to the projection
pub const DEFAULT_FAR: f64 = 10000.0;

/// Camera data a renderer uploads once per frame
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(view_proj: &Matrix4<f64>, eye: &Vector3<f64>) -> Self {
        let view_proj: Matrix4<f32> = view_proj.cast();
        Self {
            view_proj: view_proj.into(),
            view_pos: [eye.x as f32, eye.y as f32, eye.z as f32],
            _padding: 0.0,
        }
    }
}

/// Compute the view matrix for `pose`.
///
/// Fails with a degenerate transform error instead of returning garbage when
/// the pose cannot be inverted.
pub fn compute_view_matrix(pose: &PoseState) -> Result<Matrix4<f64>> {
    pose.view_matrix()
}

/// Caches the view matrix between pose changes and falls back to the last
/// good matrix when a pose turns out degenerate.
#[derive(Debug, Clone)]
pub struct ViewMatrixProvider {
    cached: Option<Matrix4<f64>>,
    last_good: Matrix4<f64>,
    degenerate_frames: u64,
}

impl ViewMatrixProvider {
    pub fn new() -> Self {
        Self {
            cached: None,
            last_good: Matrix4::identity(),
            degenerate_frames: 0,
        }
    }

    /// Drop the cached matrix; the next request recomputes it
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Number of requests answered with a stale matrix
    pub fn degenerate_frames(&self) -> u64 {
        self.degenerate_frames
    }

    /// View matrix for `pose`, recomputed only after [`invalidate`](Self::invalidate).
    ///
    /// A degenerate pose is logged and answered with the last good matrix.
    pub fn view_matrix(&mut self, pose: &PoseState) -> Matrix4<f64> {
        if let Some(view) = self.cached {
            return view;
        }
        match compute_view_matrix(pose) {
            Ok(view) => {
                self.last_good = view;
                self.cached = Some(view);
                view
            }
            Err(e) => {
                self.degenerate_frames += 1;
                log::warn!("Keeping previous view matrix: {}", e);
                self.last_good
            }
        }
    }

    /// Projection times view, packed for upload
    pub fn camera_uniform(&mut self, pose: &PoseState, aspect_ratio: f64) -> CameraUniform {
        let view = self.view_matrix(pose);
        let proj = pose.projection_matrix(aspect_ratio, DEFAULT_NEAR, DEFAULT_FAR);
        CameraUniform::new(&(proj * view), &pose.eye())
    }
}

impl Default for ViewMatrixProvider {
    fn default() -> Self {
        Self::new()
    }
}
