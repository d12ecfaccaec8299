//! Camera pose state for the two navigation models

use nalgebra::{Matrix4, Perspective3, Rotation3, Vector3};

use lidarview_core::{rotation_from_elev_azim, rotation_from_rpy, Error, Result, RigidTransform};

use crate::config::{CameraModelKind, NavigationConfig};

/// Camera parameterized by a look-at center plus spherical angles.
///
/// Elevation and azimuth are unbounded degree accumulators. Elevation is not
/// clamped, so values beyond ±90 flip the view over the pole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitPose {
    pub center: Vector3<f64>,
    pub elevation: f64,
    pub azimuth: f64,
    pub distance: f64,
    pub fov: f64,
}

impl OrbitPose {
    pub fn new(center: Vector3<f64>, elevation: f64, azimuth: f64, distance: f64) -> Self {
        Self {
            center,
            elevation,
            azimuth,
            distance,
            fov: 60.0,
        }
    }

    /// Unit ray from `center` towards the eye
    pub fn eye_direction(&self) -> Vector3<f64> {
        rotation_from_elev_azim(-self.elevation.to_radians(), self.azimuth.to_radians()) * Vector3::x()
    }

    /// World position of the eye
    pub fn eye(&self) -> Vector3<f64> {
        let elev = self.elevation.to_radians();
        let azim = self.azimuth.to_radians();
        self.center
            + self.distance * Vector3::new(elev.cos() * azim.cos(), elev.cos() * azim.sin(), elev.sin())
    }

    /// `T(0,0,-distance) · Rx(elevation-90) · Rz(-(azimuth+90)) · T(-center)`
    pub fn view_matrix(&self) -> Result<Matrix4<f64>> {
        let values = [self.center.x, self.center.y, self.center.z, self.elevation, self.azimuth, self.distance];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::DegenerateTransform(format!("non-finite orbit pose {:?}", self)));
        }
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), (self.elevation - 90.0).to_radians());
        let spin = Rotation3::from_axis_angle(&Vector3::z_axis(), -(self.azimuth + 90.0).to_radians());
        Ok(Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.distance))
            * tilt.to_homogeneous()
            * spin.to_homogeneous()
            * Matrix4::new_translation(&-self.center))
    }
}

impl Default for OrbitPose {
    fn default() -> Self {
        Self::new(Vector3::zeros(), 30.0, 45.0, 40.0)
    }
}

/// Camera parameterized by a rig pose in the world and a camera pose in the rig.
///
/// The camera looks down its local -Z axis with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFlightPose {
    /// World-from-body: the rig's position and heading
    pub twb: RigidTransform,
    /// Body-from-camera: the camera's tilt inside the rig
    pub tbc: RigidTransform,
    pub fov: f64,
}

impl FreeFlightPose {
    pub fn new(twb: RigidTransform, tbc: RigidTransform) -> Self {
        Self { twb, tbc, fov: 60.0 }
    }

    /// Rig at `position` with heading along world +Y and the camera looking
    /// `tilt` radians below the horizon.
    pub fn looking_down(position: Vector3<f64>, tilt: f64) -> Self {
        let twb = RigidTransform::translation(position);
        // Rx(90°) points the camera's -Z along rig +Y; tilting down subtracts.
        let tbc = RigidTransform::from_parts(
            rotation_from_rpy(std::f64::consts::FRAC_PI_2 - tilt, 0.0, 0.0),
            Vector3::zeros(),
        );
        Self::new(twb, tbc)
    }

    /// World-from-camera, `Twb · Tbc`
    pub fn camera_pose(&self) -> RigidTransform {
        self.twb * self.tbc
    }

    pub fn eye(&self) -> Vector3<f64> {
        self.camera_pose().translation_part()
    }

    /// Camera +Z axis in world coordinates; the view direction is its negation
    pub fn camera_z_axis(&self) -> Vector3<f64> {
        self.twb.rotation() * self.tbc.rotation() * Vector3::z()
    }

    /// `inverse(Twb · Tbc)`
    pub fn view_matrix(&self) -> Result<Matrix4<f64>> {
        self.camera_pose().try_inverse()
    }

    pub fn height(&self) -> f64 {
        self.twb.translation_part().z
    }
}

impl Default for FreeFlightPose {
    fn default() -> Self {
        Self::looking_down(Vector3::new(0.0, 0.0, 10.0), std::f64::consts::FRAC_PI_4)
    }
}

/// The current pose under whichever camera model the viewer was built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseState {
    Orbit(OrbitPose),
    FreeFlight(FreeFlightPose),
}

impl PoseState {
    /// Initial pose described by `config`
    pub fn from_config(config: &NavigationConfig) -> Self {
        match config.model {
            CameraModelKind::Orbit => {
                let o = &config.orbit;
                let mut pose = OrbitPose::new(Vector3::zeros(), o.initial_elevation, o.initial_azimuth, o.initial_distance);
                pose.fov = o.fov;
                PoseState::Orbit(pose)
            }
            CameraModelKind::FreeFlight => {
                let f = &config.free_flight;
                let mut pose = FreeFlightPose::looking_down(Vector3::new(0.0, 0.0, f.initial_height), f.initial_tilt);
                pose.fov = f.fov;
                PoseState::FreeFlight(pose)
            }
        }
    }

    pub fn kind(&self) -> CameraModelKind {
        match self {
            PoseState::Orbit(_) => CameraModelKind::Orbit,
            PoseState::FreeFlight(_) => CameraModelKind::FreeFlight,
        }
    }

    /// World position of the eye
    pub fn eye(&self) -> Vector3<f64> {
        match self {
            PoseState::Orbit(pose) => pose.eye(),
            PoseState::FreeFlight(pose) => pose.eye(),
        }
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f64 {
        match self {
            PoseState::Orbit(pose) => pose.fov,
            PoseState::FreeFlight(pose) => pose.fov,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Result<Matrix4<f64>> {
        match self {
            PoseState::Orbit(pose) => pose.view_matrix(),
            PoseState::FreeFlight(pose) => pose.view_matrix(),
        }
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self, aspect_ratio: f64, near: f64, far: f64) -> Matrix4<f64> {
        Perspective3::new(aspect_ratio, self.fov().to_radians(), near, far).into_inner()
    }
}
