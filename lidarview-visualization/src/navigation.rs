//! Per-tick navigation update
//!
//! The controller owns the [`PoseState`] and is the only thing that mutates it.
//! Each tick it takes the input gathered since the previous tick and advances
//! the pose under the camera model chosen at construction.

use nalgebra::{Vector2, Vector3};

use lidarview_core::rotation_from_rpy;

use crate::camera::{FreeFlightPose, OrbitPose, PoseState};
use crate::config::{FreeFlightConfig, NavigationConfig, OrbitConfig};
use crate::input::{FrameInput, NavigationKey};

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// Frame a primary drag pans in under the Orbit model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitPanMode {
    /// Pan in the screen plane
    View,
    /// Pan with the world up axis held fixed on screen
    ViewUpright,
}

impl OrbitPanMode {
    /// Screen-plane panning up to `threshold` degrees of elevation and exactly
    /// at the poles, upright panning in between.
    pub fn for_elevation(elevation: f64, threshold: f64) -> Self {
        let pitch = elevation.abs();
        if pitch <= threshold || pitch == 90.0 {
            OrbitPanMode::View
        } else {
            OrbitPanMode::ViewUpright
        }
    }
}

/// World offset of the orbit center for a pan of `(dx, dy)` pixels
pub fn orbit_pan_delta(pose: &OrbitPose, mode: OrbitPanMode, dx: f64, dy: f64, viewport_width: f64) -> Vector3<f64> {
    let scale = pose.distance * 2.0 * (0.5 * pose.fov.to_radians()).tan() / viewport_width;
    if mode == OrbitPanMode::ViewUpright {
        let up = Vector3::z();
        let x_vec = up.cross(&(pose.center - pose.eye()));
        // Undefined when looking straight along the up axis.
        if let Some(x_vec) = x_vec.try_normalize(1e-12) {
            let y_vec = x_vec.cross(&up).normalize();
            return x_vec * scale * dx + y_vec * scale * dy;
        }
    }
    let (se, ce) = pose.elevation.to_radians().sin_cos();
    let (sa, ca) = pose.azimuth.to_radians().sin_cos();
    let x = scale * (sa * dx - se * ca * dy);
    let y = scale * (ca * dx + se * sa * dy);
    let z = scale * ce * dy;
    Vector3::new(x, -y, z)
}

/// Key translation speed for a rig at `height`, slowed near the ground plane
pub fn free_flight_translation_speed(height: f64, config: &FreeFlightConfig) -> f64 {
    let altitude = height.abs();
    if altitude < config.altitude_threshold {
        altitude * config.altitude_scale
    } else {
        config.translation_speed
    }
}

/// Drives the pose from accumulated input
#[derive(Debug, Clone)]
pub struct NavigationController {
    pose: PoseState,
    config: NavigationConfig,
    viewport: Viewport,
}

impl NavigationController {
    /// Create a controller starting from the pose described by `config`
    pub fn new(config: NavigationConfig) -> Self {
        let pose = PoseState::from_config(&config);
        Self::with_pose(config, pose)
    }

    pub fn with_pose(config: NavigationConfig, pose: PoseState) -> Self {
        Self {
            pose,
            config,
            viewport: Viewport::default(),
        }
    }

    pub fn pose(&self) -> &PoseState {
        &self.pose
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Put the camera back at its configured starting pose
    pub fn reset(&mut self) {
        self.pose = PoseState::from_config(&self.config);
    }

    /// Pin the orbit center to a followed item's position.
    ///
    /// Only the Orbit model follows; returns whether the pose changed.
    pub fn follow(&mut self, target: Vector3<f64>) -> bool {
        match &mut self.pose {
            PoseState::Orbit(pose) if pose.center != target => {
                pose.center = target;
                true
            }
            _ => false,
        }
    }

    /// Advance one tick. Returns whether the pose changed.
    pub fn tick(&mut self, frame: &FrameInput) -> bool {
        if frame.is_idle() {
            return false;
        }
        let before = self.pose;
        self.pose = match self.pose {
            PoseState::Orbit(pose) => {
                PoseState::Orbit(step_orbit(pose, frame, &self.config.orbit, self.viewport))
            }
            PoseState::FreeFlight(pose) => {
                PoseState::FreeFlight(step_free_flight(pose, frame, &self.config.free_flight))
            }
        };
        let changed = self.pose != before;
        if changed {
            log::trace!("pose advanced to {:?}", self.pose);
        }
        changed
    }
}

fn step_orbit(mut pose: OrbitPose, frame: &FrameInput, config: &OrbitConfig, viewport: Viewport) -> OrbitPose {
    let orbit = frame.secondary_drag;
    pose.azimuth -= orbit.x;
    pose.elevation += orbit.y;

    let pan = frame.primary_drag;
    if pan != Vector2::zeros() && viewport.width > 0.0 {
        let mode = OrbitPanMode::for_elevation(pose.elevation, config.upright_threshold);
        pose.center += orbit_pan_delta(&pose, mode, pan.x, pan.y, viewport.width);
    }

    if frame.wheel != 0.0 {
        pose.center -= pose.eye_direction() * (frame.wheel * config.wheel_scale);
    }

    let held = &frame.held_keys;
    let rotation_speed = config.rotation_speed;
    let translation_speed = config.translation_speed;
    if held.contains(&NavigationKey::RotateUp) {
        pose.elevation += rotation_speed;
    }
    if held.contains(&NavigationKey::RotateDown) {
        pose.elevation -= rotation_speed;
    }
    if held.contains(&NavigationKey::RotateLeft) {
        pose.azimuth += rotation_speed;
    }
    if held.contains(&NavigationKey::RotateRight) {
        pose.azimuth -= rotation_speed;
    }
    if held.contains(&NavigationKey::MoveForward) {
        pose.center -= pose.eye_direction() * translation_speed;
    }
    if held.contains(&NavigationKey::MoveBackward) {
        pose.center += pose.eye_direction() * translation_speed;
    }
    let ground = |degrees: f64| {
        let (s, c) = degrees.to_radians().sin_cos();
        Vector3::new(c, s, 0.0) * translation_speed
    };
    if held.contains(&NavigationKey::MoveLeft) {
        pose.center -= ground(pose.azimuth + 90.0);
    }
    if held.contains(&NavigationKey::MoveRight) {
        pose.center += ground(pose.azimuth + 90.0);
    }
    if held.contains(&NavigationKey::MoveUp) {
        pose.center -= ground(pose.azimuth);
    }
    if held.contains(&NavigationKey::MoveDown) {
        pose.center += ground(pose.azimuth);
    }
    pose
}

fn step_free_flight(mut pose: FreeFlightPose, frame: &FrameInput, config: &FreeFlightConfig) -> FreeFlightPose {
    let drag = frame.secondary_drag;
    if drag != Vector2::zeros() {
        let s = config.drag_rotation_scale;
        pose.tbc = pose.tbc.rotated_local(&rotation_from_rpy(-drag.y * s, 0.0, 0.0));
        pose.twb = pose.twb.rotated_local(&rotation_from_rpy(0.0, 0.0, -drag.x * s));
    }

    let pan = frame.primary_drag;
    if pan != Vector2::zeros() {
        let offset = pose.twb.rotation() * Vector3::new(-pan.x, pan.y, 0.0) * config.drag_translation_scale;
        pose.twb = pose.twb.translated(&offset);
    }

    if frame.wheel != 0.0 {
        let delta = frame.wheel * config.wheel_scale;
        let offset = pose.twb.rotation() * pose.tbc.rotation() * Vector3::new(0.0, 0.0, -delta);
        pose.twb = pose.twb.translated(&offset);
    }

    let held = &frame.held_keys;
    if held.is_empty() {
        return pose;
    }
    let rotation_speed = config.rotation_speed;
    let translation_speed = free_flight_translation_speed(pose.height(), config);

    if held.contains(&NavigationKey::TiltUp) {
        pose.tbc = pose.tbc.rotated_local(&rotation_from_rpy(rotation_speed, 0.0, 0.0));
    }
    if held.contains(&NavigationKey::TiltDown) {
        pose.tbc = pose.tbc.rotated_local(&rotation_from_rpy(-rotation_speed, 0.0, 0.0));
    }
    if held.contains(&NavigationKey::RotateLeft) {
        pose.twb = pose.twb.rotated_local(&rotation_from_rpy(0.0, 0.0, rotation_speed));
    }
    if held.contains(&NavigationKey::RotateRight) {
        pose.twb = pose.twb.rotated_local(&rotation_from_rpy(0.0, 0.0, -rotation_speed));
    }

    // Dolly follows the tilted camera; strafing stays in the rig frame.
    let camera_axis = |offset: Vector3<f64>| pose.twb.rotation() * pose.tbc.rotation() * offset;
    let mut offset = Vector3::zeros();
    if held.contains(&NavigationKey::MoveForward) {
        offset += camera_axis(Vector3::new(0.0, 0.0, -translation_speed));
    }
    if held.contains(&NavigationKey::MoveBackward) {
        offset += camera_axis(Vector3::new(0.0, 0.0, translation_speed));
    }
    let rig = pose.twb.rotation();
    if held.contains(&NavigationKey::MoveLeft) {
        offset += rig * Vector3::new(-translation_speed, 0.0, 0.0);
    }
    if held.contains(&NavigationKey::MoveRight) {
        offset += rig * Vector3::new(translation_speed, 0.0, 0.0);
    }
    if held.contains(&NavigationKey::MoveUp) {
        offset += rig * Vector3::new(0.0, translation_speed, 0.0);
    }
    if held.contains(&NavigationKey::MoveDown) {
        offset += rig * Vector3::new(0.0, -translation_speed, 0.0);
    }
    pose.twb = pose.twb.translated(&offset);
    pose
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraModelKind;
    use approx::assert_relative_eq;
    use lidarview_core::RigidTransform;

    fn orbit_controller(elevation: f64, azimuth: f64) -> NavigationController {
        let pose = OrbitPose::new(Vector3::zeros(), elevation, azimuth, 40.0);
        NavigationController::with_pose(NavigationConfig::default(), PoseState::Orbit(pose))
    }

    fn orbit_of(controller: &NavigationController) -> OrbitPose {
        match controller.pose() {
            PoseState::Orbit(pose) => *pose,
            PoseState::FreeFlight(_) => panic!("expected orbit pose"),
        }
    }

    fn flight_of(controller: &NavigationController) -> FreeFlightPose {
        match controller.pose() {
            PoseState::FreeFlight(pose) => *pose,
            PoseState::Orbit(_) => panic!("expected free-flight pose"),
        }
    }

    fn keys(keys: &[NavigationKey]) -> FrameInput {
        FrameInput {
            held_keys: keys.iter().copied().collect(),
            ..FrameInput::default()
        }
    }

    #[test]
    fn test_idle_frame_changes_nothing() {
        let mut controller = NavigationController::new(NavigationConfig::default());
        let before = *controller.pose();
        assert!(!controller.tick(&FrameInput::default()));
        assert_eq!(*controller.pose(), before);
    }

    #[test]
    fn test_pan_mode_switch() {
        assert_eq!(OrbitPanMode::for_elevation(30.0, 45.0), OrbitPanMode::View);
        assert_eq!(OrbitPanMode::for_elevation(-45.0, 45.0), OrbitPanMode::View);
        assert_eq!(OrbitPanMode::for_elevation(60.0, 45.0), OrbitPanMode::ViewUpright);
        assert_eq!(OrbitPanMode::for_elevation(90.0, 45.0), OrbitPanMode::View);
        assert_eq!(OrbitPanMode::for_elevation(-90.0, 45.0), OrbitPanMode::View);
        // Elevation is not clamped; past the pole upright panning resumes.
        assert_eq!(OrbitPanMode::for_elevation(120.0, 45.0), OrbitPanMode::ViewUpright);
    }

    #[test]
    fn test_orbit_secondary_drag_orbits() {
        let mut controller = orbit_controller(30.0, 45.0);
        let frame = FrameInput {
            secondary_drag: Vector2::new(10.0, -4.0),
            ..FrameInput::default()
        };
        assert!(controller.tick(&frame));
        let pose = orbit_of(&controller);
        assert_relative_eq!(pose.azimuth, 35.0);
        assert_relative_eq!(pose.elevation, 26.0);
        assert_eq!(pose.center, Vector3::zeros());
    }

    #[test]
    fn test_orbit_primary_drag_uses_elevation_dependent_mode() {
        let width = Viewport::default().width;
        for (elevation, mode) in [(30.0, OrbitPanMode::View), (60.0, OrbitPanMode::ViewUpright)] {
            let mut controller = orbit_controller(elevation, 45.0);
            let start = orbit_of(&controller);
            let frame = FrameInput {
                primary_drag: Vector2::new(10.0, 6.0),
                ..FrameInput::default()
            };
            controller.tick(&frame);
            let moved = orbit_of(&controller).center - start.center;
            assert_relative_eq!(moved, orbit_pan_delta(&start, mode, 10.0, 6.0, width), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_pan_branches_differ_off_axis() {
        let pose = OrbitPose::new(Vector3::zeros(), 60.0, 45.0, 40.0);
        let view = orbit_pan_delta(&pose, OrbitPanMode::View, 10.0, 6.0, 1920.0);
        let upright = orbit_pan_delta(&pose, OrbitPanMode::ViewUpright, 10.0, 6.0, 1920.0);
        assert!((view - upright).norm() > 1e-6);
        // The upright branch never moves the center vertically.
        assert_relative_eq!(upright.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pan_upright_falls_back_at_pole() {
        let pose = OrbitPose::new(Vector3::zeros(), 90.0, 0.0, 40.0);
        let upright = orbit_pan_delta(&pose, OrbitPanMode::ViewUpright, 10.0, 0.0, 1920.0);
        let view = orbit_pan_delta(&pose, OrbitPanMode::View, 10.0, 0.0, 1920.0);
        assert!(upright.iter().all(|v| v.is_finite()));
        assert_relative_eq!(upright, view, epsilon = 1e-9);
    }

    #[test]
    fn test_orbit_pan_scale() {
        // Horizontal drag at elevation 0 moves the center sideways by the
        // world width of that many pixels at the center's depth.
        let pose = OrbitPose::new(Vector3::zeros(), 0.0, 0.0, 40.0);
        let delta = orbit_pan_delta(&pose, OrbitPanMode::View, 1920.0, 0.0, 1920.0);
        let visible_width = 40.0 * 2.0 * 30f64.to_radians().tan();
        assert_relative_eq!(delta, Vector3::new(0.0, -visible_width, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_orbit_wheel_dollies_along_view_ray() {
        let mut controller = orbit_controller(30.0, 45.0);
        let start = orbit_of(&controller);
        let frame = FrameInput {
            wheel: 120.0,
            ..FrameInput::default()
        };
        controller.tick(&frame);
        let pose = orbit_of(&controller);
        let moved = pose.center - start.center;
        assert_relative_eq!(moved.norm(), 12.0, epsilon = 1e-9);
        // Eye moves the same way, forward along the view direction.
        let forward = (start.center - start.eye()).normalize();
        assert_relative_eq!(moved.normalize(), forward, epsilon = 1e-9);
        assert_relative_eq!(pose.distance, start.distance);
    }

    #[test]
    fn test_orbit_arrow_keys() {
        let mut controller = orbit_controller(30.0, 45.0);
        controller.tick(&keys(&[NavigationKey::RotateUp, NavigationKey::RotateRight]));
        let pose = orbit_of(&controller);
        assert_relative_eq!(pose.elevation, 30.5);
        assert_relative_eq!(pose.azimuth, 44.5);
    }

    #[test]
    fn test_orbit_ground_plane_keys() {
        let mut controller = orbit_controller(30.0, 0.0);
        controller.tick(&keys(&[NavigationKey::MoveUp]));
        assert_relative_eq!(orbit_of(&controller).center, Vector3::new(-0.2, 0.0, 0.0), epsilon = 1e-12);

        let mut controller = orbit_controller(30.0, 0.0);
        controller.tick(&keys(&[NavigationKey::MoveRight]));
        assert_relative_eq!(orbit_of(&controller).center, Vector3::new(0.0, 0.2, 0.0), epsilon = 1e-12);

        // Opposite keys cancel.
        let mut controller = orbit_controller(30.0, 0.0);
        controller.tick(&keys(&[NavigationKey::MoveLeft, NavigationKey::MoveRight]));
        assert_relative_eq!(orbit_of(&controller).center, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_orbit_dolly_keys() {
        let mut controller = orbit_controller(90.0, 0.0);
        controller.tick(&keys(&[NavigationKey::MoveForward]));
        // Looking straight down, forward is world -Z.
        assert_relative_eq!(orbit_of(&controller).center, Vector3::new(0.0, 0.0, -0.2), epsilon = 1e-12);
    }

    #[test]
    fn test_orbit_ignores_tilt_keys() {
        let mut controller = orbit_controller(30.0, 45.0);
        assert!(!controller.tick(&keys(&[NavigationKey::TiltUp])));
    }

    #[test]
    fn test_follow_only_moves_orbit_center() {
        let mut controller = orbit_controller(30.0, 45.0);
        assert!(controller.follow(Vector3::new(1.0, 2.0, 3.0)));
        assert!(!controller.follow(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(orbit_of(&controller).center, Vector3::new(1.0, 2.0, 3.0));

        let mut flight = NavigationController::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        assert!(!flight.follow(Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_altitude_scaled_speed() {
        let config = FreeFlightConfig::default();
        assert_relative_eq!(free_flight_translation_speed(10.0, &config), 0.5);
        assert_relative_eq!(free_flight_translation_speed(-10.0, &config), 0.5);
        assert_relative_eq!(free_flight_translation_speed(20.0, &config), 1.0);
        assert_relative_eq!(free_flight_translation_speed(350.0, &config), 1.0);
        assert_relative_eq!(free_flight_translation_speed(0.0, &config), 0.0);
    }

    #[test]
    fn test_free_flight_move_up_at_low_altitude() {
        let mut controller = NavigationController::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        let start = flight_of(&controller);
        assert_relative_eq!(start.height(), 10.0);
        controller.tick(&keys(&[NavigationKey::MoveUp]));
        let moved = flight_of(&controller).twb.translation_part() - start.twb.translation_part();
        assert_relative_eq!(moved, Vector3::new(0.0, 0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_free_flight_strafe_ignores_camera_tilt() {
        let mut controller = NavigationController::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        for _ in 0..30 {
            controller.tick(&keys(&[NavigationKey::TiltDown]));
        }
        let start = flight_of(&controller);
        controller.tick(&keys(&[NavigationKey::MoveRight]));
        let moved = flight_of(&controller).twb.translation_part() - start.twb.translation_part();
        assert_relative_eq!(moved, Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_free_flight_dolly_follows_camera_axis() {
        let mut controller = NavigationController::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        let start = flight_of(&controller);
        controller.tick(&keys(&[NavigationKey::MoveForward]));
        let moved = flight_of(&controller).twb.translation_part() - start.twb.translation_part();
        assert_relative_eq!(moved, start.camera_z_axis() * -0.5, epsilon = 1e-12);
        // Looking 45° down, forward loses height.
        assert!(moved.z < 0.0);
    }

    #[test]
    fn test_free_flight_wheel() {
        let pose = FreeFlightPose::new(
            RigidTransform::from_rpy_xyz(0.0, 0.0, 0.4, 0.0, 0.0, 50.0),
            RigidTransform::from_rpy_xyz(1.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        );
        let config = NavigationConfig::for_model(CameraModelKind::FreeFlight);
        let mut controller = NavigationController::with_pose(config, PoseState::FreeFlight(pose));
        controller.tick(&FrameInput {
            wheel: 100.0,
            ..FrameInput::default()
        });
        let moved = flight_of(&controller).twb.translation_part() - pose.twb.translation_part();
        assert_relative_eq!(moved.norm(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(moved, pose.camera_z_axis() * -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_flight_secondary_drag_splits_yaw_and_tilt() {
        let mut controller = NavigationController::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        let start = flight_of(&controller);
        controller.tick(&FrameInput {
            secondary_drag: Vector2::new(20.0, -10.0),
            ..FrameInput::default()
        });
        let pose = flight_of(&controller);
        assert_relative_eq!(
            pose.twb.rotation(),
            start.twb.rotation() * rotation_from_rpy(0.0, 0.0, -0.1),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pose.tbc.rotation(),
            start.tbc.rotation() * rotation_from_rpy(0.05, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_eq!(pose.twb.translation_part(), start.twb.translation_part());
    }

    #[test]
    fn test_free_flight_primary_drag_pans_in_rig_plane() {
        let pose = FreeFlightPose::new(
            RigidTransform::from_rpy_xyz(0.0, 0.0, std::f64::consts::FRAC_PI_2, 0.0, 0.0, 30.0),
            RigidTransform::identity(),
        );
        let config = NavigationConfig::for_model(CameraModelKind::FreeFlight);
        let mut controller = NavigationController::with_pose(config, PoseState::FreeFlight(pose));
        controller.tick(&FrameInput {
            primary_drag: Vector2::new(10.0, 20.0),
            ..FrameInput::default()
        });
        let moved = flight_of(&controller).twb.translation_part() - pose.twb.translation_part();
        // Rig yawed 90°: local (-10, 20, 0) * 0.05 becomes world (-1, -0.5, 0).
        assert_relative_eq!(moved, Vector3::new(-1.0, -0.5, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_reset_restores_initial_pose() {
        let mut controller = orbit_controller(10.0, 10.0);
        controller.reset();
        assert_eq!(*controller.pose(), PoseState::from_config(&NavigationConfig::default()));
    }
}
