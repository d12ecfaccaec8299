//! Toolkit-independent viewer state
//!
//! [`Viewer`] ties input, navigation and view derivation together. A window
//! loop feeds it events and asks it for the camera once per frame.

use std::time::Duration;

use instant::Instant;
use nalgebra::{Matrix4, Vector2, Vector3};
use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use lidarview_core::Result;

use crate::clock::TickClock;
use crate::config::NavigationConfig;
use crate::follow::FollowTargets;
use crate::fps::FpsMonitor;
use crate::input::{InputAccumulator, NavigationKey};
use crate::keymap::{drag_button, navigation_key, viewer_command, wheel_units, ViewerCommand};
use crate::navigation::{NavigationController, Viewport};
use crate::settings::{parse_hex_color, DEFAULT_BACKGROUND};
use crate::view::{CameraUniform, ViewMatrixProvider};

/// What a key press was used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    Navigation(NavigationKey),
    Command(ViewerCommand),
    Ignored,
}

/// Viewer state shared by the interactive window and headless drivers
#[derive(Debug, Clone)]
pub struct Viewer {
    controller: NavigationController,
    input: InputAccumulator,
    provider: ViewMatrixProvider,
    follow: FollowTargets,
    clock: TickClock,
    fps: FpsMonitor,
    background: [u8; 3],
    settings_open: bool,
}

impl Viewer {
    pub fn new(config: NavigationConfig) -> Self {
        let clock = TickClock::new(config.tick_period(), config.max_ticks_per_update);
        log::info!("Viewer using {:?} navigation", config.model);
        Self {
            controller: NavigationController::new(config),
            input: InputAccumulator::new(),
            provider: ViewMatrixProvider::new(),
            follow: FollowTargets::new(),
            clock,
            fps: FpsMonitor::new(),
            background: DEFAULT_BACKGROUND,
            settings_open: false,
        }
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn input(&self) -> &InputAccumulator {
        &self.input
    }

    pub fn follow_targets(&self) -> &FollowTargets {
        &self.follow
    }

    pub fn follow_targets_mut(&mut self) -> &mut FollowTargets {
        &mut self.follow
    }

    /// Follow a named item, or stop following with `"none"`
    pub fn follow(&mut self, name: &str) -> Result<()> {
        self.follow.follow(name)
    }

    pub fn on_key_down(&mut self, code: KeyCode) -> KeyResponse {
        if let Some(key) = navigation_key(code, self.controller.pose().kind()) {
            self.input.on_key_down(key);
            return KeyResponse::Navigation(key);
        }
        match viewer_command(code) {
            Some(command) => {
                self.run_command(command);
                KeyResponse::Command(command)
            }
            None => KeyResponse::Ignored,
        }
    }

    pub fn on_key_up(&mut self, code: KeyCode) {
        if let Some(key) = navigation_key(code, self.controller.pose().kind()) {
            self.input.on_key_up(key);
        }
    }

    pub fn on_mouse_down(&mut self, button: MouseButton, pos: Option<Vector2<f64>>) {
        if let Some(button) = drag_button(button) {
            self.input.on_drag_start(button, pos);
        }
    }

    pub fn on_mouse_move(&mut self, pos: Vector2<f64>) {
        self.input.on_drag_move(pos);
    }

    pub fn on_mouse_up(&mut self, button: MouseButton) {
        if let Some(button) = drag_button(button) {
            self.input.on_drag_end(button);
        }
    }

    pub fn on_wheel(&mut self, delta: MouseScrollDelta) {
        let (dx, dy) = wheel_units(delta);
        self.input.on_wheel(dx, dy);
    }

    /// Drop held keys and drags, e.g. when the window loses focus
    pub fn on_focus_lost(&mut self) {
        self.input.clear();
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.controller.set_viewport(Viewport::new(width, height));
    }

    /// Run one navigation tick. Returns whether the camera moved.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        if let Some(target) = self.follow.target() {
            changed |= self.controller.follow(target);
        }
        let frame = self.input.take_frame();
        changed |= self.controller.tick(&frame);
        if changed {
            self.provider.invalidate();
        }
        changed
    }

    /// Run the ticks due at `now`
    pub fn update(&mut self, now: Instant) -> bool {
        let ticks = self.clock.update(now);
        self.run_ticks(ticks)
    }

    /// Run the ticks due after `elapsed` more time
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let ticks = self.clock.advance(elapsed);
        self.run_ticks(ticks)
    }

    fn run_ticks(&mut self, ticks: u32) -> bool {
        let mut changed = false;
        for _ in 0..ticks {
            changed |= self.tick();
        }
        changed
    }

    /// Put the camera back at its starting pose
    pub fn reset_camera(&mut self) {
        self.controller.reset();
        self.provider.invalidate();
    }

    pub fn view_matrix(&mut self) -> Matrix4<f64> {
        self.provider.view_matrix(self.controller.pose())
    }

    pub fn eye(&self) -> Vector3<f64> {
        self.controller.pose().eye()
    }

    pub fn camera_uniform(&mut self) -> CameraUniform {
        let aspect = self.controller.viewport().aspect_ratio();
        self.provider.camera_uniform(self.controller.pose(), aspect)
    }

    /// Stamp a rendered frame and return the frame rate over the last second
    pub fn frame_rendered(&mut self, now: Instant) -> usize {
        self.fps.count(now)
    }

    pub fn background_color(&self) -> [u8; 3] {
        self.background
    }

    /// Set the background from `#RRGGBB`; a malformed value keeps the current one
    pub fn set_background_color(&mut self, text: &str) -> Result<()> {
        let color = parse_hex_color(text).map_err(|e| {
            log::warn!("Keeping background {:?}: {}", self.background, e);
            e
        })?;
        self.background = color;
        Ok(())
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    fn run_command(&mut self, command: ViewerCommand) {
        match command {
            ViewerCommand::OpenSettings => {
                self.settings_open = !self.settings_open;
                log::debug!("Settings panel open: {}", self.settings_open);
            }
            ViewerCommand::ClearItems => {
                log::info!("Clearing {} items", self.follow.len());
                self.follow.clear();
            }
            ViewerCommand::Close => {}
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PoseState;
    use crate::config::CameraModelKind;
    use approx::assert_relative_eq;
    use lidarview_core::{Error, RigidTransform};

    fn orbit_pose(viewer: &Viewer) -> crate::camera::OrbitPose {
        match viewer.controller().pose() {
            PoseState::Orbit(pose) => *pose,
            other => panic!("expected orbit pose, got {:?}", other),
        }
    }

    #[test]
    fn test_held_key_moves_every_tick() {
        let mut viewer = Viewer::default();
        let start = orbit_pose(&viewer).azimuth;
        assert_eq!(
            viewer.on_key_down(KeyCode::ArrowLeft),
            KeyResponse::Navigation(NavigationKey::RotateLeft)
        );
        assert!(viewer.tick());
        assert!(viewer.tick());
        assert_relative_eq!(orbit_pose(&viewer).azimuth, start + 1.0, epsilon = 1e-12);

        viewer.on_key_up(KeyCode::ArrowLeft);
        assert!(!viewer.tick());
    }

    #[test]
    fn test_view_matrix_follows_pose_changes() {
        let mut viewer = Viewer::default();
        let before = viewer.view_matrix();
        viewer.on_wheel(MouseScrollDelta::LineDelta(0.0, 1.0));
        assert!(viewer.tick());
        assert_ne!(viewer.view_matrix(), before);
    }

    #[test]
    fn test_drag_rotates_orbit() {
        let mut viewer = Viewer::default();
        let start = orbit_pose(&viewer);
        viewer.on_mouse_down(MouseButton::Right, Some(Vector2::new(100.0, 100.0)));
        viewer.on_mouse_move(Vector2::new(110.0, 95.0));
        viewer.on_mouse_up(MouseButton::Right);
        viewer.tick();
        let pose = orbit_pose(&viewer);
        assert_relative_eq!(pose.azimuth, start.azimuth - 10.0, epsilon = 1e-12);
        assert_relative_eq!(pose.elevation, start.elevation - 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tapping_other_button_keeps_drag() {
        let mut viewer = Viewer::default();
        let start = orbit_pose(&viewer);
        viewer.on_mouse_down(MouseButton::Right, Some(Vector2::new(100.0, 100.0)));
        viewer.on_mouse_down(MouseButton::Left, Some(Vector2::new(100.0, 100.0)));
        viewer.on_mouse_up(MouseButton::Left);
        viewer.on_mouse_move(Vector2::new(120.0, 100.0));
        viewer.tick();
        assert_relative_eq!(orbit_pose(&viewer).azimuth, start.azimuth - 20.0, epsilon = 1e-12);

        let mut viewer = Viewer::default();
        let start = orbit_pose(&viewer);
        viewer.on_mouse_down(MouseButton::Left, Some(Vector2::new(100.0, 100.0)));
        viewer.on_mouse_down(MouseButton::Right, Some(Vector2::new(100.0, 100.0)));
        viewer.on_mouse_up(MouseButton::Right);
        viewer.on_mouse_move(Vector2::new(140.0, 100.0));
        viewer.tick();
        let pose = orbit_pose(&viewer);
        assert_relative_eq!(pose.azimuth, start.azimuth, epsilon = 1e-12);
        assert!((pose.center - start.center).norm() > 1e-6);
    }

    #[test]
    fn test_advance_runs_due_ticks() {
        let mut viewer = Viewer::default();
        let start = orbit_pose(&viewer).azimuth;
        viewer.on_key_down(KeyCode::ArrowRight);
        assert!(viewer.advance(Duration::from_millis(60)));
        assert_relative_eq!(orbit_pose(&viewer).azimuth, start - 1.5, epsilon = 1e-12);
        assert!(!viewer.advance(Duration::from_millis(5)));
    }

    #[test]
    fn test_follow_moves_orbit_center() {
        let mut viewer = Viewer::default();
        let target = Vector3::new(4.0, -2.0, 1.0);
        viewer
            .follow_targets_mut()
            .set_pose("vehicle", RigidTransform::translation(target));
        viewer.follow("vehicle").unwrap();
        assert!(viewer.tick());
        assert_eq!(orbit_pose(&viewer).center, target);
        // Already centered: nothing left to do.
        assert!(!viewer.tick());
    }

    #[test]
    fn test_commands() {
        let mut viewer = Viewer::default();
        viewer
            .follow_targets_mut()
            .set_pose("a", RigidTransform::identity());
        assert_eq!(viewer.on_key_down(KeyCode::KeyM), KeyResponse::Command(ViewerCommand::OpenSettings));
        assert!(viewer.settings_open());
        assert_eq!(viewer.on_key_down(KeyCode::KeyR), KeyResponse::Command(ViewerCommand::ClearItems));
        assert!(viewer.follow_targets().is_empty());
        assert_eq!(viewer.on_key_down(KeyCode::F1), KeyResponse::Ignored);
    }

    #[test]
    fn test_free_flight_arrow_up_tilts() {
        let mut viewer = Viewer::new(NavigationConfig::for_model(CameraModelKind::FreeFlight));
        assert_eq!(
            viewer.on_key_down(KeyCode::ArrowUp),
            KeyResponse::Navigation(NavigationKey::TiltUp)
        );
        assert!(viewer.tick());
    }

    #[test]
    fn test_bad_background_keeps_previous() {
        let mut viewer = Viewer::default();
        viewer.set_background_color("#102030").unwrap();
        assert!(matches!(viewer.set_background_color("blue"), Err(Error::InvalidInput(_))));
        assert_eq!(viewer.background_color(), [0x10, 0x20, 0x30]);
    }

    #[test]
    fn test_focus_lost_releases_keys() {
        let mut viewer = Viewer::default();
        viewer.on_key_down(KeyCode::KeyW);
        viewer.on_focus_lost();
        assert!(viewer.input().held_keys().is_empty());
        assert!(!viewer.tick());
    }
}
