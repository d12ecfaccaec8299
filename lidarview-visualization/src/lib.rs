//! Camera navigation for point cloud viewing
//!
//! This crate turns mouse and keyboard input into camera motion:
//! - Orbit and free-flight camera models
//! - Input accumulation between fixed-period ticks
//! - View matrix derivation with a fallback for degenerate poses
//! - A winit window loop that hands the camera to a render backend

pub mod camera;
pub mod clock;
pub mod config;
pub mod follow;
pub mod fps;
pub mod input;
pub mod interactive_viewer;
pub mod keymap;
pub mod navigation;
pub mod settings;
pub mod view;
pub mod viewer;

pub use camera::*;
pub use clock::*;
pub use config::*;
pub use follow::*;
pub use fps::*;
pub use input::*;
pub use interactive_viewer::*;
pub use keymap::*;
pub use navigation::*;
pub use settings::*;
pub use view::*;
pub use viewer::*;
