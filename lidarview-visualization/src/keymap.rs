//! Mapping from winit input to navigation input

use winit::event::{MouseButton, MouseScrollDelta};
use winit::keyboard::KeyCode;

use crate::config::CameraModelKind;
use crate::input::{DragButton, NavigationKey};

/// Wheel units reported per notch of a line-based scroll
pub const WHEEL_UNITS_PER_LINE: f64 = 120.0;

/// Viewer actions bound to keys outside of navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    OpenSettings,
    ClearItems,
    Close,
}

/// Navigation key bound to `code` under the given camera model.
///
/// Arrow up/down rotate the orbit camera but tilt the free-flight camera.
pub fn navigation_key(code: KeyCode, model: CameraModelKind) -> Option<NavigationKey> {
    let key = match code {
        KeyCode::ArrowUp => match model {
            CameraModelKind::Orbit => NavigationKey::RotateUp,
            CameraModelKind::FreeFlight => NavigationKey::TiltUp,
        },
        KeyCode::ArrowDown => match model {
            CameraModelKind::Orbit => NavigationKey::RotateDown,
            CameraModelKind::FreeFlight => NavigationKey::TiltDown,
        },
        KeyCode::ArrowLeft => NavigationKey::RotateLeft,
        KeyCode::ArrowRight => NavigationKey::RotateRight,
        KeyCode::KeyZ => NavigationKey::MoveForward,
        KeyCode::KeyX => NavigationKey::MoveBackward,
        KeyCode::KeyA => NavigationKey::MoveLeft,
        KeyCode::KeyD => NavigationKey::MoveRight,
        KeyCode::KeyW => NavigationKey::MoveUp,
        KeyCode::KeyS => NavigationKey::MoveDown,
        _ => return None,
    };
    Some(key)
}

pub fn viewer_command(code: KeyCode) -> Option<ViewerCommand> {
    match code {
        KeyCode::KeyM => Some(ViewerCommand::OpenSettings),
        KeyCode::KeyR => Some(ViewerCommand::ClearItems),
        KeyCode::Escape => Some(ViewerCommand::Close),
        _ => None,
    }
}

pub fn drag_button(button: MouseButton) -> Option<DragButton> {
    match button {
        MouseButton::Left => Some(DragButton::Primary),
        MouseButton::Right => Some(DragButton::Secondary),
        _ => None,
    }
}

/// Scroll delta as `(horizontal, vertical)` wheel units
pub fn wheel_units(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (
            f64::from(x) * WHEEL_UNITS_PER_LINE,
            f64::from(y) * WHEEL_UNITS_PER_LINE,
        ),
        MouseScrollDelta::PixelDelta(pos) => (pos.x, pos.y),
    }
}
