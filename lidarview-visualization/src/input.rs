//! Input accumulation between navigation ticks
//!
//! Toolkit callbacks only ever touch the [`InputAccumulator`]. The navigation
//! tick drains it once per period, so pose updates never race input arrival.

use std::collections::HashSet;

use nalgebra::Vector2;

/// Semantic navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    RotateUp,
    RotateDown,
    RotateLeft,
    RotateRight,
    TiltUp,
    TiltDown,
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

/// Mouse button driving a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragButton {
    /// Usually the left button: pans
    Primary,
    /// Usually the right button: rotates
    Secondary,
}

/// Raw input state owned by one viewer
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub held_keys: HashSet<NavigationKey>,
    pub last_drag_pos: Option<Vector2<f64>>,
    pub drag_button: Option<DragButton>,
    /// Drag buttons currently down, active or not
    pub pressed_buttons: HashSet<DragButton>,
}

/// Input gathered since the previous tick
#[derive(Debug, Clone, PartialEq)]
pub struct FrameInput {
    pub held_keys: HashSet<NavigationKey>,
    pub primary_drag: Vector2<f64>,
    pub secondary_drag: Vector2<f64>,
    pub wheel: f64,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            held_keys: HashSet::new(),
            primary_drag: Vector2::zeros(),
            secondary_drag: Vector2::zeros(),
            wheel: 0.0,
        }
    }
}

impl FrameInput {
    pub fn is_idle(&self) -> bool {
        self.held_keys.is_empty()
            && self.primary_drag == Vector2::zeros()
            && self.secondary_drag == Vector2::zeros()
            && self.wheel == 0.0
    }
}

/// Tracks held keys and the active drag, and sums drag and wheel deltas
#[derive(Debug, Clone)]
pub struct InputAccumulator {
    state: InputState,
    pending_primary: Vector2<f64>,
    pending_secondary: Vector2<f64>,
    pending_wheel: f64,
}

impl Default for InputAccumulator {
    fn default() -> Self {
        Self {
            state: InputState::default(),
            pending_primary: Vector2::zeros(),
            pending_secondary: Vector2::zeros(),
            pending_wheel: 0.0,
        }
    }
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Mark a key as held. Holding an already held key changes nothing.
    pub fn on_key_down(&mut self, key: NavigationKey) {
        self.state.held_keys.insert(key);
    }

    /// Release a key. Releasing a key that is not held is a no-op.
    pub fn on_key_up(&mut self, key: NavigationKey) {
        self.state.held_keys.remove(&key);
    }

    /// Keys currently held. Reading does not release anything, so motion
    /// continues every tick until the key goes up.
    pub fn held_keys(&self) -> &HashSet<NavigationKey> {
        &self.state.held_keys
    }

    /// Start a drag. A secondary drag is never replaced by a primary one.
    ///
    /// With no `pos` the first move establishes the reference position.
    pub fn on_drag_start(&mut self, button: DragButton, pos: Option<Vector2<f64>>) {
        self.state.pressed_buttons.insert(button);
        if self.state.drag_button == Some(DragButton::Secondary) && button == DragButton::Primary {
            return;
        }
        self.state.drag_button = Some(button);
        self.state.last_drag_pos = pos;
    }

    /// Record pointer motion, returning the delta credited to the active drag.
    ///
    /// Motion without an active drag is ignored. The first move after a drag
    /// started without a position only sets the reference and yields zero.
    pub fn on_drag_move(&mut self, pos: Vector2<f64>) -> Option<Vector2<f64>> {
        let button = self.state.drag_button?;
        let delta = match self.state.last_drag_pos {
            Some(last) => pos - last,
            None => Vector2::zeros(),
        };
        self.state.last_drag_pos = Some(pos);
        match button {
            DragButton::Primary => self.pending_primary += delta,
            DragButton::Secondary => self.pending_secondary += delta,
        }
        Some(delta)
    }

    /// Release a drag button.
    ///
    /// Releasing the active button hands the drag to the other button if it is
    /// still down, and clears the drag otherwise. Releasing an inactive button
    /// leaves the active drag untouched.
    pub fn on_drag_end(&mut self, button: DragButton) {
        self.state.pressed_buttons.remove(&button);
        if self.state.drag_button != Some(button) {
            return;
        }
        self.state.drag_button = self.state.pressed_buttons.iter().next().copied();
        if self.state.drag_button.is_none() {
            self.state.last_drag_pos = None;
        }
    }

    /// Record a scroll, returning the single-axis delta that was kept.
    ///
    /// The horizontal delta wins when it is non-zero.
    pub fn on_wheel(&mut self, dx: f64, dy: f64) -> f64 {
        let delta = if dx != 0.0 { dx } else { dy };
        self.pending_wheel += delta;
        delta
    }

    /// Drain drag and wheel deltas and snapshot the held keys for one tick
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            held_keys: self.state.held_keys.clone(),
            primary_drag: std::mem::replace(&mut self.pending_primary, Vector2::zeros()),
            secondary_drag: std::mem::replace(&mut self.pending_secondary, Vector2::zeros()),
            wheel: std::mem::replace(&mut self.pending_wheel, 0.0),
        }
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
