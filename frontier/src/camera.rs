//! Camera follow for the tracked sprite.
//!
//! Keyboard input drives the target's velocity, mouse drags move it directly,
//! and once per tick the camera is recentred on it.

use crate::math::Vec2;

/// Camera offset: bottom-left corner of the visible area in world units.
pub type Offset = Vec2;

/// Size of the visible area, supplied by the host window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The entity the camera tracks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraTarget {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl CameraTarget {
    /// A target at the world origin, standing still.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Movement direction carried by a directional key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Movement settings for the camera target.
#[derive(Clone, Copy, Debug)]
pub struct CameraFollow {
    /// Velocity magnitude set by a directional key, in units per tick.
    pub speed: f64,
    /// Move the target against the drag direction instead of with it.
    pub invert_mouse: bool,
}

impl CameraFollow {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            invert_mouse: false,
        }
    }

    #[must_use]
    pub fn with_invert_mouse(mut self, invert: bool) -> Self {
        self.invert_mouse = invert;
        self
    }

    /// Apply a directional key event to the target's velocity.
    ///
    /// Key-down sets the axis to `±speed`, overriding whatever the other key on
    /// that axis did. Key-up zeroes the axis even if the opposite key is still
    /// held.
    pub fn apply_movement_input(&self, target: &mut CameraTarget, direction: Direction, pressed: bool) {
        let value = match (direction, pressed) {
            (_, false) => 0.0,
            (Direction::Up | Direction::Right, true) => self.speed,
            (Direction::Down | Direction::Left, true) => -self.speed,
        };
        match direction {
            Direction::Up | Direction::Down => target.velocity.y = value,
            Direction::Left | Direction::Right => target.velocity.x = value,
        }
    }

    /// Move the target by a mouse drag delta (world units, y-up).
    pub fn apply_drag(&self, target: &mut CameraTarget, delta: Vec2) {
        if self.invert_mouse {
            target.position -= delta;
        } else {
            target.position += delta;
        }
    }
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self::new(5.0)
    }
}

/// Advance the target by one tick of its current velocity.
pub fn integrate(target: &mut CameraTarget) {
    target.position += target.velocity;
}

/// Camera offset that puts `target` in the middle of `viewport`.
pub fn center_on(target: &CameraTarget, viewport: Viewport) -> Offset {
    target.position - viewport.center()
}

/// Convert a UI point (origin top-left, y down) to world coordinates.
pub fn to_world(ui_point: Vec2, offset: Offset, viewport: Viewport) -> Vec2 {
    Vec2::new(
        ui_point.x + offset.x,
        (viewport.height - ui_point.y) + offset.y,
    )
}
