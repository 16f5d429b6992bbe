use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// 2D vector type used throughout Frontier.
///
/// World space is y-up; UI space (see [`crate::render`]) is y-down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

/// Camera describing which part of the world is visible.
///
/// `position` is the bottom-left corner of the view in world units, which is
/// exactly the offset produced by [`crate::camera::center_on`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

impl Camera2D {
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Orthographic y-up projection for a viewport of the given size.
    pub fn view_projection(&self, width: f64, height: f64) -> DMat4 {
        let projection = DMat4::orthographic_rh_gl(0.0, width, 0.0, height, -1.0, 1.0);
        let translation =
            DMat4::from_translation(DVec3::new(-self.position.x, -self.position.y, 0.0));
        projection * translation
    }
}
