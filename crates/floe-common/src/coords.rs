//! Arena-space vectors and bounds.
//!
//! World units are canvas pixels: the reference arena is 800x600 with the
//! origin at the top-left corner and y growing downward.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D vector for positions, velocities and directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a new Vec2.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Returns the length (magnitude) of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns a normalized (unit length) version of the vector.
    /// Returns zero vector if the vector has zero length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Angle of the vector in radians, as `atan2(y, x)`.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Angle from this point toward `other`.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f32 {
        (other - self).angle()
    }

    /// Dot product of two vectors.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Scale the vector by a scalar.
    #[must_use]
    pub fn scale(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Component-wise clamp into `[min, max]`.
    #[must_use]
    pub fn clamp_components(self, min: f32, max: f32) -> Self {
        Self {
            x: self.x.clamp(min, max),
            y: self.y.clamp(min, max),
        }
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        self.scale(rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::MulAssign<f32> for Vec2 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// Rectangular arena with an inner padding that actors cannot cross.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Arena width in world units
    pub width: f32,
    /// Arena height in world units
    pub height: f32,
    /// Distance from each edge that actors are kept away from
    pub padding: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            padding: 50.0,
        }
    }
}

impl ArenaBounds {
    /// Creates new arena bounds.
    #[must_use]
    pub const fn new(width: f32, height: f32, padding: f32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Center of the arena.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps a point into the playable area.
    ///
    /// An arena smaller than twice its padding collapses to its center.
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        let max_x = (self.width - self.padding).max(self.padding);
        let max_y = (self.height - self.padding).max(self.padding);
        if self.width < self.padding * 2.0 || self.height < self.padding * 2.0 {
            return self.center();
        }
        Vec2::new(
            point.x.clamp(self.padding, max_x),
            point.y.clamp(self.padding, max_y),
        )
    }

    /// Whether a point lies inside the playable area.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.padding
            && point.x <= self.width - self.padding
            && point.y >= self.padding
            && point.y <= self.height - self.padding
    }
}
