use boid_shared::Position;

use crate::math;

/// A 2D vector used for position and heading.
///
/// Coordinates follow the screen convention (y grows downward), so a
/// positive rotation turns clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

/// Forward vector of a boid with heading 0
pub const NORTH: Vector2D = Vector2D { x: 0.0, y: -1.0 };

impl Vector2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector for a heading in degrees (0 = up, 90 = right)
    pub fn from_heading(degrees: f32) -> Self {
        let (sin, cos) = math::sin_cos(degrees * math::DEG_TO_RAD);
        Self { x: sin, y: -cos }
    }

    /// Heading in [0, 360) of this vector; 0 for the zero vector
    pub fn heading(&self) -> f32 {
        normalize_angle(NORTH.angle_to(self))
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn magnitude(&self) -> f32 {
        math::sqrt(self.x * self.x + self.y * self.y)
    }

    /// Unit vector in the same direction.
    ///
    /// The zero vector normalizes to the zero vector; callers that need a
    /// direction must check [`Vector2D::is_zero`] on the result.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Signed angle in degrees from `self` to `other`, in (-180, 180].
    ///
    /// Positive values mean `other` is reached by a positive [`rotate`](Self::rotate).
    /// Returns 0 if either vector is zero.
    pub fn angle_to(&self, other: &Vector2D) -> f32 {
        if self.is_zero() || other.is_zero() {
            return 0.0;
        }
        let cross = self.x * other.y - self.y * other.x;
        let degrees = math::atan2(cross, self.dot(other)) * math::RAD_TO_DEG;
        if degrees <= -180.0 {
            degrees + 360.0
        } else if degrees > 180.0 {
            180.0
        } else {
            degrees
        }
    }

    /// Rotate by `degrees` (clockwise on screen)
    pub fn rotate(&self, degrees: f32) -> Self {
        let (sin, cos) = math::sin_cos(degrees * math::DEG_TO_RAD);
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Linear interpolation; `t` is not clamped
    pub fn lerp(&self, other: &Vector2D, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_angle(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    let wrapped = if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    };
    // -1e-9 + 360.0 rounds to 360.0 in f32
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Linear interpolation between two scalars; `t` is not clamped
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

impl From<Position> for Vector2D {
    fn from(position: Position) -> Self {
        Self::new(position.x, position.y)
    }
}

impl From<Vector2D> for Position {
    fn from(vector: Vector2D) -> Self {
        Position::new(vector.x, vector.y)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}
