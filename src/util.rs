//! Vector math and small geometry helpers.
//!
//! This module provides:
//! - [`Vec2`]: the 2D vector type used for positions and motion
//! - Distance helpers (`dist`, `dist_sq`)
//! - Angle constants re-exported for sketch code

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// The ratio of a circle's circumference to its diameter.
pub const PI: f64 = std::f64::consts::PI;
/// Half of [`PI`].
pub const HALF_PI: f64 = std::f64::consts::FRAC_PI_2;
/// Twice [`PI`], one full turn in radians.
pub const TWO_PI: f64 = std::f64::consts::TAU;

/// A 2D vector with `f64` components.
///
/// Used for entity positions, pointer coordinates, and general sketch math.
/// Arithmetic operators are implemented for both vector-vector and
/// vector-scalar forms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a vector from components.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Overwrites both components in place.
    pub fn set(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Length of the vector.
    pub fn mag(&self) -> f64 {
        self.mag_sq().sqrt()
    }

    /// Squared length, cheaper than [`Vec2::mag`] for comparisons.
    pub fn mag_sq(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Returns the vector scaled to unit length.
    ///
    /// The zero vector has no direction and is returned unchanged.
    pub fn normalized(self) -> Self {
        let mag = self.mag();
        if mag == 0.0 { self } else { self / mag }
    }

    /// Returns the vector scaled to the given length.
    pub fn with_mag(self, mag: f64) -> Self {
        self.normalized() * mag
    }

    /// Caps the vector's length at `max`, keeping its direction.
    pub fn limit(self, max: f64) -> Self {
        let mag = self.mag();
        if mag > max { self / mag * max } else { self }
    }

    /// Heading angle in radians, measured from the positive x axis.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// A vector perpendicular to this one (rotated a quarter turn
    /// counter-clockwise).
    pub fn perp(&self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Returns the vector rotated by `angle` radians.
    pub fn rotated(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Distance between two points.
    pub fn dist(a: Vec2, b: Vec2) -> f64 {
        (b - a).mag()
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl DivAssign<f64> for Vec2 {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Distance between two points given as raw coordinates.
pub fn dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    dist_sq(x1, y1, x2, y2).sqrt()
}

/// Squared distance between two points given as raw coordinates.
pub fn dist_sq(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_produces_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!((v.mag() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalizing_zero_stays_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn limit_caps_long_vectors_only() {
        let long = Vec2::new(6.0, 8.0).limit(5.0);
        assert!((long.mag() - 5.0).abs() < 1e-12);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(short.limit(5.0), short);
    }

    #[test]
    fn rotated_quarter_turn_matches_perp() {
        let v = Vec2::new(2.0, 1.0);
        let r = v.rotated(HALF_PI);
        let p = v.perp();
        assert!((r.x - p.x).abs() < 1e-12);
        assert!((r.y - p.y).abs() < 1e-12);
    }

    #[test]
    fn dist_matches_vector_form() {
        let d = dist(0.0, 0.0, 3.0, 4.0);
        assert_eq!(d, 5.0);
        assert_eq!(Vec2::dist(Vec2::ZERO, Vec2::new(3.0, 4.0)), 5.0);
    }
}
