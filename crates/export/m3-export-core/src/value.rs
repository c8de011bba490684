//! Primitive value types of the target format.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Quaternion (x, y, z, w)
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Four bytes stored as x/y/z/w.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vec4U8 {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub w: u8,
}

/// RGBA color with 8 bits per channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Row vectors x, y, z, w.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix44 {
    pub x: Vec4,
    pub y: Vec4,
    pub z: Vec4,
    pub w: Vec4,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Boundings {
    pub min: Vec3,
    pub max: Vec3,
    pub radius: f32,
}

/// Smallest extent used for the max corner of placeholder boundings.
pub const BOUNDINGS_EPSILON: f32 = 9.536_743_164_062_5e-7;

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Color {
    /// Converts a 0..1 float RGBA color, rounding and clamping each channel.
    pub fn from_unit_rgba(rgba: [f32; 4]) -> Self {
        Self {
            red: unit_to_byte(rgba[0]),
            green: unit_to_byte(rgba[1]),
            blue: unit_to_byte(rgba[2]),
            alpha: unit_to_byte(rgba[3]),
        }
    }
}

fn unit_to_byte(c: f32) -> u8 {
    (c * 255.0).round_ties_even().clamp(0.0, 255.0) as u8
}

impl Matrix44 {
    pub const IDENTITY: Self = Self {
        x: Vec4::new(1.0, 0.0, 0.0, 0.0),
        y: Vec4::new(0.0, 1.0, 0.0, 0.0),
        z: Vec4::new(0.0, 0.0, 1.0, 0.0),
        w: Vec4::new(0.0, 0.0, 0.0, 1.0),
    };
}

impl Default for Matrix44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Boundings {
    /// All-zero boundings.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Near-empty box at the origin with the given sphere radius.
    pub fn almost_empty_with_radius(radius: f32) -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::new(BOUNDINGS_EPSILON, BOUNDINGS_EPSILON, BOUNDINGS_EPSILON),
            radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_channels_round_and_clamp() {
        let c = Color::from_unit_rgba([0.5, 1.2, -0.3, 1.0]);
        assert_eq!(
            c,
            Color {
                red: 128,
                green: 255,
                blue: 0,
                alpha: 255
            }
        );
    }

    #[test]
    fn almost_empty_boundings_keep_radius() {
        let b = Boundings::almost_empty_with_radius(2.0);
        assert_eq!(b.min, Vec3::ZERO);
        assert_eq!(b.max.x, BOUNDINGS_EPSILON);
        assert_eq!(b.radius, 2.0);
    }
}
