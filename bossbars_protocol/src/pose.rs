//! Positions and orientations as they are sent to the client
use serde::{Deserialize, Serialize};

/// Positions are sent as fixed-point integers with 5 fractional bits
pub const FIXED_POINT_SCALE: f64 = 32.0;

/// A location in the world, with the orientation of whoever stands there.
///
/// Equality is exact: two poses are equal only if every field is bit-for-bit identical
/// (apart from the usual IEEE rules for `0.0 == -0.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Rotation around the vertical axis, in degrees. 0 faces +Z, 90 faces -X.
    pub yaw: f32,
    /// Rotation around the horizontal axis, in degrees. Positive values look down.
    pub pitch: f32,
}

impl Pose {
    pub const fn new(x: f64, y: f64, z: f64, yaw: f32, pitch: f32) -> Self {
        Self {
            x,
            y,
            z,
            yaw,
            pitch,
        }
    }

    /// Position encoded as fixed-point integers, truncated towards zero
    pub fn fixed_position(&self) -> [i32; 3] {
        [fixed_point(self.x), fixed_point(self.y), fixed_point(self.z)]
    }
}

/// Encode a coordinate as `unit * 32`, truncated to an integer.
///
/// Out-of-range values saturate and NaN maps to 0.
pub fn fixed_point(value: f64) -> i32 {
    (value * FIXED_POINT_SCALE) as i32
}

/// Encode a coordinate the way a freshly spawned entity is placed: `floor(unit * 32)`
pub fn fixed_point_floor(value: f64) -> i32 {
    (value * FIXED_POINT_SCALE).floor() as i32
}

/// Encode an angle as a byte: `int(degrees) * 256 / 360`, wrapping into the signed byte range.
///
/// The whole-degree truncation happens before the scaling.
pub fn angle_byte(degrees: f32) -> i8 {
    ((degrees as i32).wrapping_mul(256) / 360) as i8
}

/// Encode an angle as a byte, scaling before truncation (used by the spawn packet)
pub fn scaled_angle_byte(degrees: f32) -> i8 {
    ((degrees * 256.0 / 360.0) as i32) as i8
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_fixed_point_truncates_towards_zero() {
        assert_eq!(fixed_point(1.0), 32);
        assert_eq!(fixed_point(1.99), 63);
        assert_eq!(fixed_point(-1.99), -63);
        assert_eq!(fixed_point_floor(-1.99), -64);
        assert_eq!(fixed_point(f64::NAN), 0);
    }

    #[test]
    fn test_angle_byte() {
        assert_eq!(angle_byte(0.0), 0);
        assert_eq!(angle_byte(90.0), 64);
        // 45.9 is truncated to 45 before scaling
        assert_eq!(angle_byte(45.9), 32);
        assert_eq!(angle_byte(-90.0), -64);
        // 180 * 256 / 360 = 128, which wraps around in a signed byte
        assert_eq!(angle_byte(180.0), -128);
        assert_eq!(angle_byte(270.0), -64);
        assert_eq!(scaled_angle_byte(45.9), 32);
        assert_eq!(scaled_angle_byte(1.5), 1);
    }
}
