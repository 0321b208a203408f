//! Model rotation state
//!
//! Cumulative rotation per axis, in whole degrees. Orientation actions add or
//! subtract a quarter turn; angles are never wrapped, so four clockwise turns
//! read 360 (the same orientation as 0).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Degrees applied by a single rotate action
pub const QUARTER_TURN: i32 = 90;

/// Rotation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in the order they are written to the configuration document
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Lowercase identifier used in configuration keys
    pub fn key(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
            Self::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(format!("Unknown axis: {}", s)),
        }
    }
}

/// Direction of a quarter-turn rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise
    pub fn sign(&self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => write!(f, "CW"),
            Self::CounterClockwise => write!(f, "CCW"),
        }
    }
}

impl FromStr for RotationDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cw" | "+" | "clockwise" => Ok(Self::Clockwise),
            "ccw" | "-" | "counterclockwise" | "counter-clockwise" => Ok(Self::CounterClockwise),
            _ => Err(format!("Unknown rotation direction: {}", s)),
        }
    }
}

/// Cumulative rotation angle for each axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RotationState {
    /// Zero rotation on every axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Angle for an axis, in degrees
    pub fn angle(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Set the angle for an axis directly
    pub fn set_angle(&mut self, axis: Axis, degrees: i32) {
        *self.angle_mut(axis) = degrees;
    }

    /// Apply one quarter turn and return the signed delta in degrees
    pub fn rotate(&mut self, axis: Axis, direction: RotationDirection) -> i32 {
        let delta = QUARTER_TURN * direction.sign();
        let angle = self.angle_mut(axis);
        *angle = angle.saturating_add(delta);
        delta
    }

    /// Return every axis to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when every axis is at zero degrees
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Angle for an axis folded into 0..360
    pub fn normalized(&self, axis: Axis) -> i32 {
        self.angle(axis).rem_euclid(360)
    }

    /// (axis, angle) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (Axis, i32)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self.angle(axis)))
    }

    fn angle_mut(&mut self, axis: Axis) -> &mut i32 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_returns_delta() {
        let mut state = RotationState::new();
        assert_eq!(state.rotate(Axis::Y, RotationDirection::Clockwise), 90);
        assert_eq!(state.rotate(Axis::Y, RotationDirection::CounterClockwise), -90);
        assert_eq!(state.rotate(Axis::Y, RotationDirection::CounterClockwise), -90);
        assert_eq!(state.angle(Axis::Y), -90);
        assert_eq!(state.normalized(Axis::Y), 270);
    }

    #[test]
    fn test_iter_order() {
        let state = RotationState { x: 1, y: 2, z: 3 };
        let pairs: Vec<_> = state.iter().collect();
        assert_eq!(pairs, vec![(Axis::X, 1), (Axis::Y, 2), (Axis::Z, 3)]);
    }

    #[test]
    fn test_parse_axis_and_direction() {
        assert_eq!("Z".parse(), Ok(Axis::Z));
        assert!("w".parse::<Axis>().is_err());
        assert_eq!("ccw".parse(), Ok(RotationDirection::CounterClockwise));
        assert_eq!("+".parse(), Ok(RotationDirection::Clockwise));
    }
}
