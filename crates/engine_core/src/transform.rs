//! Transform component and orientation helpers.

use glam::{Quat, Vec3};

/// A ship's pose: position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    /// Create a transform at `position` facing along `heading`.
    pub fn from_position_heading(position: Vec3, heading: Vec3) -> Self {
        Self {
            position,
            rotation: heading_rotation(heading),
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }
}

/// Rotation that points the forward axis (-Z) along `heading`.
pub fn heading_rotation(heading: Vec3) -> Quat {
    let heading = heading.normalize_or_zero();
    if heading == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    Quat::from_rotation_arc(-Vec3::Z, heading)
}

/// Angle in degrees between two directions.
pub fn angle_between_degrees(a: Vec3, b: Vec3) -> f32 {
    let a = a.normalize_or_zero();
    let b = b.normalize_or_zero();
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Rotate `rotation` so its forward axis moves toward `heading` by at most
/// `max_degrees`. Returns the new rotation.
pub fn turn_towards(rotation: Quat, heading: Vec3, max_degrees: f32) -> Quat {
    let forward = rotation * -Vec3::Z;
    let heading = heading.normalize_or_zero();
    if heading == Vec3::ZERO || max_degrees <= 0.0 {
        return rotation;
    }
    let remaining = angle_between_degrees(forward, heading);
    if remaining <= f32::EPSILON {
        return rotation;
    }
    let arc = Quat::from_rotation_arc(forward, heading);
    let step = if remaining <= max_degrees {
        arc
    } else {
        let (axis, _) = arc.to_axis_angle();
        Quat::from_axis_angle(axis, max_degrees.to_radians())
    };
    (step * rotation).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_rotation_points_forward_axis() {
        let heading = Vec3::new(1.0, 0.0, 1.0).normalize();
        let t = Transform::from_position_heading(Vec3::ZERO, heading);
        assert!(t.forward().distance(heading) < 1e-5);
    }

    #[test]
    fn turn_towards_is_rate_limited() {
        let start = heading_rotation(Vec3::X);
        let turned = turn_towards(start, Vec3::Z, 30.0);
        let forward = turned * -Vec3::Z;
        assert!((angle_between_degrees(forward, Vec3::X) - 30.0).abs() < 0.01);
        assert!((angle_between_degrees(forward, Vec3::Z) - 60.0).abs() < 0.01);
    }

    #[test]
    fn turn_towards_snaps_when_close() {
        let start = heading_rotation(Vec3::X);
        let turned = turn_towards(start, Vec3::Z, 120.0);
        assert!(angle_between_degrees(turned * -Vec3::Z, Vec3::Z) < 0.01);
    }

    #[test]
    fn turn_towards_handles_reversal() {
        let start = heading_rotation(Vec3::X);
        let turned = turn_towards(start, -Vec3::X, 90.0);
        let forward = turned * -Vec3::Z;
        assert!((angle_between_degrees(forward, Vec3::X) - 90.0).abs() < 0.01);
    }
}
