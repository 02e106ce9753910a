// Math utilities for Meadow-3D

use glam::{Vec3, Mat4, Quat, Vec4};

/// Represents a 3D transformation
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Generate transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.position
        )
    }
}

/// A bounded triangle-wave value advanced by a fixed step per tick.
///
/// The direction flips when the value is found beyond the limit at the start
/// of a tick, so the value may overshoot the limit by up to one step. The
/// overshoot is part of the animation's look and is kept.
#[derive(Debug, Clone, Copy)]
pub struct Oscillator {
    value: f32,
    step: f32,
    limit: f32,
    rising: bool,
}

impl Oscillator {
    pub fn new(step: f32, limit: f32) -> Self {
        Self {
            value: 0.0,
            step,
            limit,
            rising: true,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance one tick: reverse direction if out of bounds, then step.
    pub fn advance(&mut self) {
        if self.value > self.limit || self.value < -self.limit {
            self.rising = !self.rising;
        }
        if self.rising {
            self.value += self.step;
        } else {
            self.value -= self.step;
        }
    }
}

/// Build the rotation that orients an object at `eye` towards `target`.
///
/// Forward is normalized `target − eye`, the side axis is forward × up, and
/// up is recomputed from side × forward so the basis stays orthonormal even
/// when the supplied up vector is not orthogonal to forward. Columns are
/// (side, up, −forward).
pub fn look_at_basis(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize();
    let s = f.cross(up.normalize()).normalize();
    let u = s.cross(f).normalize();

    Mat4::from_cols(
        Vec4::new(s.x, s.y, s.z, 0.0),
        Vec4::new(u.x, u.y, u.z, 0.0),
        Vec4::new(-f.x, -f.y, -f.z, 0.0),
        Vec4::W,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn oscillator_stays_within_one_step_of_limit() {
        let mut tail = Oscillator::new(0.3, 8.0);
        for _ in 0..10_000 {
            tail.advance();
            assert!(
                tail.value().abs() <= 8.3 + 1e-4,
                "oscillator escaped bounds: {}",
                tail.value()
            );
        }
    }

    #[test]
    fn oscillator_reverses_after_overshoot() {
        let mut legs = Oscillator::new(6.0, 20.0);
        // 0 -> 6 -> 12 -> 18 -> 24, the first value past the limit
        for _ in 0..4 {
            legs.advance();
        }
        assert_relative_eq!(legs.value(), 24.0);
        legs.advance();
        assert_relative_eq!(legs.value(), 18.0);
    }

    #[test]
    fn look_at_basis_canonical_frame() {
        let m = look_at_basis(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        let side = m.x_axis.truncate();
        let up = m.y_axis.truncate();
        let back = m.z_axis.truncate();

        assert_relative_eq!(side.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, 1.0, epsilon = 1e-6);
        // third column is −forward, so it points along +z here
        assert_relative_eq!(back.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn look_at_basis_is_orthonormal_for_skewed_up() {
        // An up vector deliberately not orthogonal to forward.
        let m = look_at_basis(
            Vec3::new(1.0, 2.5, 4.0),
            Vec3::new(0.1, 0.0, 0.0),
            Vec3::new(0.3, 1.0, 0.1),
        );
        let s = m.x_axis.truncate();
        let u = m.y_axis.truncate();
        let b = m.z_axis.truncate();

        assert_relative_eq!(s.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(u.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(b.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(s.dot(u), 0.0, epsilon = 1e-5);
        assert_relative_eq!(s.dot(b), 0.0, epsilon = 1e-5);
        assert_relative_eq!(u.dot(b), 0.0, epsilon = 1e-5);
    }
}
