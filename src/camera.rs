// External-view camera for Meadow-3D

use glam::{Mat4, Vec3};

const CAMERA_SPEED: f32 = 2.0;
const MAX_HEIGHT: f32 = 30.0;

/// The camera controlling the external viewpoint. The eye orbits the scene
/// origin and moves vertically; the look-at target stays where it was set.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(8.0, 5.0, 16.0),
            target: Vec3::new(-2.0, 0.0, 0.0),
        }
    }
}

impl Camera {
    pub fn set_position(&mut self, x: f32, y: f32, z: f32) {
        self.position = Vec3::new(x, y, z);
    }

    pub fn set_target(&mut self, x: f32, y: f32, z: f32) {
        self.target = Vec3::new(x, y, z);
    }

    /// View matrix from the current eye and target, y-up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Swing the eye around the y axis by `delta` radians, keeping its
    /// distance from the origin and its height.
    pub fn orbit(&mut self, delta: f32) {
        let distance = (self.position.x.powi(2) + self.position.z.powi(2)).sqrt();
        let angle = self.position.z.atan2(self.position.x) + delta;
        self.set_position(angle.cos() * distance, self.position.y, angle.sin() * distance);
    }

    /// Raise the eye, stopping at the 30-unit ceiling.
    pub fn ascend(&mut self) {
        if self.position.y < MAX_HEIGHT {
            self.position.y += 0.1 * CAMERA_SPEED;
        }
    }

    /// Lower the eye, refusing to go below ground level.
    pub fn descend(&mut self) {
        if self.position.y > 0.5 * CAMERA_SPEED {
            self.position.y -= 0.1 * CAMERA_SPEED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orbit_preserves_distance_and_height() {
        let mut camera = Camera::default();
        let before = (camera.position.x.powi(2) + camera.position.z.powi(2)).sqrt();
        camera.orbit(0.1);
        let after = (camera.position.x.powi(2) + camera.position.z.powi(2)).sqrt();
        assert_relative_eq!(before, after, epsilon = 1e-4);
        assert_relative_eq!(camera.position.y, 5.0);
    }

    #[test]
    fn height_is_clamped_to_its_bounds() {
        let mut camera = Camera::default();
        for _ in 0..1_000 {
            camera.ascend();
        }
        assert!(camera.position.y <= MAX_HEIGHT + 0.2);

        for _ in 0..1_000 {
            camera.descend();
        }
        assert!(camera.position.y >= 0.5 * CAMERA_SPEED - 0.2);
    }

    #[test]
    fn target_is_untouched_by_movement() {
        let mut camera = Camera::default();
        camera.orbit(1.0);
        camera.ascend();
        assert_eq!(camera.target, Vec3::new(-2.0, 0.0, 0.0));
    }
}
