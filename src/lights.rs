// Light sources for Meadow-3D

use glam::{Mat4, Vec3};

use crate::draw::DrawBatch;
use crate::math::look_at_basis;

/// Point light with uniform distribution, sweeping back and forth along the
/// x axis as a pure function of accumulated time.
#[derive(Debug, Clone)]
pub struct PointLight {
    pub color: [f32; 3],
    pub position: Vec3,
    pub speed: f32,
    pub time: f32,
    pub enabled: bool,
}

impl PointLight {
    pub const AMPLITUDE: f32 = 5.0;

    pub fn new() -> Self {
        Self {
            color: [0.691, 0.653, 0.254],
            position: Vec3::new(-5.0, 5.0, 0.0),
            speed: 0.05,
            time: 0.0,
            enabled: true,
        }
    }

    /// Accumulate the frame delta and recompute the x sweep. Resetting
    /// `time` to zero restarts the sweep from the amplitude.
    pub fn update(&mut self, delta_time: f32) {
        self.time += delta_time;
        self.position.x = Self::AMPLITUDE * (self.speed * self.time).cos();
    }

    /// Marker sphere at the light's position, drawn unlit in the light's
    /// own color.
    pub fn draw(&self, batch: &mut DrawBatch) {
        if !self.enabled {
            return;
        }
        let color = [self.color[0], self.color[1], self.color[2], 1.0];
        batch.unlit_sphere(Mat4::from_translation(self.position), 0.2, 32, 32, color);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new()
    }
}

/// Spotlight emitting a cone of light towards a target point. The direction
/// is derived from the target each frame rather than stored.
#[derive(Debug, Clone)]
pub struct SpotLight {
    pub position: Vec3,
    pub target: Vec3,
    pub color: [f32; 3],
    pub cutoff: f32,
    pub exponent: f32,
    pub enabled: bool,
}

impl SpotLight {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(1.0, 2.5, 4.0),
            target: Vec3::new(0.1, 0.0, 0.0),
            color: [1.0, 1.0, 1.0],
            cutoff: 30.0,
            exponent: 0.0,
            enabled: true,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.target - self.position
    }

    /// Cone and barrel aimed at the target, with an unlit marker sphere at
    /// the emitter.
    pub fn draw(&self, batch: &mut DrawBatch) {
        if !self.enabled {
            return;
        }
        let body = [0.8, 0.8, 0.8, 1.0];
        let m = Mat4::from_translation(self.position)
            * look_at_basis(self.position, self.target, Vec3::Y);

        batch.solid_cone(m, 0.3, 0.6, 10, body);
        batch.solid_cylinder(
            m * Mat4::from_translation(Vec3::new(0.0, 0.0, 0.1)),
            0.2,
            0.2,
            0.39,
            10,
            body,
        );
        let color = [self.color[0], self.color[1], self.color[2], 1.0];
        batch.unlit_sphere(m, 0.2, 32, 32, color);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn point_light_starts_its_sweep_at_the_amplitude() {
        let mut light = PointLight::new();
        light.update(0.0);
        assert_relative_eq!(light.position.x, PointLight::AMPLITUDE);
    }

    #[test]
    fn point_light_crosses_zero_at_quarter_period() {
        let mut light = PointLight::new();
        // speed * time = pi / 2
        light.update(PI / 2.0 / light.speed);
        assert_relative_eq!(light.position.x, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn point_light_sweep_restarts_after_time_reset() {
        let mut light = PointLight::new();
        light.update(123.4);
        light.time = 0.0;
        light.update(0.0);
        assert_relative_eq!(light.position.x, PointLight::AMPLITUDE);
    }

    #[test]
    fn spot_direction_follows_the_target() {
        let mut spot = SpotLight::new();
        spot.target = Vec3::new(2.0, 2.5, 4.0);
        assert_relative_eq!(spot.direction().x, 1.0);
        assert_relative_eq!(spot.direction().y, 0.0);
        assert_relative_eq!(spot.direction().z, 0.0);
    }

    #[test]
    fn disabled_lights_draw_nothing() {
        let mut batch = DrawBatch::new();
        let mut light = PointLight::new();
        light.disable();
        light.draw(&mut batch);
        assert!(batch.vertices.is_empty());
    }
}
