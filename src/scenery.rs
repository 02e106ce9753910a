// Static scenery for Meadow-3D: ground, lake, farmhouse, and fence.

use glam::{Mat4, Vec3};

use crate::draw::DrawBatch;

/// Flat terrain drawn as a grid of unit quads so per-vertex lighting has
/// something to work with.
pub struct Ground {
    start_x: i32,
    start_z: i32,
    end_x: i32,
    end_z: i32,
    color: [f32; 4],
}

impl Ground {
    pub fn new() -> Self {
        Self {
            start_x: -50,
            start_z: -50,
            end_x: 50,
            end_z: 50,
            // Dark green
            color: [0.0, 0.39, 0.0, 1.0],
        }
    }

    pub fn draw(&self, batch: &mut DrawBatch) {
        for x in self.start_x..self.end_x {
            for z in self.start_z..self.end_z {
                let (x, z) = (x as f32, z as f32);
                batch.quad(
                    Mat4::IDENTITY,
                    [
                        Vec3::new(x, 0.0, z),
                        Vec3::new(x + 1.0, 0.0, z),
                        Vec3::new(x + 1.0, 0.0, z + 1.0),
                        Vec3::new(x, 0.0, z + 1.0),
                    ],
                    Vec3::Y,
                    self.color,
                );
            }
        }
    }
}

impl Default for Ground {
    fn default() -> Self {
        Self::new()
    }
}

/// Water surface slightly above the ground, with a brown border loop. The
/// footprint doubles as the exclusion zone the cow may not walk into.
pub struct Lake {
    pub start_x: f32,
    pub start_z: f32,
    pub end_x: f32,
    pub end_z: f32,
    pub y: f32,
    pub color: [f32; 4],
}

impl Lake {
    pub fn new() -> Self {
        Self {
            start_x: 0.0,
            start_z: 50.0,
            end_x: -50.0,
            end_z: 0.0,
            y: 0.1,
            // Semi-transparent blue
            color: [0.0, 0.4, 1.0, 0.7],
        }
    }

    pub fn draw(&self, batch: &mut DrawBatch) {
        batch.quad(
            Mat4::IDENTITY,
            [
                Vec3::new(self.start_x, self.y, self.start_z),
                Vec3::new(self.end_x, self.y, self.start_z),
                Vec3::new(self.end_x, self.y, self.end_z),
                Vec3::new(self.start_x, self.y, self.end_z),
            ],
            Vec3::Y,
            self.color,
        );
        self.draw_border(batch);
    }

    fn draw_border(&self, batch: &mut DrawBatch) {
        let brown = [0.6, 0.3, 0.0, 1.0];
        let corners = [
            Vec3::new(self.start_x, self.y, self.start_z),
            Vec3::new(self.end_x, self.y, self.start_z),
            Vec3::new(self.end_x, self.y, self.end_z),
            Vec3::new(self.start_x, self.y, self.end_z),
        ];
        for i in 0..4 {
            batch.line(Mat4::IDENTITY, corners[i], corners[(i + 1) % 4], brown);
        }
    }
}

impl Default for Lake {
    fn default() -> Self {
        Self::new()
    }
}

/// Farmhouse assembly anchored at (5, 2.3, −10), scaled by five. The anchor
/// and footprint match the farmhouse exclusion zone.
pub struct Farmhouse;

impl Farmhouse {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, batch: &mut DrawBatch) {
        let base = Mat4::from_translation(Vec3::new(5.0, 2.3, -10.0))
            * Mat4::from_scale(Vec3::splat(5.0));

        // main structure
        batch.solid_cube(base, 1.0, [0.8, 0.8, 0.5, 1.0]);

        // roof, a four-sided cone
        batch.solid_cone(
            base * Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
                * Mat4::from_scale(Vec3::new(1.2, 0.5, 1.0)),
            1.0,
            1.0,
            4,
            [0.5, 0.25, 0.0, 1.0],
        );

        // chimney
        batch.solid_cube(
            base * Mat4::from_translation(Vec3::new(0.35, 0.4, 0.0))
                * Mat4::from_scale(Vec3::new(0.1, 0.4, 0.2)),
            1.0,
            [0.5, 0.25, 0.0, 1.0],
        );

        // door
        batch.solid_cube(
            base * Mat4::from_translation(Vec3::new(0.0, -0.25, 0.5))
                * Mat4::from_scale(Vec3::new(0.25, 0.5, 0.1)),
            1.0,
            [0.4, 0.2, 0.1, 1.0],
        );

        // windows on either side of the door
        for side in [-1.0f32, 1.0] {
            batch.solid_cube(
                base * Mat4::from_translation(Vec3::new(side * 0.4, 0.2, 0.5))
                    * Mat4::from_scale(Vec3::new(0.2, 0.2, 0.1)),
                1.0,
                [0.75, 0.75, 0.95, 1.0],
            );
        }
    }
}

impl Default for Farmhouse {
    fn default() -> Self {
        Self::new()
    }
}

/// Perimeter fence: posts every unit along all four ±50 edges with three
/// plank rows between neighbouring posts.
pub struct Fence;

impl Fence {
    const BROWN: [f32; 4] = [0.55, 0.27, 0.075, 1.0];

    pub fn new() -> Self {
        Self
    }

    /// Draw one full perimeter per requested section index.
    pub fn draw(&self, sections: &[u32], batch: &mut DrawBatch) {
        for _section in sections {
            // north and south edges
            for side in 0..2 {
                let z = if side == 0 { -50.0 } else { 50.0 };
                for ix in -50i32..=50 {
                    let x = ix as f32;
                    self.post(batch, Vec3::new(x, 0.0, z));
                    if ix != 50 {
                        for y in [0.2f32, 0.5, 0.8] {
                            batch.solid_cube(
                                Mat4::from_translation(Vec3::new(x + 0.5, y, z))
                                    * Mat4::from_scale(Vec3::new(1.0, 0.1, 0.05)),
                                1.0,
                                Self::BROWN,
                            );
                        }
                    }
                }
            }

            // east and west edges
            for side in 0..2 {
                let x = if side == 0 { -50.0 } else { 50.0 };
                for iz in -50i32..=50 {
                    let z = iz as f32;
                    self.post(batch, Vec3::new(x, 0.0, z));
                    if iz != 50 {
                        for y in [0.2f32, 0.5, 0.8] {
                            batch.solid_cube(
                                Mat4::from_translation(Vec3::new(x, y, z + 0.5))
                                    * Mat4::from_scale(Vec3::new(0.05, 0.1, 1.0)),
                                1.0,
                                Self::BROWN,
                            );
                        }
                    }
                }
            }
        }
    }

    fn post(&self, batch: &mut DrawBatch, at: Vec3) {
        // Stand the cylinder upright: its axis is +z before the rotation.
        batch.solid_cylinder(
            Mat4::from_translation(at) * Mat4::from_rotation_x((-90.0f32).to_radians()),
            0.1,
            0.1,
            1.0,
            20,
            Self::BROWN,
        );
    }
}

impl Default for Fence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_emits_one_quad_per_cell() {
        let mut batch = DrawBatch::new();
        Ground::new().draw(&mut batch);
        assert_eq!(batch.vertices.len(), 100 * 100 * 4);
        assert_eq!(batch.indices.len(), 100 * 100 * 6);
    }

    #[test]
    fn lake_footprint_matches_the_exclusion_zone() {
        let lake = Lake::new();
        assert_eq!(
            (lake.end_x, lake.start_x, lake.end_z, lake.start_z),
            (-50.0, 0.0, 0.0, 50.0)
        );
    }

    #[test]
    fn lake_border_is_a_closed_loop() {
        let mut batch = DrawBatch::new();
        Lake::new().draw_border(&mut batch);
        assert_eq!(batch.line_vertices.len(), 8);
    }
}
