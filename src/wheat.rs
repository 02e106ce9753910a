// Wheat field for Meadow-3D

use glam::{Mat4, Vec3};

use crate::draw::DrawBatch;

const STALK_HEIGHT: f32 = 0.5;
const GOLD: [f32; 4] = [0.9, 0.7, 0.1, 1.0];

/// A single stalk of wheat, rendered as a short vertical line segment.
pub struct Wheat {
    position: Vec3,
}

impl Wheat {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn draw(&self, batch: &mut DrawBatch) {
        batch.line(
            Mat4::from_translation(self.position),
            Vec3::ZERO,
            Vec3::new(0.0, STALK_HEIGHT, 0.0),
            GOLD,
        );
    }

    /// Fill `field` with the 50×50 mirrored grid: every (i, j) cell gets a
    /// stalk at (i, 0, j) and its mirror at (−i, 0, −j).
    pub fn create_field(field: &mut Vec<Wheat>) {
        for i in 0..50 {
            for j in 0..50 {
                field.push(Wheat::new(i as f32, 0.0, j as f32));
                field.push(Wheat::new(-(i as f32), 0.0, -(j as f32)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_holds_exactly_five_thousand_stalks() {
        let mut field = Vec::new();
        Wheat::create_field(&mut field);
        assert_eq!(field.len(), 50 * 50 * 2);
    }

    #[test]
    fn stalks_come_in_mirrored_pairs_on_the_grid() {
        let mut field = Vec::new();
        Wheat::create_field(&mut field);
        for pair in field.chunks(2) {
            let a = pair[0].position();
            let b = pair[1].position();
            assert_eq!(a.y, 0.0);
            assert_eq!(b, Vec3::new(-a.x, 0.0, -a.z));
            assert_eq!(a.x.fract(), 0.0);
            assert_eq!(a.z.fract(), 0.0);
            assert!((0.0..50.0).contains(&a.x));
            assert!((0.0..50.0).contains(&a.z));
        }
    }
}
