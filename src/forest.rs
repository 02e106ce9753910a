// Trees and forest placement for Meadow-3D

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::draw::DrawBatch;

/// A tree drawn by recursive branching: each branch is a tapering cylinder
/// that forks into three children until the depth runs out, where a leaf
/// sphere is drawn instead.
pub struct Tree;

impl Tree {
    const DEPTH: u32 = 3;
    const BRANCH_COLOR: [f32; 4] = [0.65, 0.16, 0.16, 1.0];
    const LEAF_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];

    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, m: Mat4, batch: &mut DrawBatch) {
        // Branches grow along +z, so tip the trunk upright first.
        self.draw_branch(
            m * Mat4::from_rotation_x((-90.0f32).to_radians()),
            Self::DEPTH,
            batch,
        );
    }

    fn draw_branch(&self, m: Mat4, depth: u32, batch: &mut DrawBatch) {
        if depth == 0 {
            batch.solid_sphere(m, 0.2, 10, 10, Self::LEAF_COLOR);
            return;
        }

        batch.solid_cylinder(m, 0.1, 0.08, 0.5, 10, Self::BRANCH_COLOR);
        let tip = m * Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5));

        for i in 0..3i32 {
            let child = tip
                * Mat4::from_rotation_y((60.0 * (i - 1) as f32).to_radians())
                * Mat4::from_rotation_x(30.0f32.to_radians());
            self.draw_branch(child, depth - 1, batch);
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// A handful of trees scattered over a small patch; positions are drawn
/// fresh from the thread RNG at construction, so every run looks a little
/// different.
pub struct Forest {
    trees: Vec<Tree>,
    placements: Vec<Vec3>,
}

impl Forest {
    pub fn new(num_trees: usize) -> Self {
        let mut rng = rand::thread_rng();
        let mut trees = Vec::with_capacity(num_trees);
        let mut placements = Vec::with_capacity(num_trees);

        for _ in 0..num_trees {
            trees.push(Tree::new());
            placements.push(Vec3::new(
                (3 + rng.gen_range(0..5)) as f32,
                0.0,
                (-6 + rng.gen_range(0..5)) as f32,
            ));
        }

        Self { trees, placements }
    }

    pub fn placements(&self) -> &[Vec3] {
        &self.placements
    }

    pub fn draw(&self, batch: &mut DrawBatch) {
        for (tree, placement) in self.trees.iter().zip(&self.placements) {
            tree.draw(Mat4::from_translation(*placement), batch);
        }
    }
}

impl Default for Forest {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forest_places_the_requested_number_of_trees() {
        let forest = Forest::new(5);
        assert_eq!(forest.placements().len(), 5);
    }

    #[test]
    fn placements_stay_inside_the_patch() {
        for _ in 0..20 {
            let forest = Forest::new(5);
            for p in forest.placements() {
                assert!((3.0..8.0).contains(&p.x), "x out of range: {}", p.x);
                assert_eq!(p.y, 0.0);
                assert!((-6.0..-1.0).contains(&p.z), "z out of range: {}", p.z);
            }
        }
    }

    #[test]
    fn deeper_branches_mean_more_geometry() {
        let mut shallow = DrawBatch::new();
        let mut full = DrawBatch::new();
        let tree = Tree::new();
        tree.draw_branch(Mat4::IDENTITY, 1, &mut shallow);
        tree.draw(Mat4::IDENTITY, &mut full);
        assert!(full.vertices.len() > shallow.vertices.len());
    }
}
