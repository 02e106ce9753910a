// Immediate-mode draw batch for Meadow-3D
//
// Scene objects record solid primitives (spheres, cones, cylinders, cubes,
// quads, line segments) into a DrawBatch every frame. Vertices are
// transformed into world space on the CPU at record time, so the GPU side
// stays a single triangle-list draw plus a single line-list draw.

use glam::{Mat3, Mat4, Vec3};
use std::f32::consts::{PI, TAU};

// Vertex layout shared by the triangle and line pipelines.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

#[derive(Default)]
pub struct DrawBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub line_vertices: Vec<Vertex>,
}

impl DrawBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.line_vertices.clear();
    }

    /// Sphere of the given radius centered on the transform's origin.
    pub fn solid_sphere(&mut self, m: Mat4, radius: f32, slices: u32, stacks: u32, color: [f32; 4]) {
        self.lat_long_sphere(m, radius, slices, stacks, color, true);
    }

    /// Sphere with zeroed normals, rendered unlit by the shader. Used for
    /// the light-source markers.
    pub fn unlit_sphere(&mut self, m: Mat4, radius: f32, slices: u32, stacks: u32, color: [f32; 4]) {
        self.lat_long_sphere(m, radius, slices, stacks, color, false);
    }

    fn lat_long_sphere(
        &mut self,
        m: Mat4,
        radius: f32,
        slices: u32,
        stacks: u32,
        color: [f32; 4],
        lit: bool,
    ) {
        let normal_m = normal_matrix(m);
        let base = self.vertices.len() as u32;

        for stack in 0..=stacks {
            let phi = -PI / 2.0 + PI * stack as f32 / stacks as f32;
            let (sp, cp) = phi.sin_cos();
            for slice in 0..=slices {
                let theta = TAU * slice as f32 / slices as f32;
                let (st, ct) = theta.sin_cos();
                let n = Vec3::new(cp * ct, sp, cp * st);
                self.vertices.push(vertex(
                    m.transform_point3(n * radius),
                    if lit { (normal_m * n).normalize() } else { Vec3::ZERO },
                    color,
                ));
            }
        }

        let ring = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let i0 = base + stack * ring + slice;
                let i1 = i0 + 1;
                let i2 = i0 + ring;
                let i3 = i2 + 1;
                self.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
    }

    /// Tapering cylinder along +z from 0 to `height`, base radius at z = 0.
    /// Capped at both ends; with `top` = 0 this degenerates into a cone tip.
    pub fn solid_cylinder(
        &mut self,
        m: Mat4,
        base: f32,
        top: f32,
        height: f32,
        slices: u32,
        color: [f32; 4],
    ) {
        let normal_m = normal_matrix(m);
        let first = self.vertices.len() as u32;

        // Side surface: slope of the taper tilts the normal along z.
        let slope = (base - top) / height;
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let (st, ct) = theta.sin_cos();
            let n = (normal_m * Vec3::new(ct, st, slope)).normalize();
            self.vertices.push(vertex(
                m.transform_point3(Vec3::new(ct * base, st * base, 0.0)),
                n,
                color,
            ));
            self.vertices.push(vertex(
                m.transform_point3(Vec3::new(ct * top, st * top, height)),
                n,
                color,
            ));
        }
        for slice in 0..slices {
            let i0 = first + slice * 2;
            self.indices
                .extend_from_slice(&[i0, i0 + 2, i0 + 1, i0 + 1, i0 + 2, i0 + 3]);
        }

        self.disc(m, base, 0.0, slices, Vec3::new(0.0, 0.0, -1.0), color);
        if top > 0.0 {
            self.disc(m, top, height, slices, Vec3::new(0.0, 0.0, 1.0), color);
        }
    }

    /// Cone along +z, a capped cylinder with a zero-radius top ring.
    pub fn solid_cone(&mut self, m: Mat4, base: f32, height: f32, slices: u32, color: [f32; 4]) {
        self.solid_cylinder(m, base, 0.0, height, slices, color);
    }

    fn disc(&mut self, m: Mat4, radius: f32, z: f32, slices: u32, normal: Vec3, color: [f32; 4]) {
        let n = (normal_matrix(m) * normal).normalize();
        let center = self.vertices.len() as u32;
        self.vertices
            .push(vertex(m.transform_point3(Vec3::new(0.0, 0.0, z)), n, color));
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let (st, ct) = theta.sin_cos();
            self.vertices.push(vertex(
                m.transform_point3(Vec3::new(ct * radius, st * radius, z)),
                n,
                color,
            ));
        }
        for slice in 0..slices {
            let i = center + 1 + slice;
            if normal.z < 0.0 {
                self.indices.extend_from_slice(&[center, i, i + 1]);
            } else {
                self.indices.extend_from_slice(&[center, i + 1, i]);
            }
        }
    }

    /// Axis-aligned cube of the given edge length centered on the
    /// transform's origin.
    pub fn solid_cube(&mut self, m: Mat4, size: f32, color: [f32; 4]) {
        let h = size / 2.0;
        let faces: [(Vec3, [Vec3; 4]); 6] = [
            // front
            (
                Vec3::Z,
                [
                    Vec3::new(-h, -h, h),
                    Vec3::new(h, -h, h),
                    Vec3::new(h, h, h),
                    Vec3::new(-h, h, h),
                ],
            ),
            // back
            (
                Vec3::NEG_Z,
                [
                    Vec3::new(-h, -h, -h),
                    Vec3::new(-h, h, -h),
                    Vec3::new(h, h, -h),
                    Vec3::new(h, -h, -h),
                ],
            ),
            // top
            (
                Vec3::Y,
                [
                    Vec3::new(-h, h, -h),
                    Vec3::new(-h, h, h),
                    Vec3::new(h, h, h),
                    Vec3::new(h, h, -h),
                ],
            ),
            // bottom
            (
                Vec3::NEG_Y,
                [
                    Vec3::new(-h, -h, -h),
                    Vec3::new(h, -h, -h),
                    Vec3::new(h, -h, h),
                    Vec3::new(-h, -h, h),
                ],
            ),
            // right
            (
                Vec3::X,
                [
                    Vec3::new(h, -h, -h),
                    Vec3::new(h, h, -h),
                    Vec3::new(h, h, h),
                    Vec3::new(h, -h, h),
                ],
            ),
            // left
            (
                Vec3::NEG_X,
                [
                    Vec3::new(-h, -h, -h),
                    Vec3::new(-h, -h, h),
                    Vec3::new(-h, h, h),
                    Vec3::new(-h, h, -h),
                ],
            ),
        ];

        for (normal, corners) in faces {
            self.quad(m, corners, normal, color);
        }
    }

    /// A single quad with a uniform normal, corners wound counter-clockwise.
    pub fn quad(&mut self, m: Mat4, corners: [Vec3; 4], normal: Vec3, color: [f32; 4]) {
        let n = (normal_matrix(m) * normal).normalize();
        let base = self.vertices.len() as u32;
        for corner in corners {
            self.vertices
                .push(vertex(m.transform_point3(corner), n, color));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// A line segment, lit with an upward-facing normal.
    pub fn line(&mut self, m: Mat4, a: Vec3, b: Vec3, color: [f32; 4]) {
        let n = (normal_matrix(m) * Vec3::Y).normalize();
        self.line_vertices
            .push(vertex(m.transform_point3(a), n, color));
        self.line_vertices
            .push(vertex(m.transform_point3(b), n, color));
    }
}

fn vertex(position: Vec3, normal: Vec3, color: [f32; 4]) -> Vertex {
    Vertex {
        position: position.to_array(),
        normal: normal.to_array(),
        color,
    }
}

// Inverse-transpose of the upper 3x3, so normals survive non-uniform scaling.
fn normal_matrix(m: Mat4) -> Mat3 {
    Mat3::from_mat4(m.inverse().transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mut batch = DrawBatch::new();
        batch.solid_sphere(Mat4::IDENTITY, 2.0, 8, 8, [1.0; 4]);
        for v in &batch.vertices {
            let p = Vec3::from(v.position);
            assert_relative_eq!(p.length(), 2.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn nonuniform_scale_keeps_normals_unit_length() {
        let mut batch = DrawBatch::new();
        let squash = Mat4::from_scale(Vec3::new(2.0, 0.3, 4.0));
        batch.solid_sphere(squash, 1.0, 8, 8, [1.0; 4]);
        for v in &batch.vertices {
            let n = Vec3::from(v.normal);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn clear_resets_all_streams() {
        let mut batch = DrawBatch::new();
        batch.solid_cube(Mat4::IDENTITY, 1.0, [1.0; 4]);
        batch.line(Mat4::IDENTITY, Vec3::ZERO, Vec3::Y, [1.0; 4]);
        batch.clear();
        assert!(batch.vertices.is_empty());
        assert!(batch.indices.is_empty());
        assert!(batch.line_vertices.is_empty());
    }
}
