// Scene module for Meadow-3D

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::cow::Cow;
use crate::draw::DrawBatch;
use crate::forest::Forest;
use crate::lights::{PointLight, SpotLight};
use crate::scenery::{Farmhouse, Fence, Ground, Lake};
use crate::wheat::Wheat;

/// Which viewpoint the scene is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The external orbiting camera.
    Above,
    /// First-person view locked to the cow's head.
    CowEye,
}

/// Everything in the scene, owned by value and passed by reference into the
/// frame update, the input handlers, and the control panel.
pub struct SceneState {
    pub view_mode: ViewMode,
    pub global_ambient: f32,
    pub camera: Camera,
    pub cow: Cow,
    pub pointlight: PointLight,
    pub spotlight: SpotLight,
    pub ground: Ground,
    pub lake: Lake,
    pub farmhouse: Farmhouse,
    pub fence: Fence,
    pub forest: Forest,
    pub wheat_field: Vec<Wheat>,
}

impl SceneState {
    pub fn new() -> Self {
        let mut wheat_field = Vec::new();
        Wheat::create_field(&mut wheat_field);

        Self {
            view_mode: ViewMode::Above,
            global_ambient: 0.3,
            camera: Camera::default(),
            cow: Cow::new(),
            pointlight: PointLight::new(),
            spotlight: SpotLight::new(),
            ground: Ground::new(),
            lake: Lake::new(),
            farmhouse: Farmhouse::new(),
            fence: Fence::new(),
            forest: Forest::new(3),
            wheat_field,
        }
    }

    /// Per-frame state advancement: sweep the point light by the elapsed
    /// time and consume the cow's queued move.
    pub fn update(&mut self, delta_time: f32) {
        self.pointlight.update(delta_time);
        self.cow.step();
    }

    /// View matrix for the active mode.
    pub fn view_matrix(&self) -> Mat4 {
        match self.view_mode {
            ViewMode::Above => self.camera.view_matrix(),
            ViewMode::CowEye => self.cow_eye_view(),
        }
    }

    // First-person view: place a virtual eye on the cow's head by stacking
    // the head angles and a fixed forward/up offset on the body pose, then
    // derive yaw and pitch from the resulting matrix and synthesize a
    // look-at direction from them.
    fn cow_eye_view(&self) -> Mat4 {
        let m = self.cow.pose()
            * Mat4::from_rotation_x(self.cow.head_vertical_angle.to_radians())
            * Mat4::from_rotation_y(self.cow.head_horizontal_angle.to_radians())
            * Mat4::from_translation(Vec3::new(0.0, 0.75, 0.9));

        let z_angle = (-m.x_axis.z).atan2(m.x_axis.x);
        let y_angle = (-m.z_axis.y).atan2(m.y_axis.y);
        let eye = m.w_axis.truncate();

        let center = Vec3::new(
            eye.x + z_angle.sin(),
            eye.y - y_angle,
            eye.z + z_angle.cos(),
        );
        Mat4::look_at_rh(eye, center, Vec3::Y)
    }

    /// Record the whole scene into the batch in a fixed order: light
    /// markers first, then terrain, structures, the cow, and finally the
    /// field overlays.
    pub fn draw(&mut self, batch: &mut DrawBatch) {
        self.spotlight.draw(batch);
        self.pointlight.draw(batch);
        self.ground.draw(batch);
        self.forest.draw(batch);
        self.farmhouse.draw(batch);
        self.lake.draw(batch);
        for wheat in &self.wheat_field {
            wheat.draw(batch);
        }
        self.cow.draw(batch);
        self.fence.draw(&[0, 1], batch);
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cow::PendingMove;
    use approx::assert_relative_eq;

    #[test]
    fn update_consumes_the_pending_move() {
        let mut scene = SceneState::new();
        scene.cow.position = Vec3::new(20.0, 1.05, 20.0);
        scene.cow.pending_move = PendingMove::Forward;
        scene.update(0.016);
        assert_eq!(scene.cow.pending_move, PendingMove::Idle);
        assert!(scene.cow.is_moving);
    }

    #[test]
    fn update_accumulates_light_time() {
        let mut scene = SceneState::new();
        scene.update(0.5);
        scene.update(0.5);
        assert_relative_eq!(scene.pointlight.time, 1.0);
    }

    #[test]
    fn view_modes_produce_distinct_views() {
        let mut scene = SceneState::new();
        let above = scene.view_matrix();
        scene.view_mode = ViewMode::CowEye;
        let eye = scene.view_matrix();
        assert!(above
            .to_cols_array()
            .iter()
            .zip(eye.to_cols_array().iter())
            .any(|(a, b)| (a - b).abs() > 1e-3));
    }

    #[test]
    fn cow_eye_view_is_well_formed() {
        let mut scene = SceneState::new();
        scene.view_mode = ViewMode::CowEye;
        for v in scene.view_matrix().to_cols_array() {
            assert!(v.is_finite());
        }
    }

    #[test]
    fn scene_records_all_object_groups() {
        let mut scene = SceneState::new();
        let mut batch = crate::draw::DrawBatch::new();
        scene.draw(&mut batch);
        assert!(!batch.vertices.is_empty());
        // 5000 wheat stalks plus the lake border
        assert_eq!(batch.line_vertices.len(), 5000 * 2 + 8);
    }
}
