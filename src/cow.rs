// The cow actor for Meadow-3D
//
// Owns the cow's pose (position + heading), the user-adjustable head and
// tail angles, and the per-frame animation phases. Movement is validated
// against the lake and farmhouse exclusion zones before it is committed.

use glam::{Mat4, Quat, Vec3};

use crate::draw::DrawBatch;
use crate::math::{Oscillator, Transform};

// Body parts are modelled at roughly triple size and scaled down uniformly.
const SCALE: f32 = 0.3;

/// Degrees of heading change per rotate key.
pub const TURN_STEP: f32 = 7.0;
/// Units travelled along the local forward axis per move key.
pub const WALK_STEP: f32 = 0.2;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const PINK: [f32; 4] = [1.0, 0.75, 0.8, 1.0];

/// One queued movement command, consumed once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingMove {
    #[default]
    Idle,
    RotateLeft,
    RotateRight,
    Forward,
    Backward,
}

pub struct Cow {
    pub position: Vec3,
    /// Heading around the y axis, degrees.
    pub yaw: f32,
    pub head_horizontal_angle: f32,
    pub head_vertical_angle: f32,
    pub tail_horizontal_angle: f32,
    pub tail_vertical_angle: f32,
    pub pending_move: PendingMove,
    pub is_moving: bool,
    tail_wiggle: Oscillator,
    legs: Oscillator,
}

impl Cow {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(2.8, 3.5 * SCALE, -0.5),
            yaw: -90.0,
            head_horizontal_angle: 0.0,
            head_vertical_angle: 10.0,
            tail_horizontal_angle: 0.0,
            tail_vertical_angle: -10.0,
            pending_move: PendingMove::Idle,
            is_moving: false,
            tail_wiggle: Oscillator::new(0.3, 8.0),
            legs: Oscillator::new(6.0, 20.0),
        }
    }

    /// World transform of the cow's body.
    pub fn pose(&self) -> Mat4 {
        Transform::new(
            self.position,
            Quat::from_rotation_y(self.yaw.to_radians()),
            Vec3::ONE,
        )
        .matrix()
    }

    /// Unit vector the cow walks along, the local +z axis.
    pub fn heading(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw.to_radians()) * Vec3::Z
    }

    /// Teleport-style relocation, rejected inside the exclusion zones.
    ///
    /// The lake bounds here read `x > 0 && x < -50`, which no x satisfies,
    /// so that guard never rejects; the effective lake check is the
    /// rectangular one in [`Cow::step`]. A test pins this behavior so any
    /// change to the bounds is a deliberate one.
    pub fn update_position(&mut self, new_x: f32, new_y: f32, new_z: f32) {
        if new_x > 0.0 && new_x < -50.0 && new_z > 0.0 && new_z < 50.0 {
            log::warn!("cannot move into the lake!");
            return;
        }

        if new_x > 5.0
            && new_x < 10.0
            && new_y > 2.3
            && new_y < 7.3
            && new_z > -10.0
            && new_z < -5.0
        {
            log::warn!("cannot move into the farmhouse!");
            return;
        }

        self.position = Vec3::new(new_x, new_y, new_z);
        self.is_moving = true;
    }

    /// Consume the queued move, validate the resulting position, and commit
    /// it if it stays clear of the farmhouse and the lake. A rejected move
    /// leaves the pose untouched.
    pub fn step(&mut self) {
        let next = std::mem::take(&mut self.pending_move);
        let (yaw, position) = match next {
            PendingMove::Idle => return,
            PendingMove::RotateLeft => (self.yaw + TURN_STEP, self.position),
            PendingMove::RotateRight => (self.yaw - TURN_STEP, self.position),
            PendingMove::Forward => (self.yaw, self.position + self.heading() * WALK_STEP),
            PendingMove::Backward => (self.yaw, self.position - self.heading() * WALK_STEP),
        };

        if collides(position.x, position.z) {
            log::warn!(
                "movement to ({:.2}, {:.2}) rejected, obstacle in the way",
                position.x,
                position.z
            );
            return;
        }

        self.yaw = yaw;
        self.position = position;
        self.is_moving = true;
    }

    // Tail wiggles every frame; legs swing only on frames that follow an
    // accepted move, and the moving flag is consumed here.
    fn update_constant_movement(&mut self) {
        self.tail_wiggle.advance();
        if self.is_moving {
            self.legs.advance();
            self.is_moving = false;
        }
    }

    /// Render the cow and advance its animation phases for this frame.
    pub fn draw(&mut self, batch: &mut DrawBatch) {
        self.update_constant_movement();

        let m = self.pose();
        let legs_angle = self.legs.value().to_radians();

        // torso
        batch.solid_sphere(
            m * Mat4::from_scale(Vec3::new(2.0 * SCALE, 2.0 * SCALE, 4.0 * SCALE)),
            1.0,
            30,
            30,
            WHITE,
        );

        // legs, diagonal pairs swinging in opposite phase
        let leg_offsets = [
            (legs_angle, Vec3::new(-SCALE, -2.5 * SCALE, -2.0 * SCALE)),
            (-legs_angle, Vec3::new(SCALE, -2.5 * SCALE, -2.0 * SCALE)),
            (legs_angle, Vec3::new(SCALE, -2.5 * SCALE, 2.0 * SCALE)),
            (-legs_angle, Vec3::new(-SCALE, -2.5 * SCALE, 2.0 * SCALE)),
        ];
        for (swing, offset) in leg_offsets {
            batch.solid_sphere(
                m * Mat4::from_rotation_x(swing)
                    * Mat4::from_translation(offset)
                    * Mat4::from_scale(Vec3::new(0.5 * SCALE, 2.0 * SCALE, 0.5 * SCALE)),
                1.0,
                30,
                30,
                BLACK,
            );
        }

        // tail, hanging off the back with the wiggle phase on top of the
        // user-set angles
        let tail = m
            * Mat4::from_translation(Vec3::new(0.0, 0.0, -3.8 * SCALE))
            * Mat4::from_rotation_x((-30.0f32).to_radians())
            * Mat4::from_rotation_x(self.tail_vertical_angle.to_radians())
            * Mat4::from_rotation_y(self.tail_horizontal_angle.to_radians())
            * Mat4::from_rotation_y(self.tail_wiggle.value().to_radians());
        batch.solid_sphere(
            tail * Mat4::from_scale(Vec3::new(0.3 * SCALE, 0.3 * SCALE, 2.5 * SCALE)),
            1.0,
            30,
            30,
            WHITE,
        );
        // black ball at the tail's end
        batch.solid_sphere(
            tail * Mat4::from_translation(Vec3::new(0.0, 0.0, -2.5 * SCALE)),
            0.2,
            30,
            30,
            BLACK,
        );

        // head group follows the adjustable head angles
        let head = m
            * Mat4::from_rotation_x(self.head_vertical_angle.to_radians())
            * Mat4::from_rotation_y(self.head_horizontal_angle.to_radians());

        batch.solid_sphere(
            head * Mat4::from_translation(Vec3::new(0.0, 2.5 * SCALE, 3.0 * SCALE))
                * Mat4::from_scale(Vec3::new(2.0 * SCALE, 1.5 * SCALE, 2.0 * SCALE)),
            1.0,
            30,
            30,
            WHITE,
        );

        // nose
        batch.solid_sphere(
            head * Mat4::from_translation(Vec3::new(0.0, 2.0 * SCALE, 4.0 * SCALE))
                * Mat4::from_scale(Vec3::new(SCALE, 0.7 * SCALE, 2.0 * SCALE)),
            1.0,
            30,
            30,
            PINK,
        );

        // ears
        for side in [-1.0f32, 1.0] {
            batch.solid_sphere(
                head * Mat4::from_translation(Vec3::new(side * 1.2 * SCALE, 3.0 * SCALE, 2.6 * SCALE))
                    * Mat4::from_scale(Vec3::new(0.7 * SCALE, 0.5 * SCALE, 0.7 * SCALE)),
                1.0,
                30,
                30,
                BLACK,
            );
        }

        // eyes
        for side in [-1.0f32, 1.0] {
            batch.solid_cube(
                head * Mat4::from_translation(Vec3::new(side * 1.5 * SCALE, 3.0 * SCALE, 4.4 * SCALE))
                    * Mat4::from_scale(Vec3::splat(0.25 * SCALE)),
                1.0,
                BLACK,
            );
        }
    }
}

impl Default for Cow {
    fn default() -> Self {
        Self::new()
    }
}

/// Collision predicate used when stepping: a radial test around the
/// farmhouse anchor plus the rectangular lake region.
pub fn collides(x: f32, z: f32) -> bool {
    const FARMHOUSE_X: f32 = 5.0;
    const FARMHOUSE_Z: f32 = -10.0;
    const FARMHOUSE_RADIUS: f32 = 5.0;

    let dx = x - FARMHOUSE_X;
    let dz = z - FARMHOUSE_Z;
    if (dx * dx + dz * dz).sqrt() < FARMHOUSE_RADIUS {
        return true;
    }

    // Lake spans x in (-50, 0), z in (0, 50).
    x > -50.0 && x < 0.0 && z > 0.0 && z < 50.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn update_position_rejects_farmhouse_interior() {
        let mut cow = Cow::new();
        let before = cow.position;
        cow.update_position(7.0, 5.0, -7.0);
        assert_eq!(cow.position, before);
        assert!(!cow.is_moving);
    }

    #[test]
    fn update_position_accepts_open_ground() {
        let mut cow = Cow::new();
        cow.update_position(12.0, 1.05, 12.0);
        assert_eq!(cow.position, Vec3::new(12.0, 1.05, 12.0));
        assert!(cow.is_moving);
    }

    #[test]
    fn update_position_lake_guard_cannot_fire() {
        // The guard's x bounds (x > 0 and x < -50) exclude every x, so a
        // point in the middle of the lake is accepted here. Only the
        // per-step check keeps the cow out of the water.
        let mut cow = Cow::new();
        cow.update_position(-25.0, 1.05, 25.0);
        assert_eq!(cow.position, Vec3::new(-25.0, 1.05, 25.0));
        assert!(cow.is_moving);
    }

    #[test]
    fn step_rejects_a_walk_into_the_farmhouse_radius() {
        let mut cow = Cow::new();
        cow.position = Vec3::new(10.1, 1.05, -10.0);
        cow.yaw = -90.0; // heading towards -x
        cow.pending_move = PendingMove::Forward;
        cow.step();
        assert_relative_eq!(cow.position.x, 10.1);
        assert!(!cow.is_moving);
        assert_eq!(cow.pending_move, PendingMove::Idle);
    }

    #[test]
    fn step_rejects_a_walk_into_the_lake() {
        let mut cow = Cow::new();
        cow.position = Vec3::new(0.1, 1.05, 25.0);
        cow.yaw = -90.0;
        cow.pending_move = PendingMove::Forward;
        cow.step();
        assert_relative_eq!(cow.position.x, 0.1);
        assert!(!cow.is_moving);
    }

    #[test]
    fn step_commits_an_unobstructed_walk() {
        let mut cow = Cow::new();
        cow.position = Vec3::new(20.0, 1.05, 20.0);
        cow.yaw = 0.0; // heading along +z
        cow.pending_move = PendingMove::Forward;
        cow.step();
        assert_relative_eq!(cow.position.z, 20.0 + WALK_STEP);
        assert!(cow.is_moving);
    }

    #[test]
    fn rotation_changes_heading_and_counts_as_movement() {
        let mut cow = Cow::new();
        cow.pending_move = PendingMove::RotateLeft;
        cow.step();
        assert_relative_eq!(cow.yaw, -90.0 + TURN_STEP);
        assert!(cow.is_moving);
    }

    #[test]
    fn legs_swing_only_on_frames_after_an_accepted_move() {
        let mut cow = Cow::new();

        cow.update_constant_movement();
        assert_relative_eq!(cow.legs.value(), 0.0);

        cow.position = Vec3::new(20.0, 1.05, 20.0);
        cow.pending_move = PendingMove::Forward;
        cow.step();
        cow.update_constant_movement();
        assert_relative_eq!(cow.legs.value(), 6.0);
        assert!(!cow.is_moving, "moving flag is consumed by the tick");

        // No move this frame: the swing phase holds still.
        cow.update_constant_movement();
        assert_relative_eq!(cow.legs.value(), 6.0);
    }

    #[test]
    fn tail_wiggles_regardless_of_movement() {
        let mut cow = Cow::new();
        cow.update_constant_movement();
        assert_relative_eq!(cow.tail_wiggle.value(), 0.3);
    }

    #[test]
    fn collision_predicate_matches_both_zones() {
        assert!(collides(5.0, -10.0), "farmhouse anchor");
        assert!(collides(8.0, -8.0), "inside farmhouse radius");
        assert!(!collides(11.0, -10.0), "just outside farmhouse radius");
        assert!(collides(-25.0, 25.0), "middle of the lake");
        assert!(!collides(25.0, 25.0), "east of the lake");
    }
}
