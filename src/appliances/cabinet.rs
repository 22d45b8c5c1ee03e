use super::{palette, FrameUpdate};
use crate::animation::{is_closed, Motion, Transition};
use crate::easing::Easing;
use crate::mesh::Primitive;
use crate::scene_graph::{Material, SceneGraph, Transform3D};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

pub const LEFT_OPEN_ANGLE: f32 = FRAC_PI_2;
pub const RIGHT_OPEN_ANGLE: f32 = -FRAC_PI_2;
pub const DOOR_DURATION_MS: f64 = 500.0;

const DOOR_MOTION: Motion = Motion::eased(DOOR_DURATION_MS, Easing::EaseOutCubic);

/// Base cabinet with a pair of doors that always move together.
#[derive(Debug, Clone)]
pub struct Cabinet {
    left: Transition,
    right: Transition,
}

impl Cabinet {
    pub fn new() -> Self {
        Self { left: Transition::new(0.0), right: Transition::new(0.0) }
    }

    pub fn open_doors(&mut self, now_ms: f64) -> bool {
        self.swing(LEFT_OPEN_ANGLE, RIGHT_OPEN_ANGLE, now_ms)
    }

    pub fn close_doors(&mut self, now_ms: f64) -> bool {
        self.swing(0.0, 0.0, now_ms)
    }

    pub fn toggle_doors(&mut self, now_ms: f64) -> bool {
        if is_closed(self.left.value()) {
            self.open_doors(now_ms)
        } else {
            self.close_doors(now_ms)
        }
    }

    fn swing(&mut self, left: f32, right: f32, now_ms: f64) -> bool {
        if self.is_animating() {
            return false;
        }
        self.left.begin(left, DOOR_MOTION, now_ms);
        self.right.begin(right, DOOR_MOTION, now_ms);
        true
    }

    pub fn is_animating(&self) -> bool {
        self.left.is_animating() || self.right.is_animating()
    }

    pub fn left_angle(&self) -> f32 {
        self.left.value()
    }

    pub fn right_angle(&self) -> f32 {
        self.right.value()
    }
}

impl Default for Cabinet {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameUpdate for Cabinet {
    fn update(&mut self, frame: &FrameTime) {
        self.left.tick(frame.now_ms);
        self.right.tick(frame.now_ms);
    }
}

/// Scene nodes of the cabinet.
#[derive(Debug, Clone, Copy)]
pub struct CabinetModel {
    pub root: Entity,
    pub left_door: Entity,
    pub right_door: Entity,
}

impl CabinetModel {
    pub fn build(scene: &mut SceneGraph, position: Vec3) -> Self {
        let root = scene.spawn_group(None, Transform3D::from_translation(position));
        let wood = palette::wood();

        scene.spawn_mesh(Some(root), Primitive::cuboid(2.0, 1.0, 1.0), wood, Transform3D::at(0.0, 0.5, -1.5));
        scene.spawn_mesh(Some(root), Primitive::cuboid(2.1, 0.05, 1.1), palette::marble(), Transform3D::at(0.0, 1.025, -1.5));
        scene.spawn_mesh(
            Some(root),
            Primitive::cuboid(1.9, 0.02, 0.9),
            Material::standard(0xdddddd, 0.5, 0.1),
            Transform3D::at(0.0, 0.5, -1.5),
        );

        // Stacked plates and a glass on the shelf.
        let plate = Material::standard(0xffffff, 0.2, 0.0);
        for i in 0..5 {
            scene.spawn_mesh(
                Some(root),
                Primitive::cylinder(0.1, 0.1, 0.01, 32),
                plate,
                Transform3D::at(0.3, 0.515 + i as f32 * 0.02, -1.5),
            );
        }
        scene.spawn_mesh(
            Some(root),
            Primitive::cylinder(0.05, 0.04, 0.12, 16),
            Material::glass(0xffffff, 0.3),
            Transform3D::at(-0.3, 0.57, -1.5),
        );

        let left_door = Self::build_door(scene, root, -1.0);
        let right_door = Self::build_door(scene, root, 1.0);
        Self { root, left_door, right_door }
    }

    /// `side` is -1 for the left door and +1 for the right one; both hinge at the centre line.
    fn build_door(scene: &mut SceneGraph, root: Entity, side: f32) -> Entity {
        let pivot = scene.spawn_group(Some(root), Transform3D::at(0.02 * side, 0.5, -1.0));
        let panel = scene.spawn_mesh(
            Some(pivot),
            Primitive::cuboid(0.98, 0.98, 0.04),
            palette::wood(),
            Transform3D::at(0.49 * side, 0.0, 0.02),
        );
        scene.spawn_mesh(
            Some(panel),
            Primitive::cylinder(0.02, 0.02, 0.15, 16),
            palette::chrome(),
            Transform3D::at(0.4 * side, 0.0, 0.04).with_euler(FRAC_PI_2, 0.0, 0.0),
        );
        pivot
    }

    pub fn apply(&self, cabinet: &Cabinet, scene: &mut SceneGraph) {
        scene.set_rotation(self.left_door, Quat::from_rotation_y(cabinet.left_angle()));
        scene.set_rotation(self.right_door, Quat::from_rotation_y(cabinet.right_angle()));
    }
}
