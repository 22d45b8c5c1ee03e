use super::{palette, FrameUpdate};
use crate::animation::{Motion, Transition};
use crate::mesh::Primitive;
use crate::scene_graph::{Material, PointLight, SceneGraph, Transform3D};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

pub const DOOR_OPEN_ANGLE: f32 = FRAC_PI_2;
/// Radians the clicked door moves per frame.
pub const DOOR_STEP: f32 = 0.1;

/// Refrigerator door and interior light.
///
/// Two ways in: the scripted `open_door` / `close_door` pair is instant, while
/// `handle_click` steps the door a fixed amount each frame and only updates the
/// open latch and the light once the door has arrived.
#[derive(Debug, Clone)]
pub struct Refrigerator {
    door: Transition,
    light_intensity: f32,
    is_open: bool,
}

impl Refrigerator {
    pub fn new() -> Self {
        Self { door: Transition::new(0.0), light_intensity: 0.0, is_open: false }
    }

    pub fn open_door(&mut self) {
        self.door.snap(DOOR_OPEN_ANGLE);
        self.light_intensity = 1.0;
        self.is_open = true;
    }

    pub fn close_door(&mut self) {
        self.door.snap(0.0);
        self.light_intensity = 0.0;
        self.is_open = false;
    }

    /// Instant toggle keyed on the exact closed angle.
    pub fn toggle_door_instant(&mut self) {
        if self.door.value() == 0.0 {
            self.open_door();
        } else {
            self.close_door();
        }
    }

    /// Click on the refrigerator. Returns `false` while the door is still moving.
    pub fn handle_click(&mut self, now_ms: f64) -> bool {
        let target = if self.is_open { 0.0 } else { DOOR_OPEN_ANGLE };
        self.door.begin(target, Motion::stepped(DOOR_STEP), now_ms)
    }

    /// Keyboard swing using the eased door helper.
    pub fn swing_door(&mut self, now_ms: f64) -> bool {
        self.door.swing_door(!self.is_open, now_ms)
    }

    pub fn door_angle(&self) -> f32 {
        self.door.value()
    }

    pub fn light_intensity(&self) -> f32 {
        self.light_intensity
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_animating(&self) -> bool {
        self.door.is_animating()
    }
}

impl Default for Refrigerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameUpdate for Refrigerator {
    fn update(&mut self, frame: &FrameTime) {
        if self.door.tick(frame.now_ms).completed() {
            self.is_open = self.door.value() > 0.0;
            self.light_intensity = if self.is_open { 1.0 } else { 0.0 };
        }
    }
}

/// Scene nodes of the refrigerator.
#[derive(Debug, Clone, Copy)]
pub struct RefrigeratorModel {
    pub root: Entity,
    pub door_pivot: Entity,
    pub light: Entity,
}

impl RefrigeratorModel {
    pub fn build(scene: &mut SceneGraph, position: Vec3) -> Self {
        let root = scene.spawn_group(None, Transform3D::from_translation(position));
        let body = palette::white_enamel();

        scene.spawn_mesh(Some(root), Primitive::cuboid(1.0, 2.0, 1.0), body, Transform3D::default());
        scene.spawn_mesh(
            Some(root),
            Primitive::cuboid(0.9, 1.9, 0.9),
            Material::standard(0xffffff, 0.1, 0.0),
            Transform3D::default(),
        );
        let shelf = Material::glass(0xffffff, 0.7);
        for i in 0..3 {
            scene.spawn_mesh(
                Some(root),
                Primitive::cuboid(0.85, 0.05, 0.85),
                shelf,
                Transform3D::at(0.0, -0.5 + i as f32 * 0.5, 0.0),
            );
        }
        let light = scene.spawn_point_light(Some(root), PointLight::new(0xffffdd, 0.0, 1.0), Vec3::new(0.0, 0.0, 0.3));

        // Food on the lower shelves.
        scene.spawn_mesh(
            Some(root),
            Primitive::cuboid(0.15, 0.3, 0.15),
            Material::standard(0xffffff, 0.2, 0.0),
            Transform3D::at(0.25, -0.7, 0.2),
        );
        scene.spawn_mesh(
            Some(root),
            Primitive::sphere(0.08, 16, 16),
            Material::standard(0x2aad27, 0.8, 0.0),
            Transform3D::at(-0.2, -0.7, 0.25),
        );
        scene.spawn_mesh(
            Some(root),
            Primitive::cylinder(0.1, 0.08, 0.12, 16),
            Material::standard(0xe1a95f, 0.6, 0.0),
            Transform3D::at(0.0, -0.2, 0.25),
        );

        // Hinged on the back edge of the right-hand side.
        let door_pivot = scene.spawn_group(Some(root), Transform3D::at(0.55, 0.0, -0.5));
        scene.spawn_mesh(Some(door_pivot), Primitive::cuboid(0.1, 2.0, 1.0), body, Transform3D::at(0.0, 0.0, 0.5));
        scene.spawn_mesh(
            Some(door_pivot),
            Primitive::cylinder(0.03, 0.03, 1.2, 16),
            palette::chrome(),
            Transform3D::at(0.15, 0.0, 0.5).with_euler(FRAC_PI_2, 0.0, 0.0),
        );

        Self { root, door_pivot, light }
    }

    pub fn apply(&self, fridge: &Refrigerator, scene: &mut SceneGraph) {
        scene.set_rotation(self.door_pivot, Quat::from_rotation_y(fridge.door_angle()));
        scene.set_light_intensity(self.light, fridge.light_intensity());
    }
}
