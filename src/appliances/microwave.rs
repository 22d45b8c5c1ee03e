use super::{palette, FrameUpdate};
use crate::animation::{is_closed, Motion, Transition};
use crate::easing::Easing;
use crate::mesh::Primitive;
use crate::scene_graph::{Material, PointLight, SceneGraph, Transform3D};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

pub const DOOR_OPEN_ANGLE: f32 = -FRAC_PI_2;
pub const DOOR_DURATION_MS: f64 = 500.0;
/// Turntable speed in radians per second.
pub const PLATE_SPEED: f32 = 2.0;

const DOOR_MOTION: Motion = Motion::eased(DOOR_DURATION_MS, Easing::EaseOutCubic);

/// Microwave door, turntable and interior light.
///
/// The light is derived: it is on while running or while the light switch is on.
/// Opening the door flips the switch on once the door arrives; closing flips it
/// off again unless the oven is running.
#[derive(Debug, Clone)]
pub struct Microwave {
    door: Transition,
    light_switch: bool,
    running: bool,
    plate_angle: f32,
}

impl Microwave {
    pub fn new() -> Self {
        Self { door: Transition::new(0.0), light_switch: false, running: false, plate_angle: 0.0 }
    }

    pub fn open_door(&mut self, now_ms: f64) -> bool {
        self.door.begin(DOOR_OPEN_ANGLE, DOOR_MOTION, now_ms)
    }

    pub fn close_door(&mut self, now_ms: f64) -> bool {
        self.door.begin(0.0, DOOR_MOTION, now_ms)
    }

    pub fn toggle_door(&mut self, now_ms: f64) -> bool {
        if is_closed(self.door.value()) {
            self.open_door(now_ms)
        } else {
            self.close_door(now_ms)
        }
    }

    pub fn toggle_light(&mut self) {
        self.light_switch = !self.light_switch;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        if is_closed(self.door.value()) {
            self.light_switch = false;
        }
    }

    /// Starts when stopped, stops when running.
    pub fn toggle_power(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_light_on(&self) -> bool {
        self.running || self.light_switch
    }

    pub fn light_intensity(&self) -> f32 {
        if self.is_light_on() {
            1.0
        } else {
            0.0
        }
    }

    pub fn light_switch(&self) -> bool {
        self.light_switch
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn door_angle(&self) -> f32 {
        self.door.value()
    }

    pub fn plate_angle(&self) -> f32 {
        self.plate_angle
    }

    pub fn is_animating(&self) -> bool {
        self.door.is_animating()
    }
}

impl Default for Microwave {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameUpdate for Microwave {
    fn update(&mut self, frame: &FrameTime) {
        if self.door.tick(frame.now_ms).completed() {
            if self.door.target() != 0.0 {
                self.light_switch = true;
            } else if !self.running {
                self.light_switch = false;
            }
        }
        if self.running {
            self.plate_angle += frame.delta_seconds * PLATE_SPEED;
        }
    }
}

/// Scene nodes of the microwave.
#[derive(Debug, Clone, Copy)]
pub struct MicrowaveModel {
    pub root: Entity,
    pub door_pivot: Entity,
    pub plate: Entity,
    pub light: Entity,
}

impl MicrowaveModel {
    pub fn build(scene: &mut SceneGraph, position: Vec3) -> Self {
        let root = scene.spawn_group(None, Transform3D::from_translation(position));
        let body = scene.spawn_mesh(Some(root), Primitive::cuboid(0.6, 0.35, 0.45), palette::dark_metal(), Transform3D::default());
        let interior = scene.spawn_mesh(
            Some(body),
            Primitive::cuboid(0.56, 0.31, 0.41),
            Material::standard(0xaaaaaa, 0.5, 0.3),
            Transform3D::default(),
        );
        let plate = scene.spawn_mesh(
            Some(interior),
            Primitive::cylinder(0.15, 0.15, 0.01, 32),
            Material::standard(0xdddddd, 0.2, 0.1),
            Transform3D::at(0.0, -0.15, 0.0),
        );
        let light = scene.spawn_point_light(Some(interior), PointLight::new(0xffffaa, 0.0, 0.5), Vec3::ZERO);

        // The door faces +X and swings about its vertical centre line.
        let door_pivot = scene.spawn_group(Some(body), Transform3D::at(0.275, 0.0, 0.0));
        scene.spawn_mesh(
            Some(door_pivot),
            Primitive::cuboid(0.055, 0.35, 0.45),
            Material::standard(0x333333, 0.5, 0.5),
            Transform3D::default(),
        );
        let glass = scene.spawn_mesh(
            Some(door_pivot),
            Primitive::cuboid(0.05, 0.34, 0.44),
            Material::glass(0x000000, 0.5),
            Transform3D::at(0.005, 0.0, 0.0),
        );
        scene.spawn_mesh(
            Some(door_pivot),
            Primitive::cuboid(0.02, 0.15, 0.02),
            Material::standard(0x888888, 0.2, 0.8),
            Transform3D::at(0.04, 0.0, -0.18),
        );
        let grid = Material::unlit(0x444444);
        for i in 0..3 {
            let offset = -0.12 + i as f32 * 0.12;
            scene.spawn_mesh(Some(glass), Primitive::cuboid(0.001, 0.26, 0.01), grid, Transform3D::at(0.026, 0.0, offset));
            scene.spawn_mesh(Some(glass), Primitive::cuboid(0.001, 0.01, 0.35), grid, Transform3D::at(0.026, offset, 0.0));
        }

        // Control panel beside the door.
        let panel = scene.spawn_mesh(
            Some(body),
            Primitive::cuboid(0.1, 0.34, 0.15),
            Material::standard(0x333333, 0.9, 0.2),
            Transform3D::at(0.255, 0.0, -0.15),
        );
        let button = Material::standard(0x222222, 0.7, 0.3);
        for row in 0..4 {
            for col in 0..3 {
                scene.spawn_mesh(
                    Some(panel),
                    Primitive::cuboid(0.01, 0.02, 0.02),
                    button,
                    Transform3D::at(0.055, 0.06 - row as f32 * 0.05, -0.04 + col as f32 * 0.04),
                );
            }
        }
        scene.spawn_mesh(
            Some(panel),
            Primitive::plane(0.12, 0.04),
            Material::unlit(0x22ff22).with_emissive(0x22ff22, 0.5),
            Transform3D::at(0.051, 0.13, 0.0).with_euler(0.0, FRAC_PI_2, 0.0),
        );

        Self { root, door_pivot, plate, light }
    }

    pub fn apply(&self, microwave: &Microwave, scene: &mut SceneGraph) {
        scene.set_rotation(self.door_pivot, Quat::from_rotation_y(microwave.door_angle()));
        scene.set_rotation(self.plate, Quat::from_rotation_y(microwave.plate_angle()));
        scene.set_light_intensity(self.light, microwave.light_intensity());
    }
}
