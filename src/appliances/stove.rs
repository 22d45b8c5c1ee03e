use super::{palette, FrameUpdate};
use crate::animation::{Motion, Retrigger, Transition};
use crate::easing::Easing;
use crate::mesh::Primitive;
use crate::scene_graph::{euler_xyz, Material, SceneGraph, Transform3D};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::{Quat, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

pub const BURNER_COUNT: usize = 4;
pub const KNOB_ON_ANGLE: f32 = FRAC_PI_2;
pub const KNOB_DURATION_MS: f64 = 300.0;
/// Glow intensity change per second.
pub const BURNER_RATE: f32 = 2.0;
pub const OVEN_DOOR_OPEN_ANGLE: f32 = FRAC_PI_4;
pub const OVEN_DOOR_DURATION_MS: f64 = 500.0;

/// Burner layout on the cooktop, relative to the stove centre (x, z).
pub const BURNER_OFFSETS: [(f32, f32); BURNER_COUNT] = [(-0.35, -0.35), (0.35, -0.35), (-0.35, 0.35), (0.35, 0.35)];
/// Height of the burner groups above the stove centre.
pub const BURNER_HEIGHT: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Burner {
    pub active: bool,
    pub intensity: f32,
}

impl Burner {
    /// Moves glow toward fully on or off at [`BURNER_RATE`].
    pub fn integrate(&mut self, dt: f32) {
        if self.active && self.intensity < 1.0 {
            self.intensity = (self.intensity + dt * BURNER_RATE).min(1.0);
        } else if !self.active && self.intensity > 0.0 {
            self.intensity = (self.intensity - dt * BURNER_RATE).max(0.0);
        }
    }

    /// Heating element glow as linear RGB, quantized to 8-bit channels.
    pub fn emissive_color(&self) -> Vec3 {
        let r = (255.0 * self.intensity).floor() / 255.0;
        let g = (100.0 * self.intensity).floor() / 255.0;
        Vec3::new(r, g, 0.0)
    }

    pub fn emissive_intensity(&self) -> f32 {
        self.intensity * 2.0
    }
}

/// Four burners with their control knobs, plus the oven door.
#[derive(Debug, Clone)]
pub struct Stove {
    burners: [Burner; BURNER_COUNT],
    knobs: [Transition; BURNER_COUNT],
    oven_door: Transition,
}

impl Stove {
    pub fn new() -> Self {
        Self {
            burners: [Burner::default(); BURNER_COUNT],
            knobs: std::array::from_fn(|_| Transition::new(0.0).with_retrigger(Retrigger::Restart)),
            oven_door: Transition::new(0.0),
        }
    }

    /// Flips burner `index` and turns its knob. Returns the new switch state,
    /// or `false` for an index that does not name a burner.
    pub fn toggle_burner(&mut self, index: usize, now_ms: f64) -> bool {
        let (Some(burner), Some(knob)) = (self.burners.get_mut(index), self.knobs.get_mut(index)) else {
            return false;
        };
        burner.active = !burner.active;
        let target = if burner.active { KNOB_ON_ANGLE } else { 0.0 };
        knob.begin(target, Motion::linear(KNOB_DURATION_MS), now_ms);
        burner.active
    }

    pub fn update_burners(&mut self, dt: f32) {
        for burner in &mut self.burners {
            burner.integrate(dt);
        }
    }

    pub fn open_oven_door(&mut self, now_ms: f64) -> bool {
        self.oven_door.begin(OVEN_DOOR_OPEN_ANGLE, Motion::eased(OVEN_DOOR_DURATION_MS, Easing::EaseOutCubic), now_ms)
    }

    pub fn close_oven_door(&mut self, now_ms: f64) -> bool {
        self.oven_door.begin(0.0, Motion::eased(OVEN_DOOR_DURATION_MS, Easing::EaseOutCubic), now_ms)
    }

    /// Opens only from exactly closed; any other angle closes.
    pub fn toggle_oven_door(&mut self, now_ms: f64) -> bool {
        if self.oven_door.value() == 0.0 {
            self.open_oven_door(now_ms)
        } else {
            self.close_oven_door(now_ms)
        }
    }

    pub fn burner(&self, index: usize) -> Option<&Burner> {
        self.burners.get(index)
    }

    pub fn burners(&self) -> &[Burner; BURNER_COUNT] {
        &self.burners
    }

    pub fn knob_angle(&self, index: usize) -> Option<f32> {
        self.knobs.get(index).map(Transition::value)
    }

    pub fn oven_door_angle(&self) -> f32 {
        self.oven_door.value()
    }

    pub fn is_oven_door_animating(&self) -> bool {
        self.oven_door.is_animating()
    }
}

impl Default for Stove {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameUpdate for Stove {
    fn update(&mut self, frame: &FrameTime) {
        for knob in &mut self.knobs {
            knob.tick(frame.now_ms);
        }
        self.oven_door.tick(frame.now_ms);
        self.update_burners(frame.delta_seconds);
    }
}

/// Scene nodes of the stove.
#[derive(Debug, Clone, Copy)]
pub struct StoveModel {
    pub root: Entity,
    pub knobs: [Entity; BURNER_COUNT],
    pub elements: [Entity; BURNER_COUNT],
    pub oven_door: Entity,
}

impl StoveModel {
    pub fn build(scene: &mut SceneGraph, position: Vec3) -> Self {
        let root = scene.spawn_group(None, Transform3D::from_translation(position));
        scene.spawn_mesh(Some(root), Primitive::cuboid(1.2, 0.8, 1.2), palette::metal(), Transform3D::default());
        scene.spawn_mesh(
            Some(root),
            Primitive::cuboid(1.2, 0.05, 1.2),
            Material::standard(0x202020, 0.4, 0.6),
            Transform3D::at(0.0, 0.425, 0.0),
        );

        let elements = BURNER_OFFSETS.map(|(x, z)| Self::build_burner(scene, root, x, z));

        let knob_material = palette::black();
        let indicator = Material::standard(0xffffff, 0.5, 0.0);
        let knobs = std::array::from_fn(|i| {
            // Knobs sit proud of the front face and turn about the face normal.
            let knob = scene.spawn_mesh(
                Some(root),
                Primitive::cylinder(0.05, 0.05, 0.03, 32),
                knob_material,
                Transform3D::at(-0.4 + i as f32 * 0.25, 0.3, 0.615).with_euler(FRAC_PI_2, 0.0, 0.0),
            );
            scene.spawn_mesh(Some(knob), Primitive::cuboid(0.045, 0.01, 0.01), indicator, Transform3D::at(0.0, 0.02, 0.0));
            knob
        });

        let oven_door = scene.spawn_mesh(
            Some(root),
            Primitive::cuboid(1.0, 0.6, 0.05),
            palette::metal(),
            Transform3D::at(0.0, -0.1, 0.625),
        );
        scene.spawn_mesh(
            Some(oven_door),
            Primitive::cylinder(0.015, 0.015, 0.8, 16),
            palette::chrome(),
            Transform3D::at(0.0, 0.22, 0.05).with_euler(0.0, 0.0, FRAC_PI_2),
        );
        scene.spawn_mesh(
            Some(oven_door),
            Primitive::plane(0.7, 0.3),
            Material::glass(0x111111, 0.8),
            Transform3D::at(0.0, 0.0, 0.026),
        );

        Self { root, knobs, elements, oven_door }
    }

    /// Base plate, crossed grate and the glowing ring element. Returns the element.
    fn build_burner(scene: &mut SceneGraph, root: Entity, x: f32, z: f32) -> Entity {
        let group = scene.spawn_group(Some(root), Transform3D::at(x, BURNER_HEIGHT, z));
        scene.spawn_mesh(
            Some(group),
            Primitive::cylinder(0.15, 0.15, 0.02, 32),
            Material::standard(0x111111, 0.7, 0.3),
            Transform3D::default(),
        );
        let grate = Material::standard(0x333333, 0.8, 0.6);
        for angle in [FRAC_PI_4, -FRAC_PI_4] {
            scene.spawn_mesh(
                Some(group),
                Primitive::cylinder(0.01, 0.01, 0.3, 8),
                grate,
                Transform3D::at(0.0, 0.03, 0.0).with_euler(FRAC_PI_2, angle, 0.0),
            );
        }
        scene.spawn_mesh(
            Some(group),
            Primitive::ring(0.05, 0.13, 32),
            Material::standard(0x111111, 1.0, 0.0),
            Transform3D::at(0.0, 0.011, 0.0).with_euler(-FRAC_PI_2, 0.0, 0.0),
        )
    }

    pub fn apply(&self, stove: &Stove, scene: &mut SceneGraph) {
        for (i, &knob) in self.knobs.iter().enumerate() {
            let angle = stove.knob_angle(i).unwrap_or_default();
            scene.set_rotation(knob, euler_xyz(FRAC_PI_2, angle, 0.0));
        }
        for (burner, &element) in stove.burners().iter().zip(&self.elements) {
            scene.set_emissive(element, burner.emissive_color(), burner.emissive_intensity());
        }
        scene.set_rotation(self.oven_door, Quat::from_rotation_x(stove.oven_door_angle()));
    }

    /// Top of the cooktop in world space, given the stove's placement.
    pub fn cooktop_origin(position: Vec3) -> Vec3 {
        position + Vec3::new(0.0, BURNER_HEIGHT, 0.0)
    }
}
