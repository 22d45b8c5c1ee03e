use crate::appliances::{
    Cabinet, CabinetModel, FrameUpdate, Microwave, MicrowaveModel, Refrigerator, RefrigeratorModel, Stove,
    StoveModel, BURNER_COUNT,
};
use crate::config::SteamConfig;
use crate::mesh::Primitive;
use crate::scene_graph::{DirectionalLight, Material, PointLight, SceneGraph, Transform3D};
use crate::steam::{SteamModel, SteamSystem};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

pub const REFRIGERATOR_POSITION: Vec3 = Vec3::new(-3.0, 1.0, -3.0);
pub const STOVE_POSITION: Vec3 = Vec3::new(2.0, 0.4, -0.5);
pub const CABINET_POSITION: Vec3 = Vec3::ZERO;
pub const MICROWAVE_POSITION: Vec3 = Vec3::new(0.0, 1.25, -1.5);

const ROOM_SIZE: f32 = 15.0;
const WALL_HEIGHT: f32 = 10.0;
const FLOOR_COLOR: u32 = 0xc8b89a;
const WALL_COLOR: u32 = 0xf0ebe0;
const BACKGROUND_COLOR: u32 = 0xf5f5f5;

/// Scene nodes the dispatcher and the per-frame writers need to reach.
#[derive(Debug, Clone)]
pub struct KitchenModels {
    pub refrigerator: RefrigeratorModel,
    pub stove: StoveModel,
    pub cabinet: CabinetModel,
    pub microwave: MicrowaveModel,
    pub steam: SteamModel,
}

/// The whole kitchen: scene graph, appliance controllers and the steam above the stove.
pub struct Kitchen {
    scene: SceneGraph,
    models: KitchenModels,
    refrigerator: Refrigerator,
    stove: Stove,
    cabinet: Cabinet,
    microwave: Microwave,
    steam: SteamSystem,
}

impl Kitchen {
    pub fn new(steam_config: &SteamConfig) -> Self {
        let mut scene = SceneGraph::new();
        build_room(&mut scene);
        build_lighting(&mut scene);

        let steam = SteamSystem::new(steam_config);
        let models = KitchenModels {
            refrigerator: RefrigeratorModel::build(&mut scene, REFRIGERATOR_POSITION),
            stove: StoveModel::build(&mut scene, STOVE_POSITION),
            cabinet: CabinetModel::build(&mut scene, CABINET_POSITION),
            microwave: MicrowaveModel::build(&mut scene, MICROWAVE_POSITION),
            steam: SteamModel::build(&mut scene, StoveModel::cooktop_origin(STOVE_POSITION), &steam),
        };
        scene.propagate();
        log::debug!("Kitchen built with {} scene nodes and {} steam particles", scene.entity_count(), steam.len());

        Self {
            scene,
            models,
            refrigerator: Refrigerator::new(),
            stove: Stove::new(),
            cabinet: Cabinet::new(),
            microwave: Microwave::new(),
            steam,
        }
    }

    /// Advances every animated part in a fixed order, then writes the results into the scene.
    pub fn update(&mut self, frame: &FrameTime, viewer: Vec3) {
        let components: [&mut dyn FrameUpdate; 5] =
            [&mut self.steam, &mut self.stove, &mut self.microwave, &mut self.cabinet, &mut self.refrigerator];
        for component in components {
            component.update(frame);
        }
        self.sync_scene(viewer);
    }

    /// Copies controller state onto the scene nodes and refreshes world transforms.
    pub fn sync_scene(&mut self, viewer: Vec3) {
        let scene = &mut self.scene;
        self.models.steam.apply(&self.steam, scene, viewer);
        self.models.stove.apply(&self.stove, scene);
        self.models.microwave.apply(&self.microwave, scene);
        self.models.cabinet.apply(&self.cabinet, scene);
        self.models.refrigerator.apply(&self.refrigerator, scene);
        scene.propagate();
    }

    pub fn toggle_cabinet(&mut self, now_ms: f64) -> bool {
        self.cabinet.toggle_doors(now_ms)
    }

    pub fn toggle_refrigerator(&mut self) {
        self.refrigerator.toggle_door_instant();
    }

    pub fn toggle_microwave(&mut self, now_ms: f64) -> bool {
        self.microwave.toggle_door(now_ms)
    }

    pub fn toggle_oven(&mut self, now_ms: f64) -> bool {
        self.stove.toggle_oven_door(now_ms)
    }

    pub fn start_microwave(&mut self) {
        self.microwave.start();
    }

    pub fn stop_microwave(&mut self) {
        self.microwave.stop();
    }

    pub fn toggle_burner(&mut self, index: usize, now_ms: f64) -> bool {
        if index >= BURNER_COUNT {
            log::warn!("Ignoring toggle for burner {index}; the stove has {BURNER_COUNT}");
            return false;
        }
        self.stove.toggle_burner(index, now_ms)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn models(&self) -> &KitchenModels {
        &self.models
    }

    pub fn refrigerator(&self) -> &Refrigerator {
        &self.refrigerator
    }

    pub fn refrigerator_mut(&mut self) -> &mut Refrigerator {
        &mut self.refrigerator
    }

    pub fn stove(&self) -> &Stove {
        &self.stove
    }

    pub fn stove_mut(&mut self) -> &mut Stove {
        &mut self.stove
    }

    pub fn cabinet(&self) -> &Cabinet {
        &self.cabinet
    }

    pub fn cabinet_mut(&mut self) -> &mut Cabinet {
        &mut self.cabinet
    }

    pub fn microwave(&self) -> &Microwave {
        &self.microwave
    }

    pub fn microwave_mut(&mut self) -> &mut Microwave {
        &mut self.microwave
    }

    pub fn steam(&self) -> &SteamSystem {
        &self.steam
    }

    /// Mesh entities of the four stove knobs, indexed like the burners.
    pub fn knob_entities(&self) -> [Entity; BURNER_COUNT] {
        self.models.stove.knobs
    }
}

fn build_room(scene: &mut SceneGraph) {
    scene.spawn_mesh(
        None,
        Primitive::plane(ROOM_SIZE, ROOM_SIZE),
        Material::standard(FLOOR_COLOR, 0.8, 0.2),
        Transform3D::default().with_euler(-FRAC_PI_2, 0.0, 0.0),
    );
    let wall = Material::standard(WALL_COLOR, 0.9, 0.0);
    let half = ROOM_SIZE / 2.0;
    let height = WALL_HEIGHT / 2.0;
    let walls = [
        Transform3D::at(0.0, height, -half),
        Transform3D::at(-half, height, 0.0).with_euler(0.0, FRAC_PI_2, 0.0),
        Transform3D::at(half, height, 0.0).with_euler(0.0, -FRAC_PI_2, 0.0),
    ];
    for transform in walls {
        scene.spawn_mesh(None, Primitive::plane(ROOM_SIZE, WALL_HEIGHT), wall, transform);
    }
}

fn build_lighting(scene: &mut SceneGraph) {
    scene.set_background(BACKGROUND_COLOR);
    scene.set_ambient(0xffffff, 0.5);
    scene.spawn_directional_light(DirectionalLight::new(0xffffff, 1.0), Vec3::new(5.0, 10.0, 5.0));
    scene.spawn_directional_light(DirectionalLight::new(0xffeedd, 0.5), Vec3::new(-5.0, 8.0, -5.0));
    scene.spawn_point_light(None, PointLight::new(0xffffff, 0.6, 10.0), Vec3::new(0.0, 5.0, 2.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliances::stove::BURNER_HEIGHT;

    fn seeded() -> Kitchen {
        let config = SteamConfig { seed: Some(3), ..SteamConfig::default() };
        Kitchen::new(&config)
    }

    #[test]
    fn fridge_light_follows_scripted_toggle() {
        let mut kitchen = seeded();
        kitchen.toggle_refrigerator();
        kitchen.sync_scene(Vec3::new(0.0, 2.0, 5.0));
        let light = kitchen.models().refrigerator.light;
        assert_eq!(kitchen.scene().light_intensity(light), Some(1.0));
        kitchen.toggle_refrigerator();
        kitchen.sync_scene(Vec3::new(0.0, 2.0, 5.0));
        assert_eq!(kitchen.scene().light_intensity(light), Some(0.0));
    }

    #[test]
    fn steam_rises_from_the_cooktop() {
        let kitchen = seeded();
        let origin = kitchen.models().steam.origin;
        assert_eq!(origin, STOVE_POSITION + Vec3::new(0.0, BURNER_HEIGHT, 0.0));
    }

    #[test]
    fn out_of_range_burner_is_rejected() {
        let mut kitchen = seeded();
        assert!(!kitchen.toggle_burner(BURNER_COUNT, 0.0));
        assert!(kitchen.stove().burners().iter().all(|burner| !burner.active));
    }

    #[test]
    fn update_spins_plate_only_while_running() {
        let mut kitchen = seeded();
        let viewer = Vec3::new(0.0, 2.0, 5.0);
        kitchen.update(&FrameTime::new(16.0, 0.5), viewer);
        assert_eq!(kitchen.microwave().plate_angle(), 0.0);
        kitchen.start_microwave();
        kitchen.update(&FrameTime::new(32.0, 0.5), viewer);
        assert!((kitchen.microwave().plate_angle() - 1.0).abs() < 1e-6);
    }
}
