pub mod picking;
pub mod transform;
pub mod types;

pub use transform::{sys_propagate_transforms, TransformPropagationScratch};
pub use types::{
    color, euler_xyz, AmbientLight, Background, Children, DirectionalLight, Material, MaterialKind, MeshNode,
    Parent, PointLight, Transform3D, WorldTransform3D,
};

use crate::mesh::Primitive;
use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

/// Mesh node resolved to world space, ready for drawing.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub entity: Entity,
    pub model: Mat4,
    pub primitive: Primitive,
    pub material: Material,
}

#[derive(Clone, Copy, Debug)]
pub struct WorldPointLight {
    pub position: Vec3,
    pub light: PointLight,
}

#[derive(Clone, Copy, Debug)]
pub struct WorldDirectionalLight {
    /// Direction the light travels in.
    pub direction: Vec3,
    pub light: DirectionalLight,
}

/// Hierarchical transform nodes with meshes, materials and lights.
pub struct SceneGraph {
    pub world: World,
    schedule: Schedule,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(TransformPropagationScratch::default());
        world.insert_resource(AmbientLight::default());
        world.insert_resource(Background(Vec3::ONE));
        let mut schedule = Schedule::default();
        schedule.add_systems(sys_propagate_transforms);
        Self { world, schedule }
    }

    pub fn spawn_group(&mut self, parent: Option<Entity>, transform: Transform3D) -> Entity {
        let entity = self.world.spawn((transform, WorldTransform3D::default())).id();
        self.attach(entity, parent);
        entity
    }

    pub fn spawn_mesh(
        &mut self,
        parent: Option<Entity>,
        primitive: Primitive,
        material: Material,
        transform: Transform3D,
    ) -> Entity {
        let entity =
            self.world.spawn((transform, WorldTransform3D::default(), MeshNode { primitive, material })).id();
        self.attach(entity, parent);
        entity
    }

    pub fn spawn_point_light(&mut self, parent: Option<Entity>, light: PointLight, translation: Vec3) -> Entity {
        let entity = self
            .world
            .spawn((Transform3D::from_translation(translation), WorldTransform3D::default(), light))
            .id();
        self.attach(entity, parent);
        entity
    }

    pub fn spawn_directional_light(&mut self, light: DirectionalLight, position: Vec3) -> Entity {
        self.world.spawn((Transform3D::from_translation(position), WorldTransform3D::default(), light)).id()
    }

    fn attach(&mut self, child: Entity, parent: Option<Entity>) {
        let Some(parent) = parent else {
            return;
        };
        self.world.entity_mut(child).insert(Parent(parent));
        match self.world.get_mut::<Children>(parent) {
            Some(mut children) => children.0.push(child),
            None => {
                self.world.entity_mut(parent).insert(Children(vec![child]));
            }
        }
    }

    pub fn set_ambient(&mut self, hex: u32, intensity: f32) {
        self.world.insert_resource(AmbientLight { color: color(hex), intensity });
    }

    pub fn ambient(&self) -> AmbientLight {
        self.world.get_resource::<AmbientLight>().copied().unwrap_or_default()
    }

    pub fn set_background(&mut self, hex: u32) {
        self.world.insert_resource(Background(color(hex)));
    }

    pub fn background(&self) -> Vec3 {
        self.world.get_resource::<Background>().map(|bg| bg.0).unwrap_or(Vec3::ONE)
    }

    pub fn transform(&self, entity: Entity) -> Option<Transform3D> {
        self.world.get::<Transform3D>(entity).copied()
    }

    pub fn set_translation(&mut self, entity: Entity, translation: Vec3) {
        if let Some(mut transform) = self.world.get_mut::<Transform3D>(entity) {
            transform.translation = translation;
        }
    }

    pub fn set_rotation(&mut self, entity: Entity, rotation: Quat) {
        if let Some(mut transform) = self.world.get_mut::<Transform3D>(entity) {
            transform.rotation = rotation;
        }
    }

    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) {
        if let Some(mut transform) = self.world.get_mut::<Transform3D>(entity) {
            transform.scale = scale;
        }
    }

    pub fn material(&self, entity: Entity) -> Option<Material> {
        self.world.get::<MeshNode>(entity).map(|node| node.material)
    }

    pub fn set_emissive(&mut self, entity: Entity, emissive: Vec3, intensity: f32) {
        if let Some(mut node) = self.world.get_mut::<MeshNode>(entity) {
            node.material.emissive = emissive;
            node.material.emissive_intensity = intensity;
        }
    }

    pub fn set_opacity(&mut self, entity: Entity, opacity: f32) {
        if let Some(mut node) = self.world.get_mut::<MeshNode>(entity) {
            node.material.base_color.w = opacity;
        }
    }

    pub fn light_intensity(&self, entity: Entity) -> Option<f32> {
        self.world.get::<PointLight>(entity).map(|light| light.intensity)
    }

    pub fn set_light_intensity(&mut self, entity: Entity, intensity: f32) {
        if let Some(mut light) = self.world.get_mut::<PointLight>(entity) {
            light.intensity = intensity;
        }
    }

    /// Recomputes every world transform from the hierarchy.
    pub fn propagate(&mut self) {
        self.schedule.run(&mut self.world);
    }

    pub fn world_transform(&self, entity: Entity) -> Option<Mat4> {
        self.world.get::<WorldTransform3D>(entity).map(|world| world.0)
    }

    /// `root` followed by all of its descendants, depth first.
    pub fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(entity) = stack.pop() {
            out.push(entity);
            if let Some(children) = self.world.get::<Children>(entity) {
                stack.extend(children.0.iter().rev().copied());
            }
        }
        out
    }

    /// Casts a world-space ray against mesh nodes under `roots`, nearest hit first.
    /// World transforms must be current (see [`SceneGraph::propagate`]).
    pub fn raycast(&self, origin: Vec3, dir: Vec3, roots: &[Entity], recursive: bool) -> Vec<RayHit> {
        let candidates: Vec<Entity> = if recursive {
            roots.iter().flat_map(|&root| self.subtree(root)).collect()
        } else {
            roots.to_vec()
        };
        let mut hits: Vec<RayHit> = candidates
            .into_iter()
            .filter_map(|entity| {
                let node = self.world.get::<MeshNode>(entity)?;
                let world = self.world.get::<WorldTransform3D>(entity)?;
                let (min, max) = node.primitive.local_bounds();
                picking::ray_hit_obb(origin, dir, &world.0, min, max).map(|distance| RayHit { entity, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    pub fn draw_items(&mut self) -> Vec<DrawItem> {
        let mut query = self.world.query::<(Entity, &MeshNode, &WorldTransform3D)>();
        query
            .iter(&self.world)
            .map(|(entity, node, world)| DrawItem {
                entity,
                model: world.0,
                primitive: node.primitive,
                material: node.material,
            })
            .collect()
    }

    pub fn point_lights(&mut self) -> Vec<WorldPointLight> {
        let mut query = self.world.query::<(&PointLight, &WorldTransform3D)>();
        query
            .iter(&self.world)
            .map(|(light, world)| WorldPointLight { position: world.0.transform_point3(Vec3::ZERO), light: *light })
            .collect()
    }

    pub fn directional_lights(&mut self) -> Vec<WorldDirectionalLight> {
        let mut query = self.world.query::<(&DirectionalLight, &WorldTransform3D)>();
        query
            .iter(&self.world)
            .map(|(light, world)| {
                let position = world.0.transform_point3(Vec3::ZERO);
                let direction = (-position).try_normalize().unwrap_or(Vec3::NEG_Y);
                WorldDirectionalLight { direction, light: *light }
            })
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.world.entities().len() as usize
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
