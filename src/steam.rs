use crate::appliances::FrameUpdate;
use crate::config::{SteamConfig, SteamPacing};
use crate::mesh::Primitive;
use crate::scene_graph::{Material, SceneGraph, Transform3D};
use crate::time::FrameTime;
use bevy_ecs::entity::Entity;
use glam::{Mat3, Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Emission points relative to the steam origin (x, z).
pub const STEAM_ANCHORS: [Vec2; 4] =
    [Vec2::new(-0.3, -0.3), Vec2::new(0.3, -0.3), Vec2::new(-0.3, 0.3), Vec2::new(0.3, 0.3)];
pub const ANCHOR_JITTER: f32 = 0.1;
pub const SPAWN_HEIGHT: f32 = 0.2;
pub const PARTICLE_SIZE: f32 = 0.07;
pub const START_OPACITY: f32 = 0.6;
/// Fraction of life after which a particle starts fading out.
pub const FADE_START: f32 = 0.7;
const DRIFT_AMPLITUDE: f32 = 0.001;
const SPREAD_RATE: f32 = 0.01;
/// Frames per second the per-frame rise speed was tuned for.
const NOMINAL_FPS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteamParticle {
    /// Relative to the steam origin.
    pub position: Vec3,
    pub life: f32,
    pub max_life: f32,
    pub origin: Vec2,
    pub opacity: f32,
    pub scale: f32,
    /// Rise per nominal frame.
    pub speed: f32,
}

impl SteamParticle {
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            self.life / self.max_life
        } else {
            1.0
        }
    }
}

/// Fixed pool of rising, fading steam puffs above the cooktop.
pub struct SteamSystem {
    particles: Vec<SteamParticle>,
    rng: StdRng,
    pacing: SteamPacing,
    nominal_step: f32,
}

impl SteamSystem {
    pub fn new(config: &SteamConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let particles = (0..config.particle_count)
            .map(|_| {
                let mut particle = SteamParticle {
                    position: Vec3::ZERO,
                    life: 0.0,
                    max_life: 0.0,
                    origin: Vec2::ZERO,
                    opacity: START_OPACITY,
                    scale: 1.0,
                    speed: rng.gen_range(0.01..0.02),
                };
                respawn(&mut particle, &mut rng);
                particle
            })
            .collect();
        Self { particles, rng, pacing: config.pacing, nominal_step: config.nominal_step }
    }

    pub fn particles(&self) -> &[SteamParticle] {
        &self.particles
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut SteamParticle> {
        self.particles.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn respawn(particle: &mut SteamParticle, rng: &mut StdRng) {
    let anchor = STEAM_ANCHORS[rng.gen_range(0..STEAM_ANCHORS.len())];
    particle.position = Vec3::new(
        anchor.x + rng.gen_range(-ANCHOR_JITTER..ANCHOR_JITTER),
        rng.gen_range(0.0..SPAWN_HEIGHT),
        anchor.y + rng.gen_range(-ANCHOR_JITTER..ANCHOR_JITTER),
    );
    particle.origin = anchor;
    particle.life = 0.0;
    particle.max_life = rng.gen_range(2.0..4.0);
    particle.opacity = START_OPACITY;
}

impl FrameUpdate for SteamSystem {
    fn update(&mut self, frame: &FrameTime) {
        // `frames` counts nominal frames covered by this update.
        let (life_step, frames) = match self.pacing {
            SteamPacing::FixedStep => (self.nominal_step, 1.0),
            SteamPacing::FrameDelta => (frame.delta_seconds, frame.delta_seconds * NOMINAL_FPS),
        };
        let spread = (1.0 + SPREAD_RATE).powf(frames);
        let drift = DRIFT_AMPLITUDE * frames;
        let t = frame.elapsed_seconds;
        for (index, particle) in self.particles.iter_mut().enumerate() {
            particle.life += life_step;
            if particle.life >= particle.max_life {
                respawn(particle, &mut self.rng);
            }

            particle.position.y += particle.speed * frames;
            let i = index as f32;
            particle.position.x += (t * 2.0 + i).sin() * drift;
            particle.position.z += (t * 2.0 + i * 0.7).cos() * drift;
            particle.position.x = particle.origin.x + (particle.position.x - particle.origin.x) * spread;
            particle.position.z = particle.origin.y + (particle.position.z - particle.origin.y) * spread;

            let ratio = particle.life_ratio();
            particle.scale = 1.0 + ratio * 2.0;
            if ratio > FADE_START {
                particle.opacity = START_OPACITY * (1.0 - (ratio - FADE_START) / (1.0 - FADE_START));
            }
        }
    }
}

/// Scene nodes of the steam: one group at the origin and a quad per particle.
#[derive(Debug, Clone)]
pub struct SteamModel {
    pub group: Entity,
    pub origin: Vec3,
    pub particles: Vec<Entity>,
}

impl SteamModel {
    pub fn build(scene: &mut SceneGraph, origin: Vec3, steam: &SteamSystem) -> Self {
        let group = scene.spawn_group(None, Transform3D::from_translation(origin));
        let particles = steam
            .particles()
            .iter()
            .map(|particle| {
                scene.spawn_mesh(
                    Some(group),
                    Primitive::plane(PARTICLE_SIZE, PARTICLE_SIZE),
                    Material::steam(particle.opacity),
                    Transform3D::from_translation(particle.position),
                )
            })
            .collect();
        Self { group, origin, particles }
    }

    /// Writes particle state into the scene, turning each quad toward `viewer`.
    pub fn apply(&self, steam: &SteamSystem, scene: &mut SceneGraph, viewer: Vec3) {
        for (particle, &entity) in steam.particles().iter().zip(&self.particles) {
            let world = self.origin + particle.position;
            scene.set_translation(entity, particle.position);
            scene.set_rotation(entity, billboard_rotation(world, viewer));
            scene.set_scale(entity, Vec3::new(particle.scale, particle.scale, 1.0));
            scene.set_opacity(entity, particle.opacity);
        }
    }
}

/// Rotation that points local +Z from `position` toward `viewer`.
pub fn billboard_rotation(position: Vec3, viewer: Vec3) -> Quat {
    let Some(forward) = (viewer - position).try_normalize() else {
        return Quat::IDENTITY;
    };
    let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
    let up = forward.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}
