use crate::mesh::Primitive;
use bevy_ecs::prelude::*;
use glam::{Mat4, Quat, Vec3, Vec4};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform3D {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform3D {
    fn default() -> Self {
        Self { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE }
    }
}
impl Transform3D {
    pub fn from_translation(translation: Vec3) -> Self {
        Self { translation, ..Default::default() }
    }
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }
    /// Rotation given as XYZ Euler angles in radians.
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = euler_xyz(x, y, z);
        self
    }
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

pub fn euler_xyz(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(glam::EulerRot::XYZ, x, y, z)
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform3D(pub Mat4);
impl Default for WorldTransform3D {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub Entity);

#[derive(Component, Clone, Debug, Default)]
pub struct Children(pub Vec<Entity>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialKind {
    /// Lit, opaque unless opacity < 1.
    Standard,
    /// Lit, always blended.
    Glass,
    /// Base colour plus emissive, no lighting.
    Unlit,
    /// Additive soft round sprite.
    Steam,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    /// Linear RGB plus opacity.
    pub base_color: Vec4,
    pub roughness: f32,
    pub metalness: f32,
    /// Linear RGB.
    pub emissive: Vec3,
    pub emissive_intensity: f32,
}

impl Material {
    pub fn standard(hex: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            kind: MaterialKind::Standard,
            base_color: color(hex).extend(1.0),
            roughness,
            metalness,
            emissive: Vec3::ZERO,
            emissive_intensity: 0.0,
        }
    }

    pub fn glass(hex: u32, opacity: f32) -> Self {
        Self { kind: MaterialKind::Glass, base_color: color(hex).extend(opacity), ..Self::standard(hex, 0.1, 0.1) }
    }

    pub fn unlit(hex: u32) -> Self {
        Self { kind: MaterialKind::Unlit, ..Self::standard(hex, 1.0, 0.0) }
    }

    pub fn steam(opacity: f32) -> Self {
        Self { kind: MaterialKind::Steam, base_color: Vec3::ONE.extend(opacity), ..Self::standard(0xffffff, 1.0, 0.0) }
    }

    pub fn with_emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = color(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn opacity(&self) -> f32 {
        self.base_color.w
    }

    pub fn is_blended(&self) -> bool {
        !matches!(self.kind, MaterialKind::Standard | MaterialKind::Unlit) || self.opacity() < 1.0
    }
}

/// Converts an sRGB hex colour (0xRRGGBB) to linear RGB.
pub fn color(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MeshNode {
    pub primitive: Primitive,
    pub material: Material,
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    /// Zero means unlimited.
    pub range: f32,
}

impl PointLight {
    pub fn new(hex: u32, intensity: f32, range: f32) -> Self {
        Self { color: color(hex), intensity, range }
    }
}

/// Shines from the node's world position toward the world origin.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(hex: u32, intensity: f32) -> Self {
        Self { color: color(hex), intensity }
    }
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self { color: Vec3::ONE, intensity: 0.0 }
    }
}

#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Background(pub Vec3);
