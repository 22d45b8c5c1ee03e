mod mesh_pass;
mod window_surface;

pub use window_surface::{SurfaceFrame, WindowSurface};

use crate::camera3d::Camera3D;
use crate::config::WindowConfig;
use crate::mesh::{Mesh, PrimitiveKey};
use crate::scene_graph::{DrawItem, MaterialKind, SceneGraph, WorldDirectionalLight, WorldPointLight};
use anyhow::{Context, Result};
use glam::Vec3;
use mesh_pass::{BlendKind, MeshDrawData, MeshFrameData, MeshPass, MeshPassParams, PreparedDraw};
use std::collections::HashMap;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
pub const MAX_POINT_LIGHTS: usize = 8;

pub(crate) struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Draws the kitchen scene graph into the window surface.
pub struct Renderer {
    surface: WindowSurface,
    mesh_pass: MeshPass,
    meshes: HashMap<PrimitiveKey, GpuMesh>,
    draws: Vec<PreparedDraw>,
}

impl Renderer {
    pub fn new(window_cfg: &WindowConfig) -> Self {
        Self {
            surface: WindowSurface::new(window_cfg),
            mesh_pass: MeshPass::new(),
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    pub fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        self.surface.ensure_window(event_loop)?;
        let format = self.surface.surface_format()?;
        self.mesh_pass.ensure_resources(self.surface.device()?, format);
        Ok(())
    }

    pub fn window(&self) -> Option<&Window> {
        self.surface.window()
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.surface.size()
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.surface.resize(size);
    }

    /// Renders one frame. World transforms must already be propagated.
    pub fn render_scene(&mut self, scene: &mut SceneGraph, camera: &Camera3D) -> Result<()> {
        let size = self.surface.size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        let items = scene.draw_items();
        let frame_data = frame_data(
            camera,
            scene.ambient().color * scene.ambient().intensity,
            &scene.directional_lights(),
            &scene.point_lights(),
        );
        let background = scene.background();

        self.upload_meshes(&items)?;
        self.draws.clear();
        self.draws.extend(order_draw_items(&items, camera.position).into_iter().map(prepare_draw));

        let frame = self.surface.acquire_surface_frame()?;
        let device = self.surface.device()?;
        let queue = self.surface.queue()?;
        let depth_view = self.surface.depth_view()?;
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("Kitchen Frame Encoder") });
        self.mesh_pass.render(MeshPassParams {
            device,
            queue,
            encoder: &mut encoder,
            color_view: frame.view(),
            depth_view,
            clear_color: wgpu::Color {
                r: f64::from(background.x),
                g: f64::from(background.y),
                b: f64::from(background.z),
                a: 1.0,
            },
            frame: &frame_data,
            draws: &self.draws,
            meshes: &self.meshes,
        })?;
        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn upload_meshes(&mut self, items: &[DrawItem]) -> Result<()> {
        let device = self.surface.device().context("Mesh upload requires a GPU device")?;
        for item in items {
            let key = item.primitive.key();
            if self.meshes.contains_key(&key) {
                continue;
            }
            let mesh = Mesh::from_primitive(&item.primitive);
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Kitchen Mesh VB"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Kitchen Mesh IB"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            self.meshes.insert(
                key,
                GpuMesh { vertex_buffer, index_buffer, index_count: mesh.indices.len() as u32 },
            );
        }
        Ok(())
    }
}

fn blend_kind(item: &DrawItem) -> BlendKind {
    match item.material.kind {
        MaterialKind::Steam => BlendKind::Additive,
        _ if item.material.is_blended() => BlendKind::Alpha,
        _ => BlendKind::Opaque,
    }
}

/// Opaque items first, then blended items from farthest to nearest.
fn order_draw_items(items: &[DrawItem], eye: Vec3) -> Vec<(BlendKind, DrawItem)> {
    let mut ordered: Vec<(BlendKind, f32, DrawItem)> = items
        .iter()
        .map(|item| {
            let distance = item.model.transform_point3(Vec3::ZERO).distance_squared(eye);
            (blend_kind(item), distance, *item)
        })
        .collect();
    ordered.sort_by(|a, b| {
        let a_blended = a.0 != BlendKind::Opaque;
        let b_blended = b.0 != BlendKind::Opaque;
        a_blended.cmp(&b_blended).then_with(|| {
            if a_blended {
                b.1.total_cmp(&a.1)
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    ordered.into_iter().map(|(kind, _, item)| (kind, item)).collect()
}

fn prepare_draw((blend, item): (BlendKind, DrawItem)) -> PreparedDraw {
    let material = item.material;
    let unlit = if material.kind == MaterialKind::Unlit { 1.0 } else { 0.0 };
    let steam = if material.kind == MaterialKind::Steam { 1.0 } else { 0.0 };
    PreparedDraw {
        mesh: item.primitive.key(),
        blend,
        data: MeshDrawData {
            model: item.model.to_cols_array_2d(),
            base_color: material.base_color.to_array(),
            emissive: material.emissive.extend(material.emissive_intensity).to_array(),
            material_params: [material.roughness, material.metalness, unlit, steam],
        },
    }
}

fn frame_data(
    camera: &Camera3D,
    ambient: Vec3,
    directional: &[WorldDirectionalLight],
    points: &[WorldPointLight],
) -> MeshFrameData {
    let mut data = MeshFrameData {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: camera.position.extend(1.0).to_array(),
        ambient: ambient.extend(1.0).to_array(),
        dir_light_dir: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        dir_light_color: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
        point_light_pos: [[0.0; 4]; MAX_POINT_LIGHTS],
        point_light_color: [[0.0; 4]; MAX_POINT_LIGHTS],
        light_counts: [0.0; 4],
    };
    let dir_count = directional.len().min(MAX_DIRECTIONAL_LIGHTS);
    for (slot, light) in directional.iter().take(dir_count).enumerate() {
        data.dir_light_dir[slot] = light.direction.extend(0.0).to_array();
        data.dir_light_color[slot] = (light.light.color * light.light.intensity).extend(1.0).to_array();
    }
    // Switched-off interior lights take no slot.
    let mut point_count = 0;
    for light in points.iter().filter(|light| light.light.intensity > 0.0) {
        if point_count == MAX_POINT_LIGHTS {
            log::warn!("More than {MAX_POINT_LIGHTS} point lights are lit; extra lights are ignored");
            break;
        }
        data.point_light_pos[point_count] = light.position.extend(light.light.range).to_array();
        data.point_light_color[point_count] = (light.light.color * light.light.intensity).extend(1.0).to_array();
        point_count += 1;
    }
    data.light_counts = [dir_count as f32, point_count as f32, 0.0, 0.0];
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::mesh::Primitive;
    use crate::scene_graph::{DirectionalLight, Material, PointLight, Transform3D};

    #[test]
    fn blended_items_draw_after_opaque_far_to_near() {
        let mut scene = SceneGraph::new();
        let near_glass = scene.spawn_mesh(
            None,
            Primitive::cuboid(1.0, 1.0, 1.0),
            Material::glass(0xffffff, 0.5),
            Transform3D::at(0.0, 0.0, 3.0),
        );
        let far_glass = scene.spawn_mesh(
            None,
            Primitive::cuboid(1.0, 1.0, 1.0),
            Material::glass(0xffffff, 0.5),
            Transform3D::at(0.0, 0.0, -3.0),
        );
        let solid = scene.spawn_mesh(
            None,
            Primitive::cuboid(1.0, 1.0, 1.0),
            Material::standard(0x808080, 0.5, 0.0),
            Transform3D::default(),
        );
        scene.propagate();
        let ordered = order_draw_items(&scene.draw_items(), Vec3::new(0.0, 0.0, 5.0));
        let entities: Vec<_> = ordered.iter().map(|(_, item)| item.entity).collect();
        assert_eq!(entities, vec![solid, far_glass, near_glass]);
        assert_eq!(ordered[0].0, BlendKind::Opaque);
        assert_eq!(ordered[2].0, BlendKind::Alpha);
    }

    #[test]
    fn steam_uses_additive_blend() {
        let mut scene = SceneGraph::new();
        scene.spawn_mesh(None, Primitive::plane(0.1, 0.1), Material::steam(0.6), Transform3D::default());
        scene.propagate();
        let ordered = order_draw_items(&scene.draw_items(), Vec3::Z);
        assert_eq!(ordered[0].0, BlendKind::Additive);
        let draw = prepare_draw(ordered[0]);
        assert_eq!(draw.data.material_params[3], 1.0);
    }

    #[test]
    fn frame_data_skips_dark_point_lights() {
        let camera = Camera3D::from_config(&CameraConfig::default());
        let directional = [WorldDirectionalLight {
            direction: Vec3::new(0.0, -1.0, 0.0),
            light: DirectionalLight::new(0xffffff, 1.0),
        }];
        let points = [
            WorldPointLight { position: Vec3::ZERO, light: PointLight::new(0xffffff, 0.0, 1.0) },
            WorldPointLight { position: Vec3::new(0.0, 5.0, 2.0), light: PointLight::new(0xffffff, 0.6, 10.0) },
        ];
        let data = frame_data(&camera, Vec3::splat(0.5), &directional, &points);
        assert_eq!(data.light_counts[0], 1.0);
        assert_eq!(data.light_counts[1], 1.0);
        assert_eq!(data.point_light_pos[0], [0.0, 5.0, 2.0, 10.0]);
    }
}
