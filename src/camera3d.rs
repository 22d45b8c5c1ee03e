use crate::config::CameraConfig;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::TAU;
use winit::dpi::PhysicalSize;

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, aspect: 1.0, near, far }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            Vec3::from_array(config.position),
            Vec3::from_array(config.target),
            config.fov_y_degrees.to_radians(),
            config.near,
            config.far,
        )
    }

    /// Recomputes the aspect ratio after a window resize.
    pub fn resize(&mut self, viewport: PhysicalSize<u32>) {
        if viewport.width > 0 && viewport.height > 0 {
            self.aspect = viewport.width as f32 / viewport.height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Maps a pixel position to normalized device coordinates (`[-1, 1]`, +Y up).
    pub fn ndc_from_screen(screen: Vec2, viewport: PhysicalSize<u32>) -> Option<Vec2> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let ndc_x = (2.0 * screen.x / viewport.width as f32) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.height as f32);
        Some(Vec2::new(ndc_x, ndc_y))
    }

    /// World-space ray from the camera through a point in normalized device coordinates.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<(Vec3, Vec3)> {
        let clip = Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let world = self.view_projection().inverse() * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = ((world.truncate() / world.w) - self.position).try_normalize()?;
        Some((self.position, dir))
    }

    pub fn screen_ray(&self, screen: Vec2, viewport: PhysicalSize<u32>) -> Option<(Vec3, Vec3)> {
        self.ray_from_ndc(Self::ndc_from_screen(screen, viewport)?)
    }

    pub fn project_point(&self, point: Vec3, viewport: PhysicalSize<u32>) -> Option<Vec2> {
        if viewport.width == 0 || viewport.height == 0 {
            return None;
        }
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;
        Some(Vec2::new(x, y))
    }
}

/// Spherical coordinates of the camera around the orbit target.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Spherical {
    radius: f32,
    /// Angle from +Y.
    polar: f32,
    /// Angle around +Y, measured from +Z.
    azimuth: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self { radius: 0.0, polar: 0.0, azimuth: 0.0 };
        }
        Self {
            radius,
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
        }
    }

    fn to_offset(self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        Vec3::new(sin_polar * sin_azimuth, cos_polar, sin_polar * cos_azimuth) * self.radius
    }
}

/// Mouse orbit/zoom around a target with distance and polar-angle limits.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping: f32,
    pending: Vec2,
}

impl OrbitControls {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            target: Vec3::from_array(config.target),
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
            min_polar: config.min_polar_degrees.to_radians(),
            max_polar: config.max_polar_degrees.to_radians().max(config.min_polar_degrees.to_radians()),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            damping: config.damping.clamp(0.0, 1.0),
            pending: Vec2::ZERO,
        }
    }

    /// Queues an orbit from a pointer drag of `delta` pixels; applied by [`OrbitControls::update`].
    pub fn rotate(&mut self, delta: Vec2, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.pending.x -= TAU * delta.x / height * self.rotate_speed;
        self.pending.y -= TAU * delta.y / height * self.rotate_speed;
    }

    /// Zooms by `steps` wheel notches; positive steps move closer.
    pub fn zoom(&mut self, camera: &mut Camera3D, steps: f32) {
        let mut spherical = Spherical::from_offset(camera.position - self.target);
        spherical.radius *= self.zoom_speed.powf(steps);
        self.apply(camera, spherical);
    }

    /// Moves the camera position directly, then re-applies the limits.
    pub fn nudge(&mut self, camera: &mut Camera3D, delta: Vec3) {
        camera.position += delta;
        self.constrain(camera);
    }

    /// Advances damped rotation; call once per frame.
    pub fn update(&mut self, camera: &mut Camera3D) {
        let factor = if self.damping > 0.0 { self.damping } else { 1.0 };
        let step = self.pending * factor;
        self.pending -= step;
        if self.pending.length_squared() < 1e-10 {
            self.pending = Vec2::ZERO;
        }
        let mut spherical = Spherical::from_offset(camera.position - self.target);
        spherical.azimuth += step.x;
        spherical.polar += step.y;
        self.apply(camera, spherical);
    }

    pub fn constrain(&self, camera: &mut Camera3D) {
        self.apply(camera, Spherical::from_offset(camera.position - self.target));
    }

    fn apply(&self, camera: &mut Camera3D, mut spherical: Spherical) {
        spherical.radius = spherical.radius.clamp(self.min_distance, self.max_distance);
        spherical.polar = spherical.polar.clamp(self.min_polar, self.max_polar);
        camera.position = self.target + spherical.to_offset();
        camera.target = self.target;
    }
}
