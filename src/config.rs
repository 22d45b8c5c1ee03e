use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.json";

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fullscreen: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_fov_y_degrees")]
    pub fov_y_degrees: f32,
    #[serde(default = "CameraConfig::default_near")]
    pub near: f32,
    #[serde(default = "CameraConfig::default_far")]
    pub far: f32,
    #[serde(default = "CameraConfig::default_position")]
    pub position: [f32; 3],
    #[serde(default = "CameraConfig::default_target")]
    pub target: [f32; 3],
    #[serde(default = "CameraConfig::default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "CameraConfig::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "CameraConfig::default_min_polar_degrees")]
    pub min_polar_degrees: f32,
    #[serde(default = "CameraConfig::default_max_polar_degrees")]
    pub max_polar_degrees: f32,
    /// Distance the arrow keys move the camera.
    #[serde(default = "CameraConfig::default_nudge_step")]
    pub nudge_step: f32,
    #[serde(default = "CameraConfig::default_rotate_speed")]
    pub rotate_speed: f32,
    /// Distance multiplier per wheel notch.
    #[serde(default = "CameraConfig::default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default = "CameraConfig::default_damping")]
    pub damping: f32,
}

/// How steam particle life advances each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SteamPacing {
    /// A constant nominal step per rendered frame.
    #[default]
    FixedStep,
    /// The measured frame delta.
    FrameDelta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamConfig {
    #[serde(default = "SteamConfig::default_particle_count")]
    pub particle_count: usize,
    #[serde(default)]
    pub pacing: SteamPacing,
    #[serde(default = "SteamConfig::default_nominal_step")]
    pub nominal_step: f32,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Frame deltas above this many seconds are clamped.
    #[serde(default = "RuntimeConfig::default_max_frame_delta")]
    pub max_frame_delta: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub steam: SteamConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default = "AppConfig::default_input_bindings")]
    pub input_bindings: String,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfigOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub vsync: Option<bool>,
    pub steam_particles: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { title: "Kitchen".to_string(), width: 1280, height: 720, vsync: true, fullscreen: false }
    }
}

impl CameraConfig {
    const fn default_fov_y_degrees() -> f32 {
        60.0
    }

    const fn default_near() -> f32 {
        0.1
    }

    const fn default_far() -> f32 {
        1000.0
    }

    const fn default_position() -> [f32; 3] {
        [0.0, 2.0, 5.0]
    }

    const fn default_target() -> [f32; 3] {
        [0.0, 1.0, 0.0]
    }

    const fn default_min_distance() -> f32 {
        2.0
    }

    const fn default_max_distance() -> f32 {
        10.0
    }

    const fn default_min_polar_degrees() -> f32 {
        30.0
    }

    const fn default_max_polar_degrees() -> f32 {
        120.0
    }

    const fn default_nudge_step() -> f32 {
        0.5
    }

    const fn default_rotate_speed() -> f32 {
        1.0
    }

    const fn default_zoom_speed() -> f32 {
        0.95
    }

    const fn default_damping() -> f32 {
        0.05
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: Self::default_fov_y_degrees(),
            near: Self::default_near(),
            far: Self::default_far(),
            position: Self::default_position(),
            target: Self::default_target(),
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            min_polar_degrees: Self::default_min_polar_degrees(),
            max_polar_degrees: Self::default_max_polar_degrees(),
            nudge_step: Self::default_nudge_step(),
            rotate_speed: Self::default_rotate_speed(),
            zoom_speed: Self::default_zoom_speed(),
            damping: Self::default_damping(),
        }
    }
}

impl SteamConfig {
    const fn default_particle_count() -> usize {
        40
    }

    const fn default_nominal_step() -> f32 {
        0.016
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            particle_count: Self::default_particle_count(),
            pacing: SteamPacing::default(),
            nominal_step: Self::default_nominal_step(),
            seed: None,
        }
    }
}

impl RuntimeConfig {
    const fn default_max_frame_delta() -> f32 {
        0.25
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_frame_delta: Self::default_max_frame_delta() }
    }
}

impl AppConfig {
    fn default_input_bindings() -> String {
        "config/input.json".to_string()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("Config load error: {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(width) = overrides.width {
            self.window.width = width;
        }
        if let Some(height) = overrides.height {
            self.window.height = height;
        }
        if let Some(vsync) = overrides.vsync {
            self.window.vsync = vsync;
        }
        if let Some(count) = overrides.steam_particles {
            self.steam.particle_count = count;
        }
        if let Some(seed) = overrides.seed {
            self.steam.seed = Some(seed);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            steam: SteamConfig::default(),
            runtime: RuntimeConfig::default(),
            input_bindings: Self::default_input_bindings(),
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.applied_fields().is_empty()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.width.is_some() {
            fields.push("width");
        }
        if self.height.is_some() {
            fields.push("height");
        }
        if self.vsync.is_some() {
            fields.push("vsync");
        }
        if self.steam_particles.is_some() {
            fields.push("steam_particles");
        }
        if self.seed.is_some() {
            fields.push("seed");
        }
        fields
    }
}
