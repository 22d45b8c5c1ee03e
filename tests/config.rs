use kitchen_scene::config::{AppConfig, AppConfigOverrides, SteamPacing, DEFAULT_CONFIG_PATH};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::new().expect("temp config");
    temp.write_all(contents.as_bytes()).expect("write config");
    temp
}

#[test]
fn shipped_config_matches_defaults() {
    let shipped = AppConfig::load(DEFAULT_CONFIG_PATH).expect("shipped config parses");
    let defaults = AppConfig::default();
    assert_eq!(shipped.window.width, defaults.window.width);
    assert_eq!(shipped.window.height, defaults.window.height);
    assert_eq!(shipped.camera.position, defaults.camera.position);
    assert_eq!(shipped.camera.damping, defaults.camera.damping);
    assert_eq!(shipped.steam.particle_count, defaults.steam.particle_count);
    assert_eq!(shipped.steam.pacing, SteamPacing::FixedStep);
    assert_eq!(shipped.runtime.max_frame_delta, defaults.runtime.max_frame_delta);
    assert_eq!(shipped.input_bindings, defaults.input_bindings);
}

#[test]
fn missing_sections_take_defaults() {
    let temp = write_config(
        r#"{
            "window": {"title": "Test", "width": 640, "height": 480, "vsync": false, "fullscreen": false},
            "camera": {"fov_y_degrees": 45.0},
            "steam": {"pacing": "frame_delta", "seed": 7}
        }"#,
    );
    let config = AppConfig::load(temp.path()).expect("partial config parses");
    assert_eq!(config.window.width, 640);
    assert!(!config.window.vsync);
    assert_eq!(config.camera.fov_y_degrees, 45.0);
    assert_eq!(config.camera.min_distance, 2.0);
    assert_eq!(config.camera.max_distance, 10.0);
    assert_eq!(config.steam.pacing, SteamPacing::FrameDelta);
    assert_eq!(config.steam.seed, Some(7));
    assert_eq!(config.steam.particle_count, 40);
    assert_eq!(config.runtime.max_frame_delta, 0.25);
    assert_eq!(config.input_bindings, "config/input.json");
}

#[test]
fn unreadable_config_falls_back_to_defaults() {
    let broken = write_config("{ \"window\": ");
    assert!(AppConfig::load(broken.path()).is_err());
    let config = AppConfig::load_or_default(broken.path());
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.window.title, "Kitchen");

    let missing = AppConfig::load_or_default("does/not/exist.json");
    assert_eq!(missing.steam.particle_count, 40);
}

#[test]
fn overrides_replace_only_given_fields() {
    let mut config = AppConfig::default();
    let overrides = AppConfigOverrides { width: Some(800), steam_particles: Some(5), seed: Some(42), ..Default::default() };
    assert!(!overrides.is_empty());
    assert_eq!(overrides.applied_fields(), vec!["width", "steam_particles", "seed"]);
    config.apply_overrides(&overrides);
    assert_eq!(config.window.width, 800);
    assert_eq!(config.window.height, 720);
    assert!(config.window.vsync);
    assert_eq!(config.steam.particle_count, 5);
    assert_eq!(config.steam.seed, Some(42));
    assert!(AppConfigOverrides::default().is_empty());
}
