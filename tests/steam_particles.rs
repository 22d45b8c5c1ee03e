use glam::Vec2;
use kitchen_scene::appliances::FrameUpdate;
use kitchen_scene::config::{SteamConfig, SteamPacing};
use kitchen_scene::steam::{SteamSystem, ANCHOR_JITTER, SPAWN_HEIGHT, START_OPACITY, STEAM_ANCHORS};
use kitchen_scene::time::FrameTime;

fn seeded(pacing: SteamPacing) -> SteamSystem {
    SteamSystem::new(&SteamConfig { particle_count: 12, pacing, nominal_step: 0.016, seed: Some(9) })
}

#[test]
fn pool_spawns_around_the_anchors() {
    let steam = seeded(SteamPacing::FixedStep);
    assert_eq!(steam.len(), 12);
    for particle in steam.particles() {
        assert!(STEAM_ANCHORS.contains(&particle.origin));
        assert!((particle.position.x - particle.origin.x).abs() <= ANCHOR_JITTER);
        assert!((particle.position.z - particle.origin.y).abs() <= ANCHOR_JITTER);
        assert!((0.0..SPAWN_HEIGHT).contains(&particle.position.y));
        assert_eq!(particle.life, 0.0);
        assert!((2.0..4.0).contains(&particle.max_life));
        assert_eq!(particle.opacity, START_OPACITY);
    }
}

#[test]
fn same_seed_gives_same_steam() {
    let mut a = seeded(SteamPacing::FixedStep);
    let mut b = seeded(SteamPacing::FixedStep);
    for frame in 1..30 {
        let time = FrameTime::new(frame as f64 * 16.0, 0.016);
        a.update(&time);
        b.update(&time);
    }
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn expired_particle_respawns_at_an_anchor() {
    let mut steam = seeded(SteamPacing::FixedStep);
    let particle = steam.particle_mut(3).expect("particle 3");
    particle.life = particle.max_life;
    particle.position.y = 5.0;
    particle.opacity = 0.0;

    steam.update(&FrameTime::new(16.0, 0.016));
    assert_eq!(steam.len(), 12, "pool size never changes");
    let particle = steam.particles()[3];
    assert_eq!(particle.life, 0.0);
    assert!(STEAM_ANCHORS.contains(&particle.origin));
    assert!(particle.position.y < SPAWN_HEIGHT + 0.02);
    assert!((particle.position.x - particle.origin.x).abs() < ANCHOR_JITTER + 0.01);
    assert!((particle.position.z - particle.origin.y).abs() < ANCHOR_JITTER + 0.01);
    assert_eq!(particle.opacity, START_OPACITY);
    assert_eq!(particle.scale, 1.0);
}

#[test]
fn particles_rise_grow_and_fade_late_in_life() {
    let mut steam = seeded(SteamPacing::FixedStep);
    let before = steam.particles()[0];
    let particle = steam.particle_mut(0).expect("particle 0");
    particle.life = particle.max_life * 0.85 - 0.016;

    steam.update(&FrameTime::new(16.0, 0.016));
    let after = steam.particles()[0];
    assert!((after.position.y - (before.position.y + before.speed)).abs() < 1e-5);
    assert!((after.scale - 2.7).abs() < 1e-3);
    assert!((after.opacity - START_OPACITY * 0.5).abs() < 1e-3);

    let young = steam.particles()[1];
    assert!(young.opacity == START_OPACITY, "fading starts at 70% of life");
}

#[test]
fn frame_delta_pacing_follows_measured_time() {
    let mut steam = seeded(SteamPacing::FrameDelta);
    let before = steam.particles()[0];
    steam.update(&FrameTime::new(50.0, 0.05));
    let after = steam.particles()[0];
    assert!((after.life - 0.05).abs() < 1e-6);
    // Rise speed is per nominal 60 Hz frame, so 50 ms covers three of them.
    assert!((after.position.y - (before.position.y + before.speed * 3.0)).abs() < 1e-5);
}

/// Horizontal distance from the anchor after one simulated second at `fps`.
fn spread_after_one_second(fps: u32) -> f32 {
    let mut steam =
        SteamSystem::new(&SteamConfig { particle_count: 1, pacing: SteamPacing::FrameDelta, nominal_step: 0.016, seed: Some(4) });
    let particle = steam.particle_mut(0).expect("particle 0");
    particle.max_life = 100.0;
    particle.life = 0.0;
    particle.position.x = particle.origin.x + 0.05;
    particle.position.z = particle.origin.y;

    let dt = 1.0 / fps as f32;
    for frame in 1..=fps {
        steam.update(&FrameTime::new(f64::from(frame) * 1_000.0 / f64::from(fps), dt));
    }
    let particle = steam.particles()[0];
    Vec2::new(particle.position.x - particle.origin.x, particle.position.z - particle.origin.y).length()
}

#[test]
fn frame_delta_spread_is_independent_of_frame_rate() {
    let slow = spread_after_one_second(30);
    let fast = spread_after_one_second(144);
    assert!(slow > 0.05, "steam spreads outward");
    assert!((slow - fast).abs() < 0.01, "30 fps {slow} vs 144 fps {fast}");
}
