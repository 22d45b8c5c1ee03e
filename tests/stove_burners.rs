use kitchen_scene::appliances::stove::{KNOB_ON_ANGLE, OVEN_DOOR_OPEN_ANGLE};
use kitchen_scene::appliances::{Burner, FrameUpdate, Stove, BURNER_COUNT};
use kitchen_scene::time::FrameTime;

#[test]
fn burner_glow_ramps_up_and_down_at_fixed_rate() {
    let mut stove = Stove::new();
    assert!(stove.toggle_burner(2, 0.0));
    for _ in 0..3 {
        stove.update_burners(0.125);
    }
    assert_eq!(stove.burner(2).map(|b| b.intensity), Some(0.75));
    stove.update_burners(0.125);
    assert_eq!(stove.burner(2).map(|b| b.intensity), Some(1.0));
    stove.update_burners(0.125);
    assert_eq!(stove.burner(2).map(|b| b.intensity), Some(1.0), "glow saturates");

    assert!(!stove.toggle_burner(2, 100.0));
    for _ in 0..4 {
        stove.update_burners(0.125);
    }
    assert_eq!(stove.burner(2).map(|b| b.intensity), Some(0.0));
    assert!(stove.burners().iter().enumerate().all(|(i, b)| i == 2 || *b == Burner::default()));
}

#[test]
fn knob_turns_with_its_burner() {
    let mut stove = Stove::new();
    stove.toggle_burner(0, 0.0);
    stove.update(&FrameTime::new(150.0, 0.15));
    let halfway = stove.knob_angle(0).unwrap_or_default();
    assert!((halfway - KNOB_ON_ANGLE * 0.5).abs() < 1e-4);
    stove.update(&FrameTime::new(300.0, 0.15));
    assert_eq!(stove.knob_angle(0), Some(KNOB_ON_ANGLE));

    // Toggling mid-turn restarts the knob from where it stands.
    stove.toggle_burner(0, 400.0);
    stove.update(&FrameTime::new(450.0, 0.05));
    stove.toggle_burner(0, 450.0);
    assert_eq!(stove.burner(0).map(|b| b.active), Some(true));
    stove.update(&FrameTime::new(750.0, 0.3));
    assert_eq!(stove.knob_angle(0), Some(KNOB_ON_ANGLE));
}

#[test]
fn out_of_range_burner_is_rejected() {
    let mut stove = Stove::new();
    assert!(!stove.toggle_burner(BURNER_COUNT, 0.0));
    assert!(stove.burner(BURNER_COUNT).is_none());
    assert!(stove.knob_angle(BURNER_COUNT).is_none());
    assert!(stove.burners().iter().all(|b| !b.active));
}

#[test]
fn oven_door_toggle_opens_then_closes() {
    let mut stove = Stove::new();
    assert!(stove.toggle_oven_door(0.0));
    assert!(!stove.toggle_oven_door(100.0), "busy door ignores toggles");
    stove.update(&FrameTime::new(500.0, 0.5));
    assert_eq!(stove.oven_door_angle(), OVEN_DOOR_OPEN_ANGLE);
    assert!(stove.toggle_oven_door(600.0));
    stove.update(&FrameTime::new(1_100.0, 0.5));
    assert_eq!(stove.oven_door_angle(), 0.0);
    assert!(!stove.is_oven_door_animating());
}

#[test]
fn glow_colour_tracks_intensity() {
    let mut stove = Stove::new();
    stove.toggle_burner(1, 0.0);
    stove.update_burners(1.0);
    let burner = stove.burner(1).copied().unwrap_or_default();
    let color = burner.emissive_color();
    assert_eq!(color.x, 1.0);
    assert!((color.y - 100.0 / 255.0).abs() < 1e-6);
    assert_eq!(color.z, 0.0);
    assert_eq!(burner.emissive_intensity(), 2.0);
}
