use kitchen_scene::appliances::microwave::{DOOR_OPEN_ANGLE, PLATE_SPEED};
use kitchen_scene::appliances::{FrameUpdate, Microwave};
use kitchen_scene::time::FrameTime;

fn step(microwave: &mut Microwave, now_ms: f64) {
    microwave.update(&FrameTime::new(now_ms, 0.016));
}

#[test]
fn opening_turns_light_on_when_door_arrives() {
    let mut microwave = Microwave::new();
    assert!(microwave.open_door(0.0));
    step(&mut microwave, 250.0);
    assert!(microwave.is_animating());
    assert_eq!(microwave.light_intensity(), 0.0, "light waits for the door");
    step(&mut microwave, 500.0);
    assert!(!microwave.is_animating());
    assert_eq!(microwave.door_angle(), DOOR_OPEN_ANGLE);
    assert_eq!(microwave.light_intensity(), 1.0);
}

#[test]
fn second_open_while_moving_is_dropped() {
    let mut microwave = Microwave::new();
    assert!(microwave.open_door(0.0));
    assert!(!microwave.open_door(10.0));
    assert!(!microwave.close_door(20.0));
    step(&mut microwave, 500.0);
    assert_eq!(microwave.door_angle(), DOOR_OPEN_ANGLE);
}

#[test]
fn running_keeps_light_on_through_door_close() {
    let mut microwave = Microwave::new();
    microwave.open_door(0.0);
    step(&mut microwave, 500.0);
    microwave.start();
    assert!(microwave.close_door(600.0));
    step(&mut microwave, 1_100.0);
    assert_eq!(microwave.door_angle(), 0.0);
    assert!(microwave.is_running());
    assert_eq!(microwave.light_intensity(), 1.0, "running overrides the close-door auto-off");

    microwave.stop();
    assert_eq!(microwave.light_intensity(), 0.0, "stopping with the door closed turns the light off");
}

#[test]
fn stop_with_door_open_leaves_switch_on() {
    let mut microwave = Microwave::new();
    microwave.open_door(0.0);
    step(&mut microwave, 500.0);
    microwave.start();
    microwave.stop();
    assert!(microwave.light_switch());
    assert_eq!(microwave.light_intensity(), 1.0);
}

#[test]
fn pressing_power_twice_leaves_microwave_off_and_dark() {
    let mut microwave = Microwave::new();
    microwave.toggle_power();
    assert!(microwave.is_running());
    assert_eq!(microwave.light_intensity(), 1.0);
    microwave.toggle_power();
    assert!(!microwave.is_running());
    assert_eq!(microwave.light_intensity(), 0.0);
}

#[test]
fn toggle_uses_closed_epsilon() {
    let mut microwave = Microwave::new();
    assert!(microwave.toggle_door(0.0));
    step(&mut microwave, 500.0);
    assert!(microwave.toggle_door(600.0));
    step(&mut microwave, 1_100.0);
    assert_eq!(microwave.door_angle(), 0.0);
    assert_eq!(microwave.light_intensity(), 0.0);
}

#[test]
fn plate_turns_only_while_running() {
    let mut microwave = Microwave::new();
    microwave.update(&FrameTime::new(16.0, 0.5));
    assert_eq!(microwave.plate_angle(), 0.0);
    microwave.start();
    microwave.update(&FrameTime::new(32.0, 0.5));
    microwave.update(&FrameTime::new(48.0, 0.25));
    assert!((microwave.plate_angle() - 0.75 * PLATE_SPEED).abs() < 1e-6);
}
