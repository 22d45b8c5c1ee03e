use glam::{Vec2, Vec3};
use kitchen_scene::camera3d::{Camera3D, OrbitControls};
use kitchen_scene::config::{CameraConfig, SteamConfig};
use kitchen_scene::dispatch::{dispatch_action, dispatch_click, ActionOutcome, CameraRig, ClickOutcome};
use kitchen_scene::input::{Input, InputAction, InputEvent};
use kitchen_scene::time::FrameTime;
use kitchen_scene::Kitchen;
use winit::dpi::PhysicalSize;
use winit::event::MouseButton;

const VIEWPORT: PhysicalSize<u32> = PhysicalSize::new(1280, 720);

fn setup() -> (Kitchen, Camera3D, OrbitControls) {
    let config = CameraConfig::default();
    let kitchen = Kitchen::new(&SteamConfig { particle_count: 4, seed: Some(1), ..SteamConfig::default() });
    let mut camera = Camera3D::from_config(&config);
    camera.resize(VIEWPORT);
    (kitchen, camera, OrbitControls::from_config(&config))
}

fn on_screen(kitchen: &Kitchen, camera: &Camera3D, entity: bevy_ecs::entity::Entity) -> Vec2 {
    let world = kitchen.scene().world_transform(entity).expect("propagated node");
    camera.project_point(world.transform_point3(Vec3::ZERO), VIEWPORT).expect("point in front of camera")
}

fn click_through_input(input: &mut Input, at: Vec2) -> Option<Vec2> {
    input.push(InputEvent::CursorPos { x: at.x, y: at.y });
    input.push(InputEvent::MouseButton { button: MouseButton::Left, pressed: true });
    input.push(InputEvent::MouseButton { button: MouseButton::Left, pressed: false });
    input.take_click()
}

#[test]
fn clicking_a_knob_toggles_its_burner() {
    let (mut kitchen, camera, _) = setup();
    let knobs = kitchen.knob_entities();
    for (index, &knob) in knobs.iter().enumerate() {
        let screen = on_screen(&kitchen, &camera, knob);
        let outcome = dispatch_click(&mut kitchen, &camera, screen, VIEWPORT, 0.0);
        assert_eq!(outcome, ClickOutcome::Burner { index, active: true });
    }
    assert!(kitchen.stove().burners().iter().all(|burner| burner.active));

    let screen = on_screen(&kitchen, &camera, knobs[1]);
    assert_eq!(
        dispatch_click(&mut kitchen, &camera, screen, VIEWPORT, 10.0),
        ClickOutcome::Burner { index: 1, active: false }
    );
}

#[test]
fn clicking_the_refrigerator_door_starts_the_swing() {
    let (mut kitchen, camera, _) = setup();
    let door_panel = kitchen.scene().subtree(kitchen.models().refrigerator.door_pivot)[1];
    let screen = on_screen(&kitchen, &camera, door_panel);

    let mut input = Input::new();
    let click = click_through_input(&mut input, screen).expect("press and release in place is a click");
    assert_eq!(
        dispatch_click(&mut kitchen, &camera, click, VIEWPORT, 0.0),
        ClickOutcome::Refrigerator { started: true }
    );
    assert!(kitchen.refrigerator().is_animating());
    assert_eq!(
        dispatch_click(&mut kitchen, &camera, click, VIEWPORT, 5.0),
        ClickOutcome::Refrigerator { started: false }
    );

    for frame in 1..=20 {
        kitchen.update(&FrameTime::new(frame as f64 * 16.0, 0.016), camera.position);
    }
    assert!(kitchen.refrigerator().is_open());
    let light = kitchen.models().refrigerator.light;
    assert_eq!(kitchen.scene().light_intensity(light), Some(1.0));
}

#[test]
fn clicking_empty_space_changes_nothing() {
    let (mut kitchen, camera, _) = setup();
    assert_eq!(dispatch_click(&mut kitchen, &camera, Vec2::new(5.0, 5.0), VIEWPORT, 0.0), ClickOutcome::Miss);
    assert_eq!(
        dispatch_click(&mut kitchen, &camera, Vec2::new(10.0, 10.0), PhysicalSize::new(0, 0), 0.0),
        ClickOutcome::Miss
    );
    assert!(kitchen.stove().burners().iter().all(|burner| !burner.active));
    assert!(!kitchen.refrigerator().is_animating());
}

#[test]
fn keyboard_actions_drive_appliances_and_camera() {
    let (mut kitchen, mut camera, mut controls) = setup();
    let mut act = |kitchen: &mut Kitchen, camera: &mut Camera3D, action: InputAction| {
        let rig = CameraRig { camera, controls: &mut controls, nudge_step: 0.5 };
        dispatch_action(kitchen, rig, action, 0.0)
    };

    assert_eq!(act(&mut kitchen, &mut camera, InputAction::ToggleCabinetDoors), ActionOutcome::Continue);
    assert!(kitchen.cabinet().is_animating());
    act(&mut kitchen, &mut camera, InputAction::ToggleMicrowaveDoor);
    assert!(kitchen.microwave().is_animating());
    act(&mut kitchen, &mut camera, InputAction::ToggleOvenDoor);
    assert!(kitchen.stove().is_oven_door_animating());
    act(&mut kitchen, &mut camera, InputAction::SwingRefrigeratorDoor);
    assert!(kitchen.refrigerator().is_animating());

    act(&mut kitchen, &mut camera, InputAction::ToggleMicrowavePower);
    act(&mut kitchen, &mut camera, InputAction::ToggleMicrowavePower);
    assert!(!kitchen.microwave().is_running());
    act(&mut kitchen, &mut camera, InputAction::ToggleMicrowaveLight);
    assert!(kitchen.microwave().light_switch());

    let before = camera.position;
    act(&mut kitchen, &mut camera, InputAction::CameraForward);
    assert!((camera.position - (before - Vec3::new(0.0, 0.0, 0.5))).length() < 1e-4);
    act(&mut kitchen, &mut camera, InputAction::CameraRight);
    assert!((camera.position.x - 0.5).abs() < 1e-4);

    assert_eq!(act(&mut kitchen, &mut camera, InputAction::Quit), ActionOutcome::Quit);
}

#[test]
fn scripted_toggles_reach_the_scene_graph() {
    let (mut kitchen, camera, _) = setup();
    kitchen.toggle_refrigerator();
    kitchen.start_microwave();
    assert!(!kitchen.toggle_burner(7, 0.0));
    kitchen.update(&FrameTime::new(16.0, 0.016), camera.position);

    let models = kitchen.models();
    assert_eq!(kitchen.scene().light_intensity(models.refrigerator.light), Some(1.0));
    assert_eq!(kitchen.scene().light_intensity(models.microwave.light), Some(1.0));

    kitchen.stop_microwave();
    kitchen.toggle_refrigerator();
    kitchen.sync_scene(camera.position);
    let models = kitchen.models();
    assert_eq!(kitchen.scene().light_intensity(models.refrigerator.light), Some(0.0));
    assert_eq!(kitchen.scene().light_intensity(models.microwave.light), Some(0.0));
}
