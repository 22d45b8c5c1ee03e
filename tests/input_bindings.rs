use kitchen_scene::input::{Input, InputAction, InputEvent};
use std::io::Write;
use tempfile::NamedTempFile;
use winit::keyboard::{Key, NamedKey};

fn press(input: &mut Input, key: Key) -> Vec<InputAction> {
    input.push(InputEvent::Key { key, pressed: true });
    input.take_actions()
}

#[test]
fn default_table_covers_kitchen_keys() {
    let mut input = Input::new();
    assert_eq!(press(&mut input, Key::Named(NamedKey::Space)), vec![InputAction::ToggleMicrowaveDoor]);
    assert_eq!(press(&mut input, Key::Character("c".into())), vec![InputAction::ToggleCabinetDoors]);
    assert_eq!(press(&mut input, Key::Character("O".into())), vec![InputAction::ToggleMicrowaveLight]);
    assert_eq!(press(&mut input, Key::Character("m".into())), vec![InputAction::ToggleMicrowavePower]);
    assert_eq!(press(&mut input, Key::Character("V".into())), vec![InputAction::ToggleOvenDoor]);
    assert_eq!(press(&mut input, Key::Character("f".into())), vec![InputAction::SwingRefrigeratorDoor]);
    assert_eq!(press(&mut input, Key::Named(NamedKey::ArrowUp)), vec![InputAction::CameraForward]);
    assert_eq!(press(&mut input, Key::Named(NamedKey::ArrowLeft)), vec![InputAction::CameraLeft]);
    assert_eq!(press(&mut input, Key::Named(NamedKey::Escape)), vec![InputAction::Quit]);
    assert!(press(&mut input, Key::Character("z".into())).is_empty());
}

#[test]
fn remapped_controls_override_defaults() {
    let mut temp = NamedTempFile::new().expect("temp input config");
    write!(temp, r#"{{"bindings":{{"toggle_microwave_door":["k"],"toggle_oven_door":["g","up"]}}}}"#)
        .expect("write remap config");

    let mut input = Input::from_config(temp.path());
    assert!(input.take_actions().is_empty(), "no events yet");

    assert_eq!(press(&mut input, Key::Character("k".into())), vec![InputAction::ToggleMicrowaveDoor]);
    assert!(
        press(&mut input, Key::Named(NamedKey::Space)).is_empty(),
        "default key should no longer fire when remapped"
    );
    assert_eq!(press(&mut input, Key::Character("g".into())), vec![InputAction::ToggleOvenDoor]);
    assert!(press(&mut input, Key::Character("v".into())).is_empty(), "default binding is dropped after remapping");

    let shared = press(&mut input, Key::Named(NamedKey::ArrowUp));
    assert_eq!(shared.len(), 2, "a key may drive several actions");
    assert!(shared.contains(&InputAction::ToggleOvenDoor));
    assert!(shared.contains(&InputAction::CameraForward));

    assert_eq!(press(&mut input, Key::Character("c".into())), vec![InputAction::ToggleCabinetDoors]);
}

#[test]
fn unknown_entries_and_bad_files_fall_back_to_defaults() {
    let mut temp = NamedTempFile::new().expect("temp input config");
    write!(temp, r#"{{"bindings":{{"launch_rocket":["r"],"toggle_cabinet_doors":["not-a-key"]}}}}"#)
        .expect("write config");
    let mut input = Input::from_config(temp.path());
    assert!(press(&mut input, Key::Character("r".into())).is_empty());
    assert_eq!(press(&mut input, Key::Character("c".into())), vec![InputAction::ToggleCabinetDoors]);

    let mut broken = NamedTempFile::new().expect("temp input config");
    write!(broken, "{{ not json").expect("write config");
    let mut input = Input::from_config(broken.path());
    assert_eq!(press(&mut input, Key::Character("m".into())), vec![InputAction::ToggleMicrowavePower]);
}
