use crate::camera3d::{Camera3D, OrbitControls};
use crate::input::InputAction;
use crate::kitchen::Kitchen;
use glam::{Vec2, Vec3};
use winit::dpi::PhysicalSize;

/// Result of a pointer click after ray picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The refrigerator door was hit; `started` is false while the door is still moving.
    Refrigerator { started: bool },
    /// A stove knob was hit and its burner toggled to `active`.
    Burner { index: usize, active: bool },
    Miss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Continue,
    Quit,
}

/// Camera state the keyboard nudges act on.
pub struct CameraRig<'a> {
    pub camera: &'a mut Camera3D,
    pub controls: &'a mut OrbitControls,
    pub nudge_step: f32,
}

/// Applies one bound keyboard action to the kitchen or the camera.
pub fn dispatch_action(kitchen: &mut Kitchen, rig: CameraRig<'_>, action: InputAction, now_ms: f64) -> ActionOutcome {
    let step = rig.nudge_step;
    match action {
        InputAction::CameraForward => rig.controls.nudge(rig.camera, Vec3::new(0.0, 0.0, -step)),
        InputAction::CameraBackward => rig.controls.nudge(rig.camera, Vec3::new(0.0, 0.0, step)),
        InputAction::CameraLeft => rig.controls.nudge(rig.camera, Vec3::new(-step, 0.0, 0.0)),
        InputAction::CameraRight => rig.controls.nudge(rig.camera, Vec3::new(step, 0.0, 0.0)),
        InputAction::ToggleMicrowaveDoor => {
            let started = kitchen.toggle_microwave(now_ms);
            log::debug!("Microwave door toggle (started: {started})");
        }
        InputAction::ToggleCabinetDoors => {
            let started = kitchen.toggle_cabinet(now_ms);
            log::debug!("Cabinet doors toggle (started: {started})");
        }
        InputAction::ToggleMicrowaveLight => {
            kitchen.microwave_mut().toggle_light();
            log::debug!("Microwave light switch: {}", kitchen.microwave().light_switch());
        }
        InputAction::ToggleMicrowavePower => {
            kitchen.microwave_mut().toggle_power();
            log::debug!("Microwave running: {}", kitchen.microwave().is_running());
        }
        InputAction::ToggleOvenDoor => {
            let started = kitchen.toggle_oven(now_ms);
            log::debug!("Oven door toggle (started: {started})");
        }
        InputAction::SwingRefrigeratorDoor => {
            let started = kitchen.refrigerator_mut().swing_door(now_ms);
            log::debug!("Refrigerator door swing (started: {started})");
        }
        InputAction::Quit => return ActionOutcome::Quit,
    }
    ActionOutcome::Continue
}

/// Resolves a click at `screen` (physical pixels): the refrigerator door first, then the
/// stove knobs. The first hit wins.
pub fn dispatch_click(
    kitchen: &mut Kitchen,
    camera: &Camera3D,
    screen: Vec2,
    viewport: PhysicalSize<u32>,
    now_ms: f64,
) -> ClickOutcome {
    let Some((origin, dir)) = camera.screen_ray(screen, viewport) else {
        return ClickOutcome::Miss;
    };
    kitchen.scene_mut().propagate();

    let door = kitchen.models().refrigerator.door_pivot;
    if !kitchen.scene().raycast(origin, dir, &[door], true).is_empty() {
        let started = kitchen.refrigerator_mut().handle_click(now_ms);
        log::debug!("Click hit the refrigerator door (started: {started})");
        return ClickOutcome::Refrigerator { started };
    }

    let knobs = kitchen.knob_entities();
    let hits = kitchen.scene().raycast(origin, dir, &knobs, false);
    if let Some(index) = hits.first().and_then(|hit| knobs.iter().position(|&knob| knob == hit.entity)) {
        let active = kitchen.toggle_burner(index, now_ms);
        log::debug!("Click hit stove knob {index}; burner active: {active}");
        return ClickOutcome::Burner { index, active };
    }
    ClickOutcome::Miss
}
