use glam::Vec2;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

/// Pointer travel (pixels) beyond which a press becomes a drag instead of a click.
pub const CLICK_SLOP: f32 = 4.0;
const PIXELS_PER_WHEEL_LINE: f32 = 40.0;

/// Collects window events into bound actions, clicks, drags and wheel steps.
pub struct Input {
    bindings: InputBindings,
    actions: Vec<InputAction>,
    cursor_pos: Option<Vec2>,
    press_origin: Option<Vec2>,
    dragging: bool,
    drag_delta: Vec2,
    click: Option<Vec2>,
    wheel: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        let bindings = InputBindings::load_or_default(path);
        Self::with_bindings(bindings)
    }

    fn with_bindings(bindings: InputBindings) -> Self {
        Self {
            bindings,
            actions: Vec::new(),
            cursor_pos: None,
            press_origin: None,
            dragging: false,
            drag_delta: Vec2::ZERO,
            click: None,
            wheel: 0.0,
        }
    }

    pub fn push(&mut self, ev: InputEvent) {
        match ev {
            InputEvent::Key { key, pressed } => {
                if pressed {
                    self.apply_key_binding(&key);
                }
            }
            InputEvent::Wheel { delta } => {
                self.wheel += delta;
            }
            InputEvent::MouseButton { button: MouseButton::Left, pressed } => {
                if pressed {
                    self.press_origin = self.cursor_pos;
                    self.dragging = false;
                } else {
                    if !self.dragging {
                        self.click = self.cursor_pos;
                    }
                    self.press_origin = None;
                    self.dragging = false;
                }
            }
            InputEvent::MouseButton { .. } => {}
            InputEvent::CursorPos { x, y } => {
                let position = Vec2::new(x, y);
                if let (Some(origin), Some(previous)) = (self.press_origin, self.cursor_pos) {
                    if !self.dragging && position.distance(origin) > CLICK_SLOP {
                        self.dragging = true;
                        self.drag_delta += position - origin;
                    } else if self.dragging {
                        self.drag_delta += position - previous;
                    }
                }
                self.cursor_pos = Some(position);
            }
            InputEvent::Other => {}
        }
    }

    /// Actions triggered since the last call, in arrival order.
    pub fn take_actions(&mut self) -> Vec<InputAction> {
        std::mem::take(&mut self.actions)
    }

    /// Position of a completed click (press and release without dragging).
    pub fn take_click(&mut self) -> Option<Vec2> {
        self.click.take()
    }

    pub fn take_drag_delta(&mut self) -> Option<Vec2> {
        if self.drag_delta == Vec2::ZERO {
            return None;
        }
        Some(std::mem::take(&mut self.drag_delta))
    }

    pub fn consume_wheel_delta(&mut self) -> Option<f32> {
        if self.wheel.abs() > 0.0 {
            let d = self.wheel;
            self.wheel = 0.0;
            Some(d)
        } else {
            None
        }
    }

    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor_pos
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn apply_key_binding(&mut self, key: &Key) {
        if let Some(binding_key) = InputKeyBinding::from_event_key(key) {
            self.actions.extend(self.bindings.actions_for_key(&binding_key));
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::with_bindings(InputBindings::default())
    }
}

#[derive(Debug, Clone)]
struct InputBindings {
    key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>>,
}

impl InputBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<InputConfigFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    log::warn!("Failed to parse {}: {err}. Falling back to default bindings.", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Failed to read {}: {err}. Falling back to default bindings.", path.display());
                Self::default()
            }
        }
    }

    fn from_config(config: InputConfigFile, origin: &str) -> Self {
        let overrides = config.into_overrides(origin);
        Self::with_overrides(overrides)
    }

    fn with_overrides(overrides: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut action_map = Self::default_action_map();
        for (action, keys) in overrides {
            if keys.is_empty() {
                continue;
            }
            action_map.insert(action, keys);
        }
        Self::from_action_map(action_map)
    }

    fn default_action_map() -> HashMap<InputAction, Vec<InputKeyBinding>> {
        use InputAction::*;
        let mut map = HashMap::new();
        map.insert(CameraForward, vec![InputKeyBinding::named(NamedKeyCode::ArrowUp)]);
        map.insert(CameraBackward, vec![InputKeyBinding::named(NamedKeyCode::ArrowDown)]);
        map.insert(CameraLeft, vec![InputKeyBinding::named(NamedKeyCode::ArrowLeft)]);
        map.insert(CameraRight, vec![InputKeyBinding::named(NamedKeyCode::ArrowRight)]);
        map.insert(ToggleMicrowaveDoor, vec![InputKeyBinding::named(NamedKeyCode::Space)]);
        map.insert(ToggleCabinetDoors, vec![InputKeyBinding::character("c")]);
        map.insert(ToggleMicrowaveLight, vec![InputKeyBinding::character("o")]);
        map.insert(ToggleMicrowavePower, vec![InputKeyBinding::character("m")]);
        map.insert(ToggleOvenDoor, vec![InputKeyBinding::character("v")]);
        map.insert(SwingRefrigeratorDoor, vec![InputKeyBinding::character("f")]);
        map.insert(Quit, vec![InputKeyBinding::named(NamedKeyCode::Escape)]);
        map
    }

    fn from_action_map(action_map: HashMap<InputAction, Vec<InputKeyBinding>>) -> Self {
        let mut key_to_actions: HashMap<InputKeyBinding, Vec<InputAction>> = HashMap::new();
        for (action, keys) in action_map {
            for key in keys {
                key_to_actions.entry(key).or_default().push(action);
            }
        }
        Self { key_to_actions }
    }

    fn actions_for_key(&self, key: &InputKeyBinding) -> impl Iterator<Item = InputAction> + '_ {
        self.key_to_actions.get(key).into_iter().flatten().copied()
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self::from_action_map(Self::default_action_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum InputKeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl InputKeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Some(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Some(Self::Character(normalized));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    Space,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::Space => Some(Self::Space),
            NamedKey::Escape => Some(Self::Escape),
            NamedKey::ArrowUp => Some(Self::ArrowUp),
            NamedKey::ArrowDown => Some(Self::ArrowDown),
            NamedKey::ArrowLeft => Some(Self::ArrowLeft),
            NamedKey::ArrowRight => Some(Self::ArrowRight),
            _ => None,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "escape" | "esc" => Some(Self::Escape),
            "arrow_up" | "up" => Some(Self::ArrowUp),
            "arrow_down" | "down" => Some(Self::ArrowDown),
            "arrow_left" | "left" => Some(Self::ArrowLeft),
            "arrow_right" | "right" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    CameraForward,
    CameraBackward,
    CameraLeft,
    CameraRight,
    ToggleMicrowaveDoor,
    ToggleCabinetDoors,
    ToggleMicrowaveLight,
    ToggleMicrowavePower,
    ToggleOvenDoor,
    SwingRefrigeratorDoor,
    Quit,
}

impl InputAction {
    fn from_str(value: &str) -> Option<Self> {
        match value {
            "camera_forward" => Some(Self::CameraForward),
            "camera_backward" => Some(Self::CameraBackward),
            "camera_left" => Some(Self::CameraLeft),
            "camera_right" => Some(Self::CameraRight),
            "toggle_microwave_door" => Some(Self::ToggleMicrowaveDoor),
            "toggle_cabinet_doors" => Some(Self::ToggleCabinetDoors),
            "toggle_microwave_light" => Some(Self::ToggleMicrowaveLight),
            "toggle_microwave_power" => Some(Self::ToggleMicrowavePower),
            "toggle_oven_door" => Some(Self::ToggleOvenDoor),
            "swing_refrigerator_door" => Some(Self::SwingRefrigeratorDoor),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputConfigFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl InputConfigFile {
    fn into_overrides(self, origin: &str) -> HashMap<InputAction, Vec<InputKeyBinding>> {
        let mut overrides = HashMap::new();
        for (action_name, keys) in self.bindings {
            let action_key = action_name.trim().to_lowercase();
            let Some(action) = InputAction::from_str(&action_key) else {
                log::warn!("{origin}: unknown action '{action_name}', ignoring.");
                continue;
            };
            let mut parsed = Vec::new();
            for key in keys {
                match InputKeyBinding::from_config_value(&key) {
                    Some(binding) => parsed.push(binding),
                    None => log::warn!("{origin}: unknown key '{key}' for action '{action_name}', ignoring."),
                }
            }
            if parsed.is_empty() {
                log::warn!("{origin}: action '{action_name}' has no valid keys, keeping defaults.");
                continue;
            }
            overrides.insert(action, parsed);
        }
        overrides
    }
}

pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Wheel { delta: f32 },
    MouseButton { button: MouseButton, pressed: bool },
    CursorPos { x: f32, y: f32 },
    Other,
}

impl InputEvent {
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_WHEEL_LINE,
                };
                InputEvent::Wheel { delta: d }
            }
            WindowEvent::CursorMoved { position, .. } => {
                InputEvent::CursorPos { x: position.x as f32, y: position.y as f32 }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                InputEvent::MouseButton { button: *button, pressed: *state == ElementState::Pressed }
            }
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            _ => InputEvent::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left(pressed: bool) -> InputEvent {
        InputEvent::MouseButton { button: MouseButton::Left, pressed }
    }

    #[test]
    fn press_and_release_in_place_is_a_click() {
        let mut input = Input::new();
        input.push(InputEvent::CursorPos { x: 100.0, y: 50.0 });
        input.push(left(true));
        input.push(InputEvent::CursorPos { x: 101.0, y: 51.0 });
        input.push(left(false));
        assert_eq!(input.take_click(), Some(Vec2::new(101.0, 51.0)));
        assert_eq!(input.take_click(), None);
        assert_eq!(input.take_drag_delta(), None);
    }

    #[test]
    fn dragging_suppresses_click_and_accumulates_delta() {
        let mut input = Input::new();
        input.push(InputEvent::CursorPos { x: 100.0, y: 100.0 });
        input.push(left(true));
        input.push(InputEvent::CursorPos { x: 110.0, y: 100.0 });
        input.push(InputEvent::CursorPos { x: 130.0, y: 95.0 });
        assert!(input.is_dragging());
        input.push(left(false));
        assert_eq!(input.take_click(), None);
        assert_eq!(input.take_drag_delta(), Some(Vec2::new(30.0, -5.0)));
    }

    #[test]
    fn key_release_does_not_trigger_actions() {
        let mut input = Input::new();
        input.push(InputEvent::Key { key: Key::Character("c".into()), pressed: false });
        assert!(input.take_actions().is_empty());
        input.push(InputEvent::Key { key: Key::Character("C".into()), pressed: true });
        assert_eq!(input.take_actions(), vec![InputAction::ToggleCabinetDoors]);
    }

    #[test]
    fn wheel_accumulates_until_consumed() {
        let mut input = Input::new();
        input.push(InputEvent::Wheel { delta: 1.0 });
        input.push(InputEvent::Wheel { delta: 0.5 });
        assert_eq!(input.consume_wheel_delta(), Some(1.5));
        assert_eq!(input.consume_wheel_delta(), None);
    }
}
