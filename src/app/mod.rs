mod runtime_loop;

use crate::camera3d::{Camera3D, OrbitControls};
use crate::config::{AppConfig, AppConfigOverrides};
use crate::dispatch::{dispatch_action, dispatch_click, ActionOutcome, CameraRig};
use crate::input::{Input, InputEvent};
use crate::kitchen::Kitchen;
use crate::renderer::Renderer;
use crate::time::Time;
use runtime_loop::RuntimeLoop;

use anyhow::{Context, Result};
use std::path::Path;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};

const CONTROLS_HELP: &str = "Controls: click the refrigerator door or a stove knob; drag to orbit; wheel to zoom; \
arrow keys move the camera; Space microwave door; C cabinet doors; O microwave light; M microwave start/stop; \
V oven door; F refrigerator door; Esc quit";

pub async fn run(config_path: impl AsRef<Path>) -> Result<()> {
    run_with_overrides(config_path, AppConfigOverrides::default()).await
}

pub async fn run_with_overrides(config_path: impl AsRef<Path>, overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default(config_path);
    if !overrides.is_empty() {
        log::info!("Applying command line overrides: {}", overrides.applied_fields().join(", "));
    }
    config.apply_overrides(&overrides);
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    renderer: Renderer,
    kitchen: Kitchen,
    camera: Camera3D,
    controls: OrbitControls,
    nudge_step: f32,
    input: Input,
    runtime: RuntimeLoop,
    should_close: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let input = Input::from_config(&config.input_bindings);
        let mut camera = Camera3D::from_config(&config.camera);
        let controls = OrbitControls::from_config(&config.camera);
        controls.constrain(&mut camera);
        log::info!("{CONTROLS_HELP}");
        Self {
            renderer: Renderer::new(&config.window),
            kitchen: Kitchen::new(&config.steam),
            camera,
            controls,
            nudge_step: config.camera.nudge_step,
            input,
            runtime: RuntimeLoop::new(Time::new(), config.runtime.max_frame_delta),
            should_close: false,
        }
    }

    /// Handles everything the last event produced before returning to the event loop.
    fn dispatch_input(&mut self) {
        let now_ms = self.runtime.time().now_ms();
        for action in self.input.take_actions() {
            let rig = CameraRig { camera: &mut self.camera, controls: &mut self.controls, nudge_step: self.nudge_step };
            if dispatch_action(&mut self.kitchen, rig, action, now_ms) == ActionOutcome::Quit {
                self.should_close = true;
            }
        }
        if let Some(screen) = self.input.take_click() {
            let outcome = dispatch_click(&mut self.kitchen, &self.camera, screen, self.renderer.size(), now_ms);
            log::debug!("Click at ({:.0}, {:.0}): {outcome:?}", screen.x, screen.y);
        }
        if let Some(delta) = self.input.take_drag_delta() {
            self.controls.rotate(delta, self.renderer.size().height);
        }
        if let Some(steps) = self.input.consume_wheel_delta() {
            self.controls.zoom(&mut self.camera, steps);
        }
    }

    fn redraw(&mut self) {
        let tick = self.runtime.tick();
        if let Some(dropped) = tick.dropped_delta {
            log::debug!("Frame delta clamped; dropped {dropped:.3}s");
        }
        self.controls.update(&mut self.camera);
        self.kitchen.update(&tick.frame, self.camera.position);
        if let Err(err) = self.renderer.render_scene(self.kitchen.scene_mut(), &self.camera) {
            log::error!("Render error: {err:?}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Err(err) = self.renderer.ensure_window(event_loop) {
            log::error!("Renderer initialization error: {err:?}");
            self.should_close = true;
            event_loop.exit();
            return;
        }
        self.camera.resize(self.renderer.size());
        if let Some(window) = self.renderer.window() {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: winit::window::WindowId, event: WindowEvent) {
        self.input.push(InputEvent::from_window_event(&event));
        self.dispatch_input();

        match &event {
            WindowEvent::CloseRequested => self.should_close = true,
            WindowEvent::Resized(size) => {
                self.renderer.resize(*size);
                self.camera.resize(*size);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
        if self.should_close {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }
        if let Some(window) = self.renderer.window() {
            window.request_redraw();
        }
    }
}
