use anyhow::Result;
use clap::Parser;
use std::collections::HashMap;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scene_stage::cli::Cli;
use scene_stage::config::{ProjectSlot, StageConfig};
use scene_stage::driver::{RenderLoop, WallClock};
use scene_stage::gfx::{GpuContext, WindowSurfaces};
use scene_stage::loaders::gltf::load_node;
use scene_stage::stage::{Stage, HERO_SCENE_ID};
use scene_stage::StageError;

const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;
const WHEEL_PIXEL_SCALE: f32 = 0.01;

struct App {
    slots: Vec<ProjectSlot>,
    no_hero: bool,
    stage: Stage,
    render_loop: RenderLoop,
    clock: WallClock,
    surfaces: Option<WindowSurfaces>,
    // Keep windows alive; map each to its scene identifier
    windows: Vec<Arc<Window>>,
    scene_ids: HashMap<WindowId, String>,
    primary: Option<WindowId>,
    cursor: HashMap<WindowId, (f64, f64)>,
    dragging: Option<WindowId>,
}

impl App {
    fn new(slots: Vec<ProjectSlot>, no_hero: bool) -> Self {
        Self {
            slots,
            no_hero,
            stage: Stage::new(),
            render_loop: RenderLoop::new(),
            clock: WallClock::new(),
            surfaces: None,
            windows: Vec::new(),
            scene_ids: HashMap::new(),
            primary: None,
            cursor: HashMap::new(),
            dragging: None,
        }
    }

    fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        id: &str,
        title: &str,
    ) -> Option<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                INITIAL_WINDOW_WIDTH,
                INITIAL_WINDOW_HEIGHT,
            ));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                self.scene_ids.insert(window.id(), id.to_string());
                if self.primary.is_none() {
                    self.primary = Some(window.id());
                }
                self.windows.push(window.clone());
                Some(window)
            }
            Err(err) => {
                log::error!("failed to create window for scene {id:?}: {err}");
                None
            }
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut created: Vec<(String, Arc<Window>)> = Vec::new();

        if !self.no_hero {
            if let Some(window) = self.create_window(event_loop, HERO_SCENE_ID, "Scene Stage") {
                created.push((HERO_SCENE_ID.to_string(), window));
            }
        }
        for slot in self.slots.clone() {
            let title = format!("Scene Stage - {}", slot.id);
            if let Some(window) = self.create_window(event_loop, &slot.id, &title) {
                created.push((slot.id.clone(), window));
            }
        }

        let Some((_, first)) = created.first() else {
            anyhow::bail!("no scene windows could be created");
        };

        let gpu = pollster::block_on(GpuContext::for_window(first.clone()))?;
        let mut surfaces = WindowSurfaces::new(gpu);
        for (id, window) in &created {
            surfaces.insert(id.clone(), window.clone());
        }

        match self.stage.init_hero(&mut surfaces) {
            Ok(()) => log::info!("hero scene ready"),
            Err(StageError::MissingSurface(_)) => log::info!("no hero surface in this layout"),
        }

        for slot in self.slots.clone() {
            let content = slot.model.as_ref().and_then(|path| match load_node(path) {
                Ok(node) => Some(node),
                Err(err) => {
                    log::warn!(
                        "model load failed for scene {:?}, using fallback: {err:#}",
                        slot.id
                    );
                    None
                }
            });
            if let Err(err) = self.stage.register(&slot.id, content, &mut surfaces) {
                log::error!("registration failed: {err}");
            }
        }

        self.surfaces = Some(surfaces);
        self.render_loop.start(self.clock.seconds());
        Ok(())
    }

    fn scene_id(&self, window_id: WindowId) -> Option<&str> {
        self.scene_ids.get(&window_id).map(String::as_str)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surfaces.is_none() {
            if let Err(err) = self.setup(event_loop) {
                log::error!("startup failed: {err:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(_) => self.stage.on_resize(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let Some(id) = self.scene_id(window_id).map(str::to_string) else {
                    return;
                };
                match code {
                    KeyCode::KeyR => {
                        if let Some(enabled) = self.stage.toggle_auto_rotate(&id) {
                            log::info!("auto-rotate for {id:?}: {enabled}");
                        }
                    }
                    KeyCode::KeyC => {
                        if self.stage.reset_camera(&id) {
                            log::info!("camera reset for {id:?}");
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = match state {
                    ElementState::Pressed => Some(window_id),
                    ElementState::Released => None,
                };
            }
            WindowEvent::CursorMoved { position, .. } => {
                let last = self.cursor.insert(window_id, (position.x, position.y));
                if self.dragging == Some(window_id) {
                    if let (Some((lx, ly)), Some(id)) = (last, self.scene_id(window_id)) {
                        let id = id.to_string();
                        let dx = (position.x - lx) as f32;
                        let dy = (position.y - ly) as f32;
                        self.stage.rotate_camera(&id, dx, dy);
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let Some(id) = self.scene_id(window_id).map(str::to_string) else {
                    return;
                };
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * WHEEL_PIXEL_SCALE,
                };
                self.stage.zoom_camera(&id, steps);
            }
            WindowEvent::RedrawRequested => {
                // One tick per display frame, driven by the primary window;
                // the tick renders every live scene
                if Some(window_id) == self.primary {
                    self.render_loop.tick(&mut self.stage, self.clock.seconds());
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(primary) = self.primary {
            if let Some(window) = self.windows.iter().find(|w| w.id() == primary) {
                window.request_redraw();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut slots = Vec::new();
    if let Some(manifest) = &cli.manifest {
        slots.extend(StageConfig::load(manifest)?.projects);
    }
    if let Some(model) = &cli.model {
        slots.push(ProjectSlot {
            id: "preview".to_string(),
            model: Some(model.clone()),
        });
    }

    println!("Scene Stage - Controls: drag to orbit, scroll to zoom, R auto-rotate, C reset, Escape to quit");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(slots, cli.no_hero);
    event_loop.run_app(&mut app)?;

    Ok(())
}
