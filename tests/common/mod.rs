#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use scene_stage::camera::PerspectiveCamera;
use scene_stage::node::Node;
use scene_stage::target::{RenderError, RenderTarget, SurfaceProvider};

/// Observation channel shared between a fake target and the test body.
/// The target keeps reading the cells after registration, so tests can
/// change surface size / pixel ratio / failure mode mid-run.
#[derive(Clone)]
pub struct TargetProbe {
    pub client_size: Rc<Cell<(u32, u32)>>,
    pub pixel_ratio: Rc<Cell<f32>>,
    pub draws: Rc<Cell<u32>>,
    pub resized_to: Rc<Cell<Option<(u32, u32)>>>,
    pub released: Rc<Cell<bool>>,
    pub fail_draws: Rc<Cell<bool>>,
}

impl TargetProbe {
    fn new(client_size: Rc<Cell<(u32, u32)>>, pixel_ratio: Rc<Cell<f32>>) -> Self {
        Self {
            client_size,
            pixel_ratio,
            draws: Rc::new(Cell::new(0)),
            resized_to: Rc::new(Cell::new(None)),
            released: Rc::new(Cell::new(false)),
            fail_draws: Rc::new(Cell::new(false)),
        }
    }
}

/// In-memory render target: records every interaction, renders nothing.
pub struct FakeTarget {
    id: String,
    probe: TargetProbe,
    draw_log: Rc<RefCell<Vec<String>>>,
}

impl RenderTarget for FakeTarget {
    fn client_size(&self) -> (u32, u32) {
        self.probe.client_size.get()
    }

    fn pixel_ratio(&self) -> f32 {
        self.probe.pixel_ratio.get()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.probe.resized_to.set(Some((width, height)));
    }

    fn draw(&mut self, _root: &Node, _camera: &PerspectiveCamera) -> Result<(), RenderError> {
        if self.probe.fail_draws.get() {
            return Err(RenderError::Draw("simulated draw failure".to_string()));
        }
        self.probe.draws.set(self.probe.draws.get() + 1);
        self.draw_log.borrow_mut().push(self.id.clone());
        Ok(())
    }
}

impl Drop for FakeTarget {
    fn drop(&mut self) {
        self.probe.released.set(true);
    }
}

/// Surface provider backed by declared fake surfaces. Identifiers not
/// declared with `add_surface` behave like canvases missing from the page.
#[derive(Default)]
pub struct FakeSurfaces {
    draw_log: Rc<RefCell<Vec<String>>>,
    surfaces: HashMap<String, (Rc<Cell<(u32, u32)>>, Rc<Cell<f32>>)>,
    probes: HashMap<String, Vec<TargetProbe>>,
}

impl FakeSurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, id: &str, width: u32, height: u32) {
        self.surfaces.insert(
            id.to_string(),
            (
                Rc::new(Cell::new((width, height))),
                Rc::new(Cell::new(1.0)),
            ),
        );
    }

    pub fn set_client_size(&mut self, id: &str, width: u32, height: u32) {
        self.surfaces[id].0.set((width, height));
    }

    pub fn set_pixel_ratio(&mut self, id: &str, ratio: f32) {
        self.surfaces[id].1.set(ratio);
    }

    /// Probe of the n-th target acquired for `id` (0 = first).
    pub fn probe(&self, id: &str, index: usize) -> TargetProbe {
        self.probes[id][index].clone()
    }

    pub fn latest_probe(&self, id: &str) -> TargetProbe {
        self.probes[id].last().expect("no target acquired").clone()
    }

    /// Scene identifiers in the order their targets drew, across all ticks.
    pub fn draw_log(&self) -> Vec<String> {
        self.draw_log.borrow().clone()
    }

    pub fn clear_draw_log(&self) {
        self.draw_log.borrow_mut().clear();
    }
}

impl SurfaceProvider for FakeSurfaces {
    fn acquire(&mut self, id: &str) -> Option<Box<dyn RenderTarget>> {
        let (size, ratio) = self.surfaces.get(id)?.clone();
        let probe = TargetProbe::new(size, ratio);
        self.probes.entry(id.to_string()).or_default().push(probe.clone());
        Some(Box::new(FakeTarget {
            id: id.to_string(),
            probe,
            draw_log: self.draw_log.clone(),
        }))
    }
}
