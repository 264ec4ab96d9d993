use crate::camera::PerspectiveCamera;
use crate::node::Node;

/// Failure while drawing one entry. Caught per-entry by the loop driver;
/// never terminates the loop or affects other entries.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("backing surface lost: {0}")]
    SurfaceLost(String),
    #[error("draw failed: {0}")]
    Draw(String),
}

/// One drawable surface bound to a scene entry.
///
/// This is the seam between the core (plain scene data, cameras, timing)
/// and whatever graphics library actually rasterizes. The core only ever
/// asks a target for its client size, resizes its backing buffer, and
/// hands it a node tree plus camera to draw. Unit tests inject a fake.
pub trait RenderTarget {
    /// Current client (logical) size of the bound surface in pixels.
    fn client_size(&self) -> (u32, u32);

    /// Device pixel ratio of the surface's display. The resize
    /// coordinator caps this at 2x before sizing the backing buffer.
    fn pixel_ratio(&self) -> f32 {
        1.0
    }

    /// Resize the backing pixel buffer (physical pixels).
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame of the scene.
    fn draw(&mut self, root: &Node, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

/// Supplies render targets by scene identifier.
///
/// `acquire` returns None when no surface matches the identifier in the
/// current page/layout; registration treats that as `MissingSurface` and
/// leaves no partial entry behind.
pub trait SurfaceProvider {
    fn acquire(&mut self, id: &str) -> Option<Box<dyn RenderTarget>>;
}
