pub mod context;
pub mod pipeline;
pub mod window_target;

pub use context::GpuContext;
pub use window_target::{WindowSurfaces, WindowTarget};
