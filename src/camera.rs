use glam::{Mat4, Vec3};

pub const DEFAULT_FOV_DEGREES: f32 = 75.0;
pub const DEFAULT_ZNEAR: f32 = 0.1;
pub const DEFAULT_ZFAR: f32 = 1000.0;
pub const DEFAULT_EYE: Vec3 = Vec3::new(0.0, 0.0, 5.0);

/// Perspective projection state for one scene.
///
/// `aspect` is kept in sync with the backing surface by the resize
/// coordinator; `position`/`target` are driven by the interaction
/// controller (project scenes) or left at their defaults (hero).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y: f32,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y: DEFAULT_FOV_DEGREES.to_radians(),
            aspect,
            znear: DEFAULT_ZNEAR,
            zfar: DEFAULT_ZFAR,
            position: DEFAULT_EYE,
            target: Vec3::ZERO,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.znear, self.zfar)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
