use glam::Vec3;

use crate::camera::PerspectiveCamera;

/// Fraction of the remaining goal distance closed per tick.
pub const DAMPING_FACTOR: f32 = 0.05;
/// Radians of orbit per pixel of drag.
pub const ROTATE_SENSITIVITY: f32 = 0.005;
/// Distance units per zoom step.
pub const ZOOM_SENSITIVITY: f32 = 0.5;
/// Goal azimuth advance per tick while auto-rotating: one full orbit
/// every ~30 seconds at 60 ticks/s.
pub const AUTO_ROTATE_STEP: f32 = std::f32::consts::TAU / 1800.0;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 50.0;
const ELEVATION_LIMIT: f32 = 1.5;

/// Damped orbit/zoom camera control for one project scene.
///
/// Pointer input moves goal spherical coordinates; `advance` integrates the
/// current coordinates toward the goals once per tick, which is what makes
/// dragging feel smooth instead of stepping instantly.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitControls {
    azimuth: f32,
    elevation: f32,
    distance: f32,
    goal_azimuth: f32,
    goal_elevation: f32,
    goal_distance: f32,
    auto_rotate: bool,
    initial_position: Vec3,
    initial_target: Vec3,
}

impl OrbitControls {
    /// Capture the camera's current pose as the control's initial state.
    pub fn new(camera: &PerspectiveCamera) -> Self {
        let (azimuth, elevation, distance) = to_spherical(camera.position - camera.target);
        Self {
            azimuth,
            elevation,
            distance,
            goal_azimuth: azimuth,
            goal_elevation: elevation,
            goal_distance: distance,
            auto_rotate: false,
            initial_position: camera.position,
            initial_target: camera.target,
        }
    }

    /// Feed a pointer drag delta (pixels) into the goal orientation.
    pub fn rotate_by(&mut self, dx: f32, dy: f32) {
        self.goal_azimuth -= dx * ROTATE_SENSITIVITY;
        self.goal_elevation =
            (self.goal_elevation + dy * ROTATE_SENSITIVITY).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    /// Feed a zoom step. Positive moves the camera closer.
    pub fn zoom_by(&mut self, delta: f32) {
        self.goal_distance =
            (self.goal_distance - delta * ZOOM_SENSITIVITY).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Flip the auto-rotate flag, returning the new value.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Integrate one tick of damping and write the camera position.
    pub fn advance(&mut self, camera: &mut PerspectiveCamera) {
        if self.auto_rotate {
            self.goal_azimuth -= AUTO_ROTATE_STEP;
        }

        self.azimuth += (self.goal_azimuth - self.azimuth) * DAMPING_FACTOR;
        self.elevation += (self.goal_elevation - self.elevation) * DAMPING_FACTOR;
        self.distance += (self.goal_distance - self.distance) * DAMPING_FACTOR;

        camera.position = camera.target + from_spherical(self.azimuth, self.elevation, self.distance);
    }

    /// Restore the camera pose captured at construction time and resync
    /// the orbital state to it. The auto-rotate flag is left alone.
    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        camera.position = self.initial_position;
        camera.target = self.initial_target;

        let (azimuth, elevation, distance) = to_spherical(self.initial_position - self.initial_target);
        self.azimuth = azimuth;
        self.elevation = elevation;
        self.distance = distance;
        self.goal_azimuth = azimuth;
        self.goal_elevation = elevation;
        self.goal_distance = distance;
    }
}

fn to_spherical(offset: Vec3) -> (f32, f32, f32) {
    let distance = offset.length().max(MIN_DISTANCE);
    let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
    let azimuth = offset.x.atan2(offset.z);
    (azimuth, elevation, distance)
}

fn from_spherical(azimuth: f32, elevation: f32, distance: f32) -> Vec3 {
    Vec3::new(
        distance * elevation.cos() * azimuth.sin(),
        distance * elevation.sin(),
        distance * elevation.cos() * azimuth.cos(),
    )
}
