use crate::mesh::MeshData;
use crate::node::Node;

/// Spin rate about the x axis, radians per second.
pub const HERO_SPIN_X: f32 = 0.2;
/// Spin rate about the y axis, radians per second.
pub const HERO_SPIN_Y: f32 = 0.3;

const HERO_CUBE_EDGE: f32 = 2.0;
const HERO_CUBE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Deterministic time-driven animation for the hero scene.
///
/// Angles are absolute functions of elapsed wall-clock seconds, never
/// accumulated per frame, so the animation is frame-rate independent and
/// replayable.
#[derive(Copy, Clone, Debug)]
pub struct HeroAnimator {
    pub spin_x: f32,
    pub spin_y: f32,
}

impl HeroAnimator {
    pub fn apply(&self, root: &mut Node, elapsed_seconds: f32) {
        root.transform.rotation.x = elapsed_seconds * self.spin_x;
        root.transform.rotation.y = elapsed_seconds * self.spin_y;
    }
}

impl Default for HeroAnimator {
    fn default() -> Self {
        Self {
            spin_x: HERO_SPIN_X,
            spin_y: HERO_SPIN_Y,
        }
    }
}

/// The hero scene's content: a white cube spinning in front of the camera.
pub fn hero_content() -> Node {
    Node::with_mesh(MeshData::cube(HERO_CUBE_EDGE, HERO_CUBE_COLOR))
}
