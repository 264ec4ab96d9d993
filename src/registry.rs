use crate::camera::PerspectiveCamera;
use crate::hero::{hero_content, HeroAnimator};
use crate::interaction::OrbitControls;
use crate::mesh::MeshData;
use crate::node::{normalized, Node};
use crate::target::{RenderTarget, SurfaceProvider};

/// Normalized models and the fallback cube share this visual scale:
/// the largest bounding-box extent of imported content maps to this many
/// world units.
pub const REFERENCE_SIZE: f32 = 5.0;

const FALLBACK_CUBE_EDGE: f32 = 2.0;
const FALLBACK_CUBE_COLOR: [f32; 3] = [0.4, 0.4, 0.4];

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// No drawable surface matches the scene identifier; registration is
    /// skipped and no partial entry is left behind.
    #[error("no surface matches scene identifier {0:?}")]
    MissingSurface(String),
}

/// Hero scenes animate on wall-clock time and take no user input; project
/// scenes carry orbit controls. The distinction is a tagged variant so
/// every consumer has to handle both.
pub enum SceneKind {
    Hero { animator: HeroAnimator },
    Project { controls: OrbitControls },
}

/// One registered scene: identifier, owned scene graph, camera, and the
/// render target bound to the matching surface. Dropping the entry
/// releases the target.
pub struct SceneEntry {
    pub id: String,
    pub root: Node,
    pub camera: PerspectiveCamera,
    pub target: Box<dyn RenderTarget>,
    pub kind: SceneKind,
}

impl SceneEntry {
    pub fn hero(target: Box<dyn RenderTarget>) -> Self {
        Self {
            id: "hero".to_string(),
            root: hero_content(),
            camera: camera_for(target.as_ref()),
            target,
            kind: SceneKind::Hero {
                animator: HeroAnimator::default(),
            },
        }
    }

    pub fn project(id: &str, content: Option<Node>, target: Box<dyn RenderTarget>) -> Self {
        let root = match content {
            Some(node) => normalized(node, REFERENCE_SIZE),
            None => Node::with_mesh(MeshData::cube(FALLBACK_CUBE_EDGE, FALLBACK_CUBE_COLOR)),
        };

        let camera = camera_for(target.as_ref());
        let controls = OrbitControls::new(&camera);

        Self {
            id: id.to_string(),
            root,
            camera,
            target,
            kind: SceneKind::Project { controls },
        }
    }
}

fn camera_for(target: &dyn RenderTarget) -> PerspectiveCamera {
    let (width, height) = target.client_size();
    let aspect = if height > 0 {
        width as f32 / height as f32
    } else {
        1.0
    };
    PerspectiveCamera::new(aspect)
}

/// Project scenes keyed by identifier, iterated in registration order.
#[derive(Default)]
pub struct SceneRegistry {
    entries: Vec<SceneEntry>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project scene. Acquires the target first so a missing
    /// surface leaves the registry untouched. Re-registering an existing
    /// identifier replaces the entry in place, dropping the old target.
    pub fn register(
        &mut self,
        id: &str,
        content: Option<Node>,
        provider: &mut dyn SurfaceProvider,
    ) -> Result<(), StageError> {
        let target = provider
            .acquire(id)
            .ok_or_else(|| StageError::MissingSurface(id.to_string()))?;

        let entry = SceneEntry::project(id, content, target);

        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                log::debug!("replacing scene entry {id:?}");
                self.entries[index] = entry;
            }
            None => {
                log::debug!("registering scene entry {id:?}");
                self.entries.push(entry);
            }
        }

        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SceneEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SceneEntry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
