use crate::node::Node;
use crate::registry::{SceneEntry, SceneKind, SceneRegistry, StageError};
use crate::target::SurfaceProvider;

/// Backing buffers never exceed 2x the client size, whatever the display
/// density reports.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub const HERO_SCENE_ID: &str = "hero";

/// The one owned home of all live scenes: the optional hero entry plus the
/// project registry. External collaborators talk to scenes exclusively
/// through this object, by identifier.
#[derive(Default)]
pub struct Stage {
    hero: Option<SceneEntry>,
    registry: SceneRegistry,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the hero entry. A page variant without a hero surface is
    /// normal: the caller gets `MissingSurface` and the stage simply has
    /// no hero to render.
    pub fn init_hero(&mut self, provider: &mut dyn SurfaceProvider) -> Result<(), StageError> {
        let target = provider
            .acquire(HERO_SCENE_ID)
            .ok_or_else(|| StageError::MissingSurface(HERO_SCENE_ID.to_string()))?;
        self.hero = Some(SceneEntry::hero(target));
        Ok(())
    }

    /// Register (or replace) a project scene.
    pub fn register(
        &mut self,
        id: &str,
        content: Option<Node>,
        provider: &mut dyn SurfaceProvider,
    ) -> Result<(), StageError> {
        self.registry.register(id, content, provider)
    }

    pub fn hero(&self) -> Option<&SceneEntry> {
        self.hero.as_ref()
    }

    pub fn hero_mut(&mut self) -> Option<&mut SceneEntry> {
        self.hero.as_mut()
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SceneRegistry {
        &mut self.registry
    }

    /// Flip auto-rotate for the named project scene. Returns the new flag,
    /// or None when the identifier names no project scene.
    pub fn toggle_auto_rotate(&mut self, id: &str) -> Option<bool> {
        match &mut self.registry.get_mut(id)?.kind {
            SceneKind::Project { controls } => Some(controls.toggle_auto_rotate()),
            SceneKind::Hero { .. } => None,
        }
    }

    /// Restore the named scene's camera to its registration-time state.
    /// Returns false when the identifier names no project scene.
    pub fn reset_camera(&mut self, id: &str) -> bool {
        let Some(entry) = self.registry.get_mut(id) else {
            return false;
        };
        match &mut entry.kind {
            SceneKind::Project { controls } => {
                controls.reset(&mut entry.camera);
                true
            }
            SceneKind::Hero { .. } => false,
        }
    }

    /// Feed a pointer drag delta into the named scene's orbit controls.
    pub fn rotate_camera(&mut self, id: &str, dx: f32, dy: f32) {
        if let Some(entry) = self.registry.get_mut(id) {
            if let SceneKind::Project { controls } = &mut entry.kind {
                controls.rotate_by(dx, dy);
            }
        }
    }

    /// Feed a zoom step into the named scene's orbit controls.
    pub fn zoom_camera(&mut self, id: &str, delta: f32) {
        if let Some(entry) = self.registry.get_mut(id) {
            if let SceneKind::Project { controls } = &mut entry.kind {
                controls.zoom_by(delta);
            }
        }
    }

    /// Viewport resize coordinator: re-query every live entry's surface,
    /// restore `camera.aspect = width/height`, and resize the backing
    /// buffer to client size times the capped pixel ratio. Safe with zero
    /// entries and at any call frequency.
    pub fn on_resize(&mut self) {
        if let Some(hero) = self.hero.as_mut() {
            resize_entry(hero);
        }
        for entry in self.registry.iter_mut() {
            resize_entry(entry);
        }
    }
}

fn resize_entry(entry: &mut SceneEntry) {
    let (width, height) = entry.target.client_size();
    if width == 0 || height == 0 {
        return;
    }

    entry.camera.set_aspect(width as f32 / height as f32);

    let ratio = entry.target.pixel_ratio().min(MAX_PIXEL_RATIO);
    let physical_width = (width as f32 * ratio).round() as u32;
    let physical_height = (height as f32 * ratio).round() as u32;
    entry.target.resize(physical_width, physical_height);
}
