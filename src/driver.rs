use std::time::Instant;

use crate::registry::SceneKind;
use crate::stage::Stage;

/// The loop is an explicit state machine rather than an implicit callback
/// chain so tests can single-step ticks deterministically.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Drives every live scene once per display frame: hero first, then each
/// registry entry in registration order. Scheduling the next tick belongs
/// to the host (redraw requests); the driver only consumes `now` values.
pub struct RenderLoop {
    state: LoopState,
    started_at: f64,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            started_at: 0.0,
            frames: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stopped -> Running; records the loop start time the hero animation
    /// is measured from. Calling start on a running loop does nothing.
    pub fn start(&mut self, now: f64) {
        if self.state == LoopState::Stopped {
            self.state = LoopState::Running;
            self.started_at = now;
        }
    }

    /// Advance and render every live scene once. A render failure in one
    /// entry is logged and skipped; it never takes down other entries or
    /// the loop itself.
    pub fn tick(&mut self, stage: &mut Stage, now: f64) {
        if self.state != LoopState::Running {
            return;
        }

        let elapsed = (now - self.started_at) as f32;

        if let Some(hero) = stage.hero_mut() {
            let animator = match &hero.kind {
                SceneKind::Hero { animator } => Some(*animator),
                SceneKind::Project { .. } => None,
            };
            if let Some(animator) = animator {
                animator.apply(&mut hero.root, elapsed);
            }
            if let Err(err) = hero.target.draw(&hero.root, &hero.camera) {
                log::warn!("hero render failed: {err}");
            }
        }

        for entry in stage.registry_mut().iter_mut() {
            if let SceneKind::Project { controls } = &mut entry.kind {
                controls.advance(&mut entry.camera);
            }
            if let Err(err) = entry.target.draw(&entry.root, &entry.camera) {
                log::warn!("render failed for scene {:?}: {err}", entry.id);
            }
        }

        self.frames += 1;
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall clock measured from process-local start, in seconds.
#[derive(Debug)]
pub struct WallClock {
    started: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_before_start_is_a_no_op() {
        let mut stage = Stage::new();
        let mut render_loop = RenderLoop::new();

        render_loop.tick(&mut stage, 1.0);
        assert_eq!(render_loop.state(), LoopState::Stopped);
        assert_eq!(render_loop.frames(), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut stage = Stage::new();
        let mut render_loop = RenderLoop::new();

        render_loop.start(2.0);
        render_loop.start(50.0); // no-op, start time stays at 2.0
        assert_eq!(render_loop.state(), LoopState::Running);

        render_loop.tick(&mut stage, 3.0);
        assert_eq!(render_loop.frames(), 1);
    }

    #[test]
    fn test_ticks_with_no_scenes_are_safe() {
        let mut stage = Stage::new();
        let mut render_loop = RenderLoop::new();

        render_loop.start(0.0);
        for i in 0..10 {
            render_loop.tick(&mut stage, i as f64 * 0.016);
        }
        assert_eq!(render_loop.frames(), 10);
    }
}
