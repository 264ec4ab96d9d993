mod common;

use scene_stage::driver::RenderLoop;
use scene_stage::stage::Stage;

use common::FakeSurfaces;

fn project_stage(surfaces: &mut FakeSurfaces) -> Stage {
    surfaces.add_surface("p1", 800, 600);
    let mut stage = Stage::new();
    stage.register("p1", None, surfaces).unwrap();
    stage
}

#[test]
fn test_toggle_auto_rotate_round_trips() {
    let mut surfaces = FakeSurfaces::new();
    let mut stage = project_stage(&mut surfaces);

    assert_eq!(stage.toggle_auto_rotate("p1"), Some(true));
    assert_eq!(stage.toggle_auto_rotate("p1"), Some(false));
}

#[test]
fn test_commands_on_unknown_scene_are_ignored() {
    let mut surfaces = FakeSurfaces::new();
    let mut stage = project_stage(&mut surfaces);

    assert_eq!(stage.toggle_auto_rotate("nope"), None);
    assert!(!stage.reset_camera("nope"));
    // No panic either
    stage.rotate_camera("nope", 10.0, 10.0);
    stage.zoom_camera("nope", 1.0);
}

#[test]
fn test_reset_restores_initial_camera_exactly() {
    let mut surfaces = FakeSurfaces::new();
    let mut stage = project_stage(&mut surfaces);
    let initial = stage.registry().get("p1").unwrap().camera;

    let mut render_loop = RenderLoop::new();
    render_loop.start(0.0);

    // An arbitrary sequence of drags and zooms, integrated over many ticks
    stage.rotate_camera("p1", 120.0, -40.0);
    for i in 1..=30 {
        render_loop.tick(&mut stage, i as f64 * 0.016);
    }
    stage.zoom_camera("p1", 2.0);
    stage.rotate_camera("p1", -15.0, 60.0);
    for i in 31..=60 {
        render_loop.tick(&mut stage, i as f64 * 0.016);
    }

    let moved = stage.registry().get("p1").unwrap().camera;
    assert_ne!(moved.position, initial.position, "drags should move the camera");

    assert!(stage.reset_camera("p1"));
    let restored = stage.registry().get("p1").unwrap().camera;
    assert_eq!(restored, initial, "reset must restore the captured state exactly");
}

#[test]
fn test_drag_is_damped_not_instant() {
    let mut surfaces = FakeSurfaces::new();
    let mut stage = project_stage(&mut surfaces);

    let mut render_loop = RenderLoop::new();
    render_loop.start(0.0);

    let before = stage.registry().get("p1").unwrap().camera.position;
    stage.rotate_camera("p1", 200.0, 0.0);
    render_loop.tick(&mut stage, 0.016);
    let after_one = stage.registry().get("p1").unwrap().camera.position;

    let first_step = (after_one - before).length();
    assert!(first_step > 0.0, "camera should start moving on the next tick");

    for i in 2..=300 {
        render_loop.tick(&mut stage, i as f64 * 0.016);
    }
    let settled = stage.registry().get("p1").unwrap().camera.position;
    let total = (settled - before).length();

    assert!(
        first_step < total * 0.2,
        "one tick should cover a small fraction of the goal (damping), got {first_step} of {total}"
    );
}

#[test]
fn test_auto_rotate_spins_only_when_enabled() {
    let mut surfaces = FakeSurfaces::new();
    let mut stage = project_stage(&mut surfaces);

    let mut render_loop = RenderLoop::new();
    render_loop.start(0.0);

    let before = stage.registry().get("p1").unwrap().camera.position;
    for i in 1..=60 {
        render_loop.tick(&mut stage, i as f64 * 0.016);
    }
    let idle = stage.registry().get("p1").unwrap().camera.position;
    assert!((idle - before).length() < 1e-6, "flag off: camera stays put");

    stage.toggle_auto_rotate("p1");
    for i in 61..=120 {
        render_loop.tick(&mut stage, i as f64 * 0.016);
    }
    let spinning = stage.registry().get("p1").unwrap().camera.position;
    assert!((spinning - idle).length() > 1e-4, "flag on: camera orbits");
}
