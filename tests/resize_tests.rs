mod common;

use scene_stage::stage::Stage;

use common::FakeSurfaces;

#[test]
fn test_resize_with_no_entries_is_a_no_op() {
    let mut stage = Stage::new();
    stage.on_resize();
    assert!(stage.hero().is_none());
    assert!(stage.registry().is_empty());
}

#[test]
fn test_resize_restores_camera_aspect() {
    let mut surfaces = FakeSurfaces::new();
    surfaces.add_surface("p1", 800, 600);

    let mut stage = Stage::new();
    stage.register("p1", None, &mut surfaces).unwrap();
    assert_eq!(stage.registry().get("p1").unwrap().camera.aspect, 800.0 / 600.0);

    surfaces.set_client_size("p1", 1000, 500);
    stage.on_resize();

    assert_eq!(stage.registry().get("p1").unwrap().camera.aspect, 2.0);
    assert_eq!(
        surfaces.probe("p1", 0).resized_to.get(),
        Some((1000, 500)),
        "backing buffer follows the client size at 1x"
    );
}

#[test]
fn test_resize_caps_pixel_ratio_at_two() {
    let mut surfaces = FakeSurfaces::new();
    surfaces.add_surface("p1", 400, 300);
    surfaces.set_pixel_ratio("p1", 3.0);

    let mut stage = Stage::new();
    stage.register("p1", None, &mut surfaces).unwrap();
    stage.on_resize();

    assert_eq!(surfaces.probe("p1", 0).resized_to.get(), Some((800, 600)));
}

#[test]
fn test_resize_honors_fractional_ratio_below_cap() {
    let mut surfaces = FakeSurfaces::new();
    surfaces.add_surface("p1", 400, 300);
    surfaces.set_pixel_ratio("p1", 1.5);

    let mut stage = Stage::new();
    stage.register("p1", None, &mut surfaces).unwrap();
    stage.on_resize();

    assert_eq!(surfaces.probe("p1", 0).resized_to.get(), Some((600, 450)));
}

#[test]
fn test_resize_skips_zero_sized_surfaces() {
    let mut surfaces = FakeSurfaces::new();
    surfaces.add_surface("p1", 800, 600);

    let mut stage = Stage::new();
    stage.register("p1", None, &mut surfaces).unwrap();
    let aspect_before = stage.registry().get("p1").unwrap().camera.aspect;

    surfaces.set_client_size("p1", 0, 0);
    stage.on_resize();

    assert_eq!(stage.registry().get("p1").unwrap().camera.aspect, aspect_before);
    assert_eq!(surfaces.probe("p1", 0).resized_to.get(), None);
}

#[test]
fn test_resize_covers_hero_and_projects() {
    let mut surfaces = FakeSurfaces::new();
    surfaces.add_surface("hero", 800, 600);
    surfaces.add_surface("p1", 640, 480);

    let mut stage = Stage::new();
    stage.init_hero(&mut surfaces).unwrap();
    stage.register("p1", None, &mut surfaces).unwrap();

    surfaces.set_client_size("hero", 1200, 600);
    surfaces.set_client_size("p1", 320, 320);
    stage.on_resize();

    assert_eq!(stage.hero().unwrap().camera.aspect, 2.0);
    assert_eq!(stage.registry().get("p1").unwrap().camera.aspect, 1.0);
    assert_eq!(surfaces.probe("hero", 0).resized_to.get(), Some((1200, 600)));
    assert_eq!(surfaces.probe("p1", 0).resized_to.get(), Some((320, 320)));
}
