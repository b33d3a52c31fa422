//! Mount, unmount and demo switching across the whole gallery.

use lessons_core::demos::{Demo, DrawingDemo, ShapeDemo};
use lessons_core::{AppConfig, Duration, Gallery, Surface};
use nalgebra_glm as glm;

fn ready() -> Option<Surface> {
    Some(Surface::new(1100, 720))
}

#[test]
fn every_demo_mounts_and_tears_down_cleanly() {
    let mut gallery = Gallery::new();
    let entries: Vec<(usize, usize)> = gallery
        .lessons()
        .iter()
        .enumerate()
        .flat_map(|(l, lesson)| (0..lesson.demos.len()).map(move |d| (l, d)))
        .collect();

    for (lesson, demo) in entries {
        gallery.select(lesson, demo, ready());
        gallery.mount_current(ready());
        let current = gallery.current_mut().map(|demo| {
            demo.frame(Duration::from_millis(16));
            let stage = demo.stage();
            (
                demo.title(),
                stage.map(|s| s.frame_loop.is_running()),
                stage.map(|s| s.scene.node_count()),
            )
        });
        let Some((title, running, nodes)) = current else {
            panic!("no demo selected at {lesson}/{demo}");
        };
        assert_eq!(running, Some(true), "{title} loop not running");
        assert!(nodes.is_some_and(|n| n > 0), "{title} has an empty scene");
        assert_eq!(gallery.mounted_count(), 1);
    }
}

#[test]
fn unmount_releases_every_resource() {
    let mut demo = DrawingDemo::default();
    let surface = Surface::for_config(&demo.config());
    demo.mount(Some(surface));
    for x in [-0.5, 0.0, 0.5] {
        demo.click(glm::vec2(x, 0.0));
    }

    let Some(stage) = demo.slot().as_mut() else {
        panic!("drawing demo not mounted");
    };
    stage.teardown();
    assert!(!stage.frame_loop.is_running());
    assert_eq!(stage.scene.node_count(), 0);
    assert_eq!(stage.scene.resources.live_geometries(), 0);
    assert_eq!(stage.scene.resources.live_materials(), 0);
    assert_eq!(stage.scene.resources.live_textures(), 0);

    demo.unmount();
    assert!(!demo.is_mounted());
}

#[test]
fn mount_is_idempotent_and_waits_for_a_surface() {
    let mut demo = ShapeDemo::default();
    assert!(!demo.mount(None));
    assert!(!demo.is_mounted());

    let surface = Surface::for_config(&demo.config());
    assert!(demo.mount(Some(surface)));
    let scene = demo.stage().map(|s| s.scene.id());
    assert!(!demo.mount(Some(surface)));
    assert_eq!(demo.stage().map(|s| s.scene.id()), scene);
    assert_eq!(demo.stage().map(|s| s.frame_loop.runs_started()), Some(1));
}

#[test]
fn remounting_starts_from_a_fresh_scene() {
    let mut demo = DrawingDemo::default();
    let surface = Surface::for_config(&demo.config());
    demo.mount(Some(surface));
    demo.click(glm::vec2(0.0, 0.0));
    demo.unmount();

    demo.mount(Some(surface));
    assert!(demo.points().is_empty());
    assert_eq!(demo.dot_count(), 0);
    demo.click(glm::vec2(0.0, 0.0));
    assert_eq!(demo.dot_count(), 1);
}

#[test]
fn stopped_loop_does_not_animate() {
    let mut demo = ShapeDemo::default();
    demo.mount(Some(Surface::for_config(&demo.config())));
    if let Some(stage) = demo.stage_mut() {
        stage.frame_loop.cancel();
    }
    let before = demo.rotation();
    demo.frame(Duration::from_millis(16));
    assert_eq!(demo.rotation(), before);
}

#[test]
fn config_file_selects_the_startup_demo() {
    let config = AppConfig::from_toml_str(
        r#"
        title = "Lessons"
        lesson = 3
        demo = 2
        "#,
    );
    let Ok(config) = config else {
        panic!("valid config rejected");
    };
    assert_eq!((config.lesson, config.demo), (3, 2));
    assert_eq!(config.width, AppConfig::default().width);

    let mut gallery = Gallery::new();
    assert!(gallery.select(config.lesson - 1, config.demo, None));
    assert_eq!(
        gallery.current().map(|demo| demo.title()),
        Some("Parametric Curves")
    );
}
