//! Interaction handlers of the individual demos, driven without a window.

use lessons_core::color::PALETTE;
use lessons_core::curves::CurveKind;
use lessons_core::demos::{
    BlackScreenDemo, CameraMode, CanvasTextDemo, CurveDemo, Demo, DoubleSideDemo, DrawingDemo,
    LineTypesDemo, MaterialChoice, MaterialDemo, ShapeDemo, ShapeKind, VoxelTextDemo,
};
use lessons_core::geometry::Topology;
use lessons_core::lines::{strokes, LineStyle};
use lessons_core::material::{MaterialKind, Side};
use lessons_core::{Duration, Surface};
use nalgebra_glm as glm;

const FRAME: Duration = Duration::from_millis(16);

fn mounted<D: Demo + Default>() -> D {
    let mut demo = D::default();
    let surface = Surface::for_config(&demo.config());
    assert!(demo.mount(Some(surface)));
    demo
}

#[test]
fn shape_switches_keep_a_single_subject() {
    let mut demo: ShapeDemo = mounted();

    for shape in ShapeKind::ALL.into_iter().cycle().take(12) {
        demo.set_shape(shape);
        assert_eq!(demo.shape(), shape);
        let stage = demo.stage();
        assert_eq!(stage.map(|s| s.scene.mesh_count()), Some(1));
        assert_eq!(stage.map(|s| s.scene.resources.live_geometries()), Some(1));
        assert_eq!(stage.map(|s| s.scene.resources.live_materials()), Some(1));
    }
}

#[test]
fn shape_color_edits_the_material_in_place() {
    let mut demo: ShapeDemo = mounted();
    let (color, _) = PALETTE[3];
    demo.set_color(color);
    assert_eq!(demo.color(), color);
    let materials = demo.stage().map(|stage| stage.scene.resources.live_materials());
    assert_eq!(materials, Some(1));
}

#[test]
fn paused_shape_keeps_its_rotation() {
    let mut demo: ShapeDemo = mounted();
    for _ in 0..10 {
        demo.frame(FRAME);
    }
    demo.toggle_spin();
    assert!(!demo.spinning());
    let frozen = demo.rotation();
    for _ in 0..10 {
        demo.frame(FRAME);
    }
    assert_eq!(demo.rotation(), frozen);

    demo.toggle_spin();
    demo.frame(FRAME);
    assert_ne!(demo.rotation(), frozen);
}

#[test]
fn handlers_before_mount_do_nothing() {
    let mut shapes = ShapeDemo::default();
    shapes.set_shape(ShapeKind::Torus);
    shapes.toggle_spin();
    assert_eq!(shapes.shape(), ShapeKind::Box);
    assert!(shapes.spinning());

    let mut drawing = DrawingDemo::default();
    drawing.add_point_at(glm::vec2(0.0, 0.0));
    assert!(drawing.points().is_empty());

    let mut modes = BlackScreenDemo::default();
    modes.set_camera_mode(CameraMode::Inside);
    assert_eq!(modes.mode(), CameraMode::Working);
}

#[test]
fn every_click_adds_one_point() {
    let mut demo: DrawingDemo = mounted();
    let clicks = [
        glm::vec2(-0.5, 0.5),
        glm::vec2(0.0, 0.0),
        glm::vec2(0.5, -0.5),
        glm::vec2(1.0, 1.0),
    ];
    for (count, ndc) in clicks.iter().enumerate() {
        demo.click(*ndc);
        assert_eq!(demo.points().len(), count + 1);
        assert_eq!(demo.dot_count(), count + 1);
        assert_eq!(demo.line().is_some(), count + 1 >= 2);
    }

    let last = demo.points()[3];
    assert!((last - glm::vec3(3.0, 2.0, 0.0)).norm() < 1e-4);
}

#[test]
fn clearing_the_drawing_removes_line_and_dots() {
    let mut demo: DrawingDemo = mounted();
    demo.click(glm::vec2(0.1, 0.1));
    demo.click(glm::vec2(0.2, 0.4));
    let before = demo.stage().map(|stage| stage.scene.resources.live_geometries());

    demo.clear();
    assert!(demo.points().is_empty());
    assert!(demo.line().is_none());
    assert_eq!(demo.dot_count(), 0);
    let after = demo.stage().map(|stage| stage.scene.resources.live_geometries());
    assert_eq!(after.zip(before).map(|(a, b)| b - a), Some(1));

    demo.click(glm::vec2(-0.3, 0.2));
    assert_eq!(demo.points().len(), 1);
    assert!(demo.line().is_none());
    demo.click(glm::vec2(0.4, -0.6));
    assert_eq!(demo.points().len(), 2);
    assert!(demo.line().is_some());
}

#[test]
fn segments_style_draws_disjoint_strokes() {
    let mut demo: LineTypesDemo = mounted();
    demo.set_line_style(LineStyle::Segments);
    let geometry = demo.line_geometry().cloned();
    let geometry = geometry.as_ref();
    assert_eq!(geometry.map(|g| g.topology), Some(Topology::Lines));
    assert_eq!(geometry.map(strokes), Some(vec![vec![0, 1], vec![2, 3]]));

    demo.set_line_style(LineStyle::Dashed);
    let distances = demo.line_geometry().map(|g| g.line_distances.len());
    assert_eq!(distances, Some(5));
}

#[test]
fn line_style_switches_release_what_they_replace() {
    let mut demo: LineTypesDemo = mounted();
    let counts = |demo: &LineTypesDemo| {
        demo.stage().map(|s| {
            (
                s.scene.resources.live_geometries(),
                s.scene.resources.live_materials(),
                s.scene.mesh_count(),
            )
        })
    };
    let baseline = counts(&demo);
    assert!(baseline.is_some());

    for style in LineStyle::ALL.into_iter().cycle().take(12) {
        demo.set_line_style(style);
        assert_eq!(counts(&demo), baseline);
    }
}

#[test]
fn curve_switch_replaces_the_line() {
    let mut demo: CurveDemo = mounted();
    for kind in CurveKind::ALL {
        demo.set_curve(kind);
        let stage = demo.stage();
        assert_eq!(stage.map(|s| s.scene.mesh_count()), Some(1));
        assert_eq!(stage.map(|s| s.scene.resources.live_geometries()), Some(1));
        assert_eq!(stage.map(|s| s.scene.resources.live_materials()), Some(1));
    }
    assert_eq!(demo.kind(), CurveKind::Spiral);
}

#[test]
fn material_switch_releases_the_previous_material() {
    let mut demo: MaterialDemo = mounted();
    for choice in MaterialChoice::ALL {
        demo.set_material(choice);
        assert_eq!(
            demo.stage().map(|s| s.scene.resources.live_materials()),
            Some(1)
        );
    }
    assert!(demo.material().is_some_and(|m| m.wireframe));

    demo.set_material(MaterialChoice::Phong);
    assert!(matches!(
        demo.material().map(|m| m.kind),
        Some(MaterialKind::Phong { .. })
    ));
}

#[test]
fn double_side_toggle() {
    let mut demo: DoubleSideDemo = mounted();
    assert_eq!(demo.side(), Some(Side::Front));
    demo.set_double_sided(true);
    assert_eq!(demo.side(), Some(Side::Double));
    demo.set_double_sided(false);
    assert_eq!(demo.side(), Some(Side::Front));
}

#[test]
fn camera_mode_rebuilds_the_scene_and_restarts_the_loop_once() {
    let mut demo: BlackScreenDemo = mounted();
    let first_scene = demo.stage().map(|s| s.scene.id());
    let runs = demo.stage().map(|s| s.frame_loop.runs_started());

    demo.set_camera_mode(CameraMode::TooFar);
    let stage = demo.stage();
    assert_ne!(stage.map(|s| s.scene.id()), first_scene);
    assert_eq!(stage.map(|s| s.frame_loop.runs_started()), runs.map(|r| r + 1));
    assert_eq!(stage.map(|s| s.frame_loop.is_running()), Some(true));
    assert_eq!(stage.map(|s| s.scene.mesh_count()), Some(1));

    demo.set_camera_mode(CameraMode::NoLight);
    assert_eq!(demo.stage().map(|s| s.scene.lights.is_empty()), Some(true));
    assert_eq!(demo.stage().map(|s| s.scene.resources.live_geometries()), Some(1));
}

#[test]
fn voxel_text_is_one_group_of_cubes() {
    let demo: VoxelTextDemo = mounted();
    let group = demo.group();
    let stage = demo.stage();
    let children = stage
        .zip(group)
        .and_then(|(stage, group)| stage.scene.node(group))
        .map(|node| node.children().len());
    assert_eq!(children, Some(20));
}

#[test]
fn canvas_text_swaps_its_texture() {
    let mut demo: CanvasTextDemo = mounted();
    assert_eq!(demo.stage().map(|s| s.scene.resources.live_textures()), Some(1));
    demo.set_text("Rust");
    assert_eq!(demo.text(), "Rust");
    assert_eq!(demo.stage().map(|s| s.scene.resources.live_textures()), Some(1));
}

#[test]
fn canvas_text_without_its_material_keeps_no_new_texture() {
    let mut demo: CanvasTextDemo = mounted();
    let material = demo
        .stage()
        .and_then(|s| s.scene.subject_node())
        .and_then(|node| node.mesh)
        .map(|mesh| mesh.material);
    let released = demo
        .stage_mut()
        .zip(material)
        .map(|(stage, material)| stage.scene.resources.release_material(material));
    assert_eq!(released, Some(true));

    let before = demo.text().to_owned();
    demo.set_text("Lost");
    assert_eq!(demo.text(), before);
    assert_eq!(demo.stage().map(|s| s.scene.resources.live_textures()), Some(1));
}
