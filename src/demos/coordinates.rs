//! Lesson 4: the world coordinate system. Colored axes with arrowheads and
//! labels, a floor grid and a box at (1, 1, 1) with dashed guides back to
//! each axis plane.

use std::f32::consts::FRAC_PI_2;

use nalgebra_glm as glm;

use super::{add_label, Demo};
use crate::camera::Projection;
use crate::color::{Color, PURPLE};
use crate::config::{CameraConfig, SceneConfig};
use crate::geometry::{Geometry, Topology};
use crate::material::Material;
use crate::scene::{Light, Node, Scene};
use crate::stage::Stage;
use crate::text_texture::{Anchor, TextStyle, Typeface};

const AXIS_LENGTH: f32 = 2.5;
const LABEL_DISTANCE: f32 = 2.8;

/// Direction, color and name of each axis.
pub const AXES: [([f32; 3], u32, &str); 3] = [
    ([1.0, 0.0, 0.0], 0xff6b6b, "X"),
    ([0.0, 1.0, 0.0], 0x55efc4, "Y"),
    ([0.0, 0.0, 1.0], 0x74b9ff, "Z"),
];

pub const BOX_POSITION: [f32; 3] = [1.0, 1.0, 1.0];

/// Dashed guides from the box down to `(foot, translucent color)`.
const GUIDES: [([f32; 3], u32); 3] = [
    ([1.0, 0.0, 1.0], 0xff6b6b55),
    ([0.0, 1.0, 1.0], 0x55efc455),
    ([1.0, 1.0, 0.0], 0x74b9ff55),
];

#[derive(Default)]
pub struct CoordinateDemo {
    stage: Option<Stage>,
}

fn add_axis(scene: &mut Scene, direction: glm::Vec3, color: Color, name: &str) {
    let tip = direction * AXIS_LENGTH;
    let geometry = scene
        .resources
        .add_geometry(Geometry::polyline(&[glm::Vec3::zeros(), tip], Topology::LineStrip));
    let material = scene.resources.add_material(Material::line(color));
    scene.add(Node::mesh(geometry, material));

    // Cones point up +Y; turn them onto X and Z.
    let rotation = if direction.x > 0.0 {
        glm::vec3(0.0, 0.0, -FRAC_PI_2)
    } else if direction.z > 0.0 {
        glm::vec3(FRAC_PI_2, 0.0, 0.0)
    } else {
        glm::Vec3::zeros()
    };
    let geometry = scene.resources.add_geometry(Geometry::cone(0.06, 0.2, 8));
    let material = scene.resources.add_material(Material::basic(color));
    scene.add(Node::mesh(geometry, material).at(tip).rotated(rotation));

    let style = TextStyle::label(64, 40, 28.0, 30.0, color);
    add_label(
        scene,
        name,
        &style,
        direction * LABEL_DISTANCE,
        glm::vec2(0.5, 0.3),
    );
}

fn add_dashed(scene: &mut Scene, from: glm::Vec3, to: glm::Vec3, color: Color) {
    let mut geometry = Geometry::polyline(&[from, to], Topology::LineStrip);
    geometry.compute_line_distances();
    let geometry = scene.resources.add_geometry(geometry);
    let material = scene
        .resources
        .add_material(Material::dashed(color, 0.1, 0.05));
    scene.add(Node::mesh(geometry, material));
}

impl Demo for CoordinateDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Coordinate System"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 350)
            .lights(vec![
                Light::ambient(0.5),
                Light::directional(1.0, glm::vec3(3.0, 4.0, 5.0)),
            ])
            .camera(
                CameraConfig::at(glm::vec3(3.0, 2.5, 4.0))
                    .looking_at(glm::Vec3::zeros())
                    .with_projection(Projection::perspective(50.0)),
            )
    }

    fn populate(&mut self) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;

        let origin = scene.resources.add_geometry(Geometry::sphere(0.08, 16, 16));
        let white = scene.resources.add_material(Material::basic(Color::WHITE));
        scene.add(Node::mesh(origin, white));

        for (direction, color, name) in AXES {
            add_axis(scene, glm::Vec3::from(direction), Color::rgb_u32(color), name);
        }

        let (center, rest) = Geometry::grid(5.0, 10);
        for (geometry, color) in [(rest, 0x1f1f2f), (center, 0x2a2a3a)] {
            let geometry = scene.resources.add_geometry(geometry);
            let material = scene
                .resources
                .add_material(Material::line(Color::rgb_u32(color)));
            scene.add(Node::mesh(geometry, material));
        }

        let corner = glm::Vec3::from(BOX_POSITION);
        let geometry = scene.resources.add_geometry(Geometry::cuboid(0.4, 0.4, 0.4));
        let material = scene.resources.add_material(Material::standard(PURPLE));
        scene.replace_subject(Node::mesh(geometry, material).at(corner));

        for (foot, color) in GUIDES {
            add_dashed(scene, corner, glm::Vec3::from(foot), Color::rgba_u32(color));
        }

        let mut style = TextStyle::label(200, 40, 20.0, 28.0, Color::rgb_u32(0xa29bfe));
        style.typeface = Typeface::Monospace;
        style.anchor = Anchor::Baseline {
            left: Some(20.0),
            y: 28.0,
        };
        add_label(
            scene,
            "(1, 1, 1)",
            &style,
            glm::vec3(1.0, 1.5, 1.0),
            glm::vec2(1.2, 0.25),
        );
    }
}
