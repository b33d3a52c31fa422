//! Lesson 2: "HI!" spelled with small cubes, one group swaying as a whole.

use nalgebra_glm as glm;

use super::Demo;
use crate::color::PURPLE;
use crate::config::{CameraConfig, SceneConfig};
use crate::frame_loop::FrameTick;
use crate::geometry::Geometry;
use crate::material::Material;
use crate::scene::{Light, Node, NodeId};
use crate::stage::Stage;

/// Lit cells of the glyph grid, `(column, row)` with row 0 at the bottom.
pub const VOXELS: [(u8, u8); 20] = [
    // H
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (2, 0),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 4),
    // I
    (4, 0),
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    // !
    (6, 0),
    (6, 2),
    (6, 3),
    (6, 4),
];

const CELL: f32 = 0.35;
const CUBE: f32 = 0.28;

#[derive(Default)]
pub struct VoxelTextDemo {
    stage: Option<Stage>,
    group: Option<NodeId>,
}

impl VoxelTextDemo {
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }
}

impl Demo for VoxelTextDemo {
    stage_slot!();

    fn title(&self) -> &'static str {
        "Voxel Text"
    }

    fn config(&self) -> SceneConfig {
        SceneConfig::sized(500, 300)
            .lights(vec![
                Light::directional(1.5, glm::vec3(3.0, 3.0, 5.0)),
                Light::ambient(0.4),
            ])
            .camera(CameraConfig::at(glm::vec3(0.0, 0.0, 4.0)))
    }

    fn populate(&mut self) {
        self.group = None;
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let scene = &mut stage.scene;
        let geometry = scene.resources.add_geometry(Geometry::cuboid(CUBE, CUBE, CUBE));
        let material = scene.resources.add_material(Material::standard(PURPLE));
        let (group, _) = scene.replace_subject(Node::group());
        for (column, row) in VOXELS {
            let position = glm::vec3(
                column as f32 * CELL - 1.2,
                row as f32 * CELL - 0.7,
                0.0,
            );
            scene.add_child(group, Node::mesh(geometry, material).at(position));
        }
        self.group = Some(group);
    }

    fn animate(&mut self, tick: FrameTick) {
        if let Some(node) = self
            .stage
            .as_mut()
            .and_then(|stage| stage.scene.subject_node_mut())
        {
            node.transform.rotation.y = (tick.elapsed * 0.8).sin() * 0.5;
            node.transform.rotation.x = (tick.elapsed * 0.6).sin() * 0.15;
        }
    }
}
