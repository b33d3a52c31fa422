//! # Scene graph
//!
//! The [`Scene`] is the CPU-side description of what a demo shows: a tree of
//! [`Node`]s, a list of [`Light`]s, a background color and the
//! [`Resources`] arena holding every geometry, material and texture the nodes
//! reference.
//!
//! ## Nodes
//!
//! A node carries a [`Transform`] relative to its parent and, optionally, a
//! [`Mesh`] (a geometry/material pair). A node without a mesh is a *group*:
//! it exists only to move its children together, like the swaying group of
//! voxels spelling "HI!". Removing a node removes its whole subtree.
//!
//! ## The subject
//!
//! Most demos revolve around one object the controls act on (the spinning
//! shape, the curve, the material sphere). The scene remembers that node as
//! its *subject*, and [`Scene::replace_subject`] guarantees the old subject
//! leaves the tree before the new one enters, so there is never more than one.
//!
//! ## Identity
//!
//! Every scene gets a process-unique [`SceneId`]. The GPU mirror keys its
//! caches on it and starts from scratch when it is handed a different scene,
//! which is what happens when a demo is torn down and rebuilt.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::resources::{GeometryId, MaterialId, Resources};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Scene`] instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

/// Handle to a node inside one [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Position, XYZ Euler rotation (radians) and scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: glm::Vec3,
    pub rotation: glm::Vec3,
    pub scale: glm::Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: glm::Vec3::zeros(),
            rotation: glm::Vec3::zeros(),
            scale: glm::vec3(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(position: glm::Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Local matrix: translate, then rotate X, Y, Z, then scale.
    pub fn matrix(&self) -> glm::Mat4 {
        let mut matrix = glm::translation(&self.position);
        matrix = glm::rotate_x(&matrix, self.rotation.x);
        matrix = glm::rotate_y(&matrix, self.rotation.y);
        matrix = glm::rotate_z(&matrix, self.rotation.z);
        glm::scale(&matrix, &self.scale)
    }
}

/// A drawable geometry/material pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub visible: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn group() -> Self {
        Self {
            transform: Transform::default(),
            mesh: None,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            mesh: Some(Mesh { geometry, material }),
            ..Self::group()
        }
    }

    pub fn at(mut self, position: glm::Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotated(mut self, rotation: glm::Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn scaled(mut self, scale: glm::Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

fn default_light_position() -> glm::Vec3 {
    glm::vec3(0.0, 1.0, 0.0)
}

/// Scene lighting. Directional lights shine from `position` toward the
/// origin; their default position is straight up.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        #[serde(default = "default_light_position")]
        position: glm::Vec3,
    },
}

impl Light {
    pub fn ambient(intensity: f32) -> Self {
        Light::Ambient {
            color: Color::WHITE,
            intensity,
        }
    }

    pub fn directional(intensity: f32, position: glm::Vec3) -> Self {
        Light::Directional {
            color: Color::WHITE,
            intensity,
            position,
        }
    }
}

/// A mesh node flattened for drawing.
#[derive(Copy, Clone, Debug)]
pub struct Renderable {
    pub node: NodeId,
    pub world: glm::Mat4,
    pub mesh: Mesh,
}

pub struct Scene {
    id: SceneId,
    pub background: Color,
    pub lights: Vec<Light>,
    pub resources: Resources,
    nodes: BTreeMap<NodeId, Node>,
    roots: Vec<NodeId>,
    next_node: u64,
    subject: Option<NodeId>,
}

impl Scene {
    pub fn new(background: Color) -> Self {
        Self {
            id: SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)),
            background,
            lights: Vec::new(),
            resources: Resources::default(),
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            next_node: 0,
            subject: None,
        }
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Inserts `node` at the top level.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        let id = self.allocate();
        node.parent = None;
        node.children.clear();
        self.nodes.insert(id, node);
        self.roots.push(id);
        id
    }

    /// Inserts `node` under `parent`. Returns `None` (and drops the node) if
    /// the parent does not exist.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            log::warn!("Cannot attach node: parent {parent:?} is not in the scene");
            return None;
        }
        let id = self.allocate();
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        Some(id)
    }

    /// Removes a node and its subtree, returning the meshes they carried so
    /// the caller can release resources nobody else uses.
    pub fn remove(&mut self, id: NodeId) -> Vec<Mesh> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        match node.parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut meshes = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                meshes.extend(node.mesh);
                pending.extend(node.children);
            }
            if self.subject == Some(next) {
                self.subject = None;
            }
        }
        meshes
    }

    /// Removes every node. Lights, background and resources are kept.
    pub fn clear(&mut self) -> Vec<Mesh> {
        let roots = self.roots.clone();
        roots.into_iter().flat_map(|root| self.remove(root)).collect()
    }

    /// Swaps the subject: the previous subject (if any) is removed first,
    /// then `node` is inserted at the top level. Returns the new id and the
    /// meshes of the removed subject.
    pub fn replace_subject(&mut self, node: Node) -> (NodeId, Vec<Mesh>) {
        let removed = match self.subject.take() {
            Some(previous) => self.remove(previous),
            None => Vec::new(),
        };
        let id = self.add(node);
        self.subject = Some(id);
        (id, removed)
    }

    pub fn subject(&self) -> Option<NodeId> {
        self.subject
    }

    pub fn subject_node(&self) -> Option<&Node> {
        self.subject.and_then(|id| self.nodes.get(&id))
    }

    pub fn subject_node_mut(&mut self) -> Option<&mut Node> {
        self.subject.and_then(|id| self.nodes.get_mut(&id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.nodes.values().filter(|node| node.mesh.is_some()).count()
    }

    /// Composes local transforms from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> glm::Mat4 {
        let mut matrix = glm::Mat4::identity();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.nodes.get(&current) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// Every visible mesh in depth-first insertion order, with its world
    /// matrix. A hidden node hides its subtree.
    pub fn renderables(&self) -> Vec<Renderable> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.collect(*root, glm::Mat4::identity(), &mut out);
        }
        out
    }

    fn collect(&self, id: NodeId, parent_world: glm::Mat4, out: &mut Vec<Renderable>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let world = parent_world * node.transform.matrix();
        if let Some(mesh) = node.mesh {
            out.push(Renderable {
                node: id,
                world,
                mesh,
            });
        }
        for child in &node.children {
            self.collect(*child, world, out);
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{MIDNIGHT, PURPLE};
    use crate::geometry::Geometry;
    use crate::material::Material;

    fn scene_with_mesh() -> (Scene, Mesh) {
        let mut scene = Scene::new(MIDNIGHT);
        let geometry = scene.resources.add_geometry(Geometry::cuboid(1.0, 1.0, 1.0));
        let material = scene.resources.add_material(Material::standard(PURPLE));
        (scene, Mesh { geometry, material })
    }

    #[test]
    fn scene_ids_are_unique() {
        assert_ne!(Scene::new(MIDNIGHT).id(), Scene::new(MIDNIGHT).id());
    }

    #[test]
    fn removing_a_group_removes_children() {
        let (mut scene, mesh) = scene_with_mesh();
        let group = scene.add(Node::group());
        for x in 0..3 {
            scene
                .add_child(group, Node::mesh(mesh.geometry, mesh.material).at(glm::vec3(x as f32, 0.0, 0.0)))
                .unwrap();
        }
        assert_eq!(scene.node_count(), 4);
        let removed = scene.remove(group);
        assert_eq!(removed.len(), 3);
        assert_eq!(scene.node_count(), 0);
        assert!(scene.renderables().is_empty());
    }

    #[test]
    fn replace_subject_keeps_exactly_one() {
        let (mut scene, mesh) = scene_with_mesh();
        let (first, removed) = scene.replace_subject(Node::mesh(mesh.geometry, mesh.material));
        assert!(removed.is_empty());
        let (second, removed) = scene.replace_subject(Node::mesh(mesh.geometry, mesh.material));
        assert_eq!(removed, vec![mesh]);
        assert!(!scene.contains(first));
        assert_eq!(scene.subject(), Some(second));
        assert_eq!(scene.mesh_count(), 1);
    }

    #[test]
    fn world_matrix_composes_parents() {
        let (mut scene, mesh) = scene_with_mesh();
        let group = scene.add(Node::group().at(glm::vec3(1.0, 0.0, 0.0)));
        let child = scene
            .add_child(group, Node::mesh(mesh.geometry, mesh.material).at(glm::vec3(0.0, 2.0, 0.0)))
            .unwrap();
        let origin = scene.world_matrix(child) * glm::vec4(0.0, 0.0, 0.0, 1.0);
        assert!((origin.xyz() - glm::vec3(1.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let (mut scene, mesh) = scene_with_mesh();
        let id = scene.add(Node::mesh(mesh.geometry, mesh.material));
        scene.node_mut(id).unwrap().visible = false;
        assert!(scene.renderables().is_empty());
    }

    #[test]
    fn light_config_parses_from_toml() {
        #[derive(Deserialize)]
        struct Lights {
            lights: Vec<Light>,
        }
        let parsed: Lights = toml::from_str(
            r##"
            [[lights]]
            type = "ambient"
            color = "#ffffff"
            intensity = 0.4

            [[lights]]
            type = "directional"
            color = "#ffffff"
            intensity = 1.5
            "##,
        )
        .unwrap();
        assert_eq!(parsed.lights[0], Light::ambient(0.4));
        assert_eq!(
            parsed.lights[1],
            Light::directional(1.5, glm::vec3(0.0, 1.0, 0.0))
        );
    }
}
