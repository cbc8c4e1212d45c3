use serde::Serialize;
use crate::api::types::{MaterialId, NodeId};
use crate::components::mesh::Geometry;
use crate::components::node::Node;

/// Per-node geometry description the page tessellates from.
#[derive(Debug, Serialize)]
pub struct NodeDescription<'a> {
    pub id: NodeId,
    pub tag: &'a str,
    pub geometry: Option<&'a Geometry>,
}

/// Simple node storage using a flat Vec.
/// Designed for small scenes (dozens to hundreds of nodes, not millions).
pub struct Scene {
    nodes: Vec<Node>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(64),
        }
    }

    /// Create a scene with a specific node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a node to the scene.
    pub fn spawn(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Remove a node by ID. Returns the removed node if found.
    /// Keeps insertion order so draw order stays stable.
    pub fn despawn(&mut self, id: NodeId) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(idx))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// Find the first node with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.tag == tag)
    }

    /// Current material assignment of every node that has one.
    /// Used to check that a darken/restore cycle leaves the scene untouched.
    pub fn material_snapshot(&self) -> Vec<(NodeId, MaterialId)> {
        self.nodes
            .iter()
            .filter_map(|n| n.material.map(|m| (n.id, m)))
            .collect()
    }

    pub fn describe(&self) -> Vec<NodeDescription<'_>> {
        self.nodes
            .iter()
            .map(|n| NodeDescription {
                id: n.id,
                tag: &n.tag,
                geometry: n.geometry.as_ref(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = NodeId(1);
        scene.spawn(Node::new(id).with_translation(Vec3::new(10.0, 20.0, 0.0)));
        let node = scene.get(id).unwrap();
        assert_eq!(node.local.translation, Vec3::new(10.0, 20.0, 0.0));
    }

    #[test]
    fn despawn_keeps_order() {
        let mut scene = Scene::new();
        for i in 1..=3 {
            scene.spawn(Node::new(NodeId(i)));
        }
        scene.despawn(NodeId(2));
        let ids: Vec<_> = scene.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(3)]);
    }

    #[test]
    fn find_by_tag() {
        let mut scene = Scene::new();
        scene.spawn(Node::new(NodeId(1)).with_tag("sun"));
        scene.spawn(Node::new(NodeId(2)).with_tag("earth"));
        assert_eq!(scene.find_by_tag("earth").map(|n| n.id), Some(NodeId(2)));
    }

    #[test]
    fn describe_lists_geometry() {
        let mut scene = Scene::new();
        scene.spawn(Node::new(NodeId(1)).with_tag("sun").with_geometry(Geometry::sphere(5.0, 64)));
        let json = serde_json::to_string(&scene.describe()).unwrap();
        assert!(json.contains("\"tag\":\"sun\""));
        assert!(json.contains("\"type\":\"sphere\""));
    }

    #[test]
    fn material_snapshot_skips_pivots() {
        let mut scene = Scene::new();
        scene.spawn(Node::new(NodeId(1)).with_material(MaterialId(5)));
        scene.spawn(Node::new(NodeId(2)));
        assert_eq!(scene.material_snapshot(), vec![(NodeId(1), MaterialId(5))]);
    }
}
