// extensions/cascade.rs
//
// Per-body switches that apply to a node and everything hanging off it.
// Switching off snapshots the subtree; switching back on restores the snapshot,
// so children that were already off stay off.
//
// Usage:
//   let mut bloom = CascadeToggle::bloom();
//   bloom.set(&mut scene, &graph, saturn, false);  // planet + ring leave the bloom layer
//   bloom.set(&mut scene, &graph, saturn, true);   // prior masks come back

use std::collections::HashMap;
use crate::api::types::NodeId;
use crate::components::layer::Layers;
use crate::components::node::Node;
use crate::core::scene::Scene;
use crate::extensions::transform::TransformGraph;

/// Node property a cascade toggle drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeKind {
    Visibility,
    Bloom,
}

impl CascadeKind {
    fn read(self, node: &Node) -> u32 {
        match self {
            CascadeKind::Visibility => node.visible as u32,
            CascadeKind::Bloom => node.layers.bits(),
        }
    }

    fn write(self, node: &mut Node, saved: u32) {
        match self {
            CascadeKind::Visibility => node.visible = saved != 0,
            CascadeKind::Bloom => node.layers = Layers::from_bits(saved),
        }
    }

    fn switch(self, node: &mut Node, on: bool) {
        match self {
            CascadeKind::Visibility => node.visible = on,
            CascadeKind::Bloom => node.layers.set(Layers::BLOOM_SCENE, on),
        }
    }
}

/// Subtree on/off switch with snapshot restore.
#[derive(Debug)]
pub struct CascadeToggle {
    kind: CascadeKind,
    /// Root → prior state of root and descendants.
    suppressed: HashMap<NodeId, Vec<(NodeId, u32)>>,
}

impl CascadeToggle {
    pub fn new(kind: CascadeKind) -> Self {
        Self {
            kind,
            suppressed: HashMap::new(),
        }
    }

    pub fn visibility() -> Self {
        Self::new(CascadeKind::Visibility)
    }

    pub fn bloom() -> Self {
        Self::new(CascadeKind::Bloom)
    }

    pub fn kind(&self) -> CascadeKind {
        self.kind
    }

    /// Whether `root` is currently switched off by this toggle.
    pub fn is_off(&self, root: NodeId) -> bool {
        self.suppressed.contains_key(&root)
    }

    /// Switch `root` and its descendants. Repeating the current state is a no-op.
    pub fn set(&mut self, scene: &mut Scene, graph: &TransformGraph, root: NodeId, on: bool) {
        if on {
            match self.suppressed.remove(&root) {
                Some(snapshot) => {
                    for (id, saved) in snapshot {
                        if let Some(node) = scene.get_mut(id) {
                            self.kind.write(node, saved);
                        }
                    }
                }
                None => self.switch_subtree(scene, graph, root, true),
            }
            return;
        }

        if self.suppressed.contains_key(&root) {
            return;
        }
        let mut snapshot = Vec::new();
        for id in std::iter::once(root).chain(graph.descendants(root)) {
            if let Some(node) = scene.get(id) {
                snapshot.push((id, self.kind.read(node)));
            }
        }
        self.suppressed.insert(root, snapshot);
        self.switch_subtree(scene, graph, root, false);
    }

    fn switch_subtree(&self, scene: &mut Scene, graph: &TransformGraph, root: NodeId, on: bool) {
        for id in std::iter::once(root).chain(graph.descendants(root)) {
            if let Some(node) = scene.get_mut(id) {
                self.kind.switch(node, on);
            }
        }
    }

    /// Forget every snapshot without touching the scene.
    pub fn clear(&mut self) {
        self.suppressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // planet(1) ── ring(2)
    //          └── pivot(3) ── moon(4)
    fn fixture() -> (Scene, TransformGraph) {
        let mut scene = Scene::new();
        scene.spawn(Node::new(NodeId(1)).with_layers(Layers::scene_and_bloom()));
        scene.spawn(Node::new(NodeId(2)).with_layers(Layers::scene_and_bloom()));
        scene.spawn(Node::new(NodeId(3)));
        scene.spawn(Node::new(NodeId(4)).with_layers(Layers::scene()));
        let mut graph = TransformGraph::new();
        graph.set_parent(NodeId(2), Some(NodeId(1)));
        graph.set_parent(NodeId(3), Some(NodeId(1)));
        graph.set_parent(NodeId(4), Some(NodeId(3)));
        (scene, graph)
    }

    fn masks(scene: &Scene) -> Vec<u32> {
        scene.iter().map(|n| n.layers.bits()).collect()
    }

    #[test]
    fn bloom_off_cascades_to_children() {
        let (mut scene, graph) = fixture();
        let mut bloom = CascadeToggle::bloom();
        bloom.set(&mut scene, &graph, NodeId(1), false);
        assert!(scene.iter().all(|n| !n.layers.is_bloom()));
        assert!(scene.iter().all(|n| n.layers.is_enabled(Layers::ENTIRE_SCENE)));
        assert!(bloom.is_off(NodeId(1)));
    }

    #[test]
    fn bloom_off_then_on_restores_prior_masks() {
        let (mut scene, graph) = fixture();
        let before = masks(&scene);
        let mut bloom = CascadeToggle::bloom();
        bloom.set(&mut scene, &graph, NodeId(1), false);
        bloom.set(&mut scene, &graph, NodeId(1), true);
        // The moon was never bloom-eligible and stays that way.
        assert_eq!(masks(&scene), before);
        assert!(!bloom.is_off(NodeId(1)));
    }

    #[test]
    fn repeated_off_keeps_first_snapshot() {
        let (mut scene, graph) = fixture();
        let before = masks(&scene);
        let mut bloom = CascadeToggle::bloom();
        bloom.set(&mut scene, &graph, NodeId(1), false);
        bloom.set(&mut scene, &graph, NodeId(1), false);
        bloom.set(&mut scene, &graph, NodeId(1), true);
        assert_eq!(masks(&scene), before);
    }

    #[test]
    fn on_without_snapshot_enables_subtree() {
        let (mut scene, graph) = fixture();
        let mut bloom = CascadeToggle::bloom();
        bloom.set(&mut scene, &graph, NodeId(3), true);
        assert!(scene.get(NodeId(4)).unwrap().layers.is_bloom());
    }

    #[test]
    fn visibility_cascades_and_restores() {
        let (mut scene, graph) = fixture();
        scene.get_mut(NodeId(2)).unwrap().visible = false;
        let mut vis = CascadeToggle::visibility();
        vis.set(&mut scene, &graph, NodeId(1), false);
        assert!(scene.iter().all(|n| !n.visible));
        vis.set(&mut scene, &graph, NodeId(1), true);
        assert!(!scene.get(NodeId(2)).unwrap().visible);
        assert!(scene.get(NodeId(4)).unwrap().visible);
    }
}
