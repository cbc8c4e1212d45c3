// extensions/transform.rs
//
// Transform hierarchy: tracks parent-child relationships by NodeId.
// Local transforms live on the nodes; this graph only knows who hangs off whom.
//
// Usage:
//   let mut graph = TransformGraph::new();
//   graph.set_parent(moon_pivot, Some(earth));
//   graph.propagate(&mut scene);  // world = parent.world * local

use std::collections::HashMap;
use glam::Mat4;
use crate::api::types::NodeId;
use crate::core::scene::Scene;

#[derive(Debug, Clone, Default)]
struct TransformNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Transform hierarchy graph: manages parent-child relationships.
///
/// Exists separately from Scene; propagation runs every frame after the
/// animation step has written local transforms.
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: HashMap<NodeId, TransformNode>,
    /// Nodes with no parent, in registration order.
    roots: Vec<NodeId>,
}

impl TransformGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node as a root. No-op if already registered.
    pub fn register(&mut self, id: NodeId) {
        if self.nodes.contains_key(&id) {
            return;
        }
        self.nodes.insert(id, TransformNode::default());
        self.roots.push(id);
    }

    /// Set the parent of a node. Pass `None` to make it a root.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) {
        self.register(child);
        if let Some(p) = parent {
            self.register(p);
        }

        // Detach from old parent
        if let Some(old_parent) = self.nodes.get(&child).and_then(|n| n.parent) {
            if let Some(old_node) = self.nodes.get_mut(&old_parent) {
                old_node.children.retain(|&c| c != child);
            }
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
        }

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    if !parent_node.children.contains(&child) {
                        parent_node.children.push(child);
                    }
                }
                self.roots.retain(|&r| r != child);
            }
            None => {
                if !self.roots.contains(&child) {
                    self.roots.push(child);
                }
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// All nodes below `id`, depth-first, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Remove a node from the hierarchy. Children become roots.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else { return };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.retain(|&c| c != id);
            }
        }
        for child in node.children {
            if let Some(child_node) = self.nodes.get_mut(&child) {
                child_node.parent = None;
            }
            if !self.roots.contains(&child) {
                self.roots.push(child);
            }
        }
        self.roots.retain(|&r| r != id);
    }

    /// Recompute every registered node's world matrix from the roots down.
    pub fn propagate(&self, scene: &mut Scene) {
        for &root in &self.roots {
            self.propagate_recursive(root, Mat4::IDENTITY, scene);
        }
    }

    fn propagate_recursive(&self, id: NodeId, parent_world: Mat4, scene: &mut Scene) {
        let Some(node) = self.nodes.get(&id) else { return };
        let world = match scene.get_mut(id) {
            Some(entry) => {
                entry.world = parent_world * entry.local.matrix();
                entry.world
            }
            None => parent_world,
        };
        for &child in &node.children {
            self.propagate_recursive(child, world, scene);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}
