use bytemuck::{Pod, Zeroable};

use crate::components::node::Node;

/// Per-node draw record written to the shared buffer for the page renderer.
/// Must match the TypeScript protocol: 20 floats = 80 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeInstance {
    /// Column-major world matrix.
    pub world: [f32; 16],
    pub node_id: f32,
    pub material_id: f32,
    /// `Geometry::kind_code`.
    pub geometry_kind: f32,
    /// Layer mask bits.
    pub layers: f32,
}

impl NodeInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Draw record for a drawable node; `None` for pivots and hidden nodes.
    pub fn from_node(node: &Node) -> Option<Self> {
        if !node.is_drawable() {
            return None;
        }
        let geometry = node.geometry.as_ref()?;
        let material = node.material?;
        Some(Self {
            world: node.world.to_cols_array(),
            node_id: node.id.0 as f32,
            material_id: material.0 as f32,
            geometry_kind: geometry.kind_code() as f32,
            layers: node.layers.bits() as f32,
        })
    }
}

/// Point-sprite vertex: star in the static cloud or one trail sample.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub alpha: f32,
    pub size: f32,
}

impl PointVertex {
    pub const FLOATS: usize = 8;

    pub fn new(position: [f32; 3], color: [f32; 3], alpha: f32, size: f32) -> Self {
        Self { position, color, alpha, size }
    }
}

/// Pass kinds the page replays, in recorded order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PassKind {
    /// Draw instances `[a, a + b)` into `target`.
    Scene = 1,
    /// Bloom from target `a` into `target`.
    Bloom = 2,
    /// Additive composite of targets `a` + `b` into `target`.
    Composite = 3,
}

/// One recorded pass. 4 floats: kind, target, a, b.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PassRecord {
    pub kind: f32,
    pub target: f32,
    pub a: f32,
    pub b: f32,
}

impl PassRecord {
    pub const FLOATS: usize = 4;

    pub fn new(kind: PassKind, target: u8, a: u32, b: u32) -> Self {
        Self {
            kind: kind as u8 as f32,
            target: target as f32,
            a: a as f32,
            b: b as f32,
        }
    }
}

/// Instances of every pass recorded this frame, back to back.
pub struct InstanceBuffer {
    instances: Vec<NodeInstance>,
}

impl InstanceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Drop everything past `len`. Used to roll back a failed pass.
    pub fn truncate(&mut self, len: usize) {
        self.instances.truncate(len);
    }

    pub fn push(&mut self, instance: NodeInstance) {
        self.instances.push(instance);
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn as_slice(&self) -> &[NodeInstance] {
        &self.instances
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::with_capacity(256)
    }
}
