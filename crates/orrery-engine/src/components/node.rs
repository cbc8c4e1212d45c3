use glam::{Mat4, Quat, Vec3};
use crate::api::types::{MaterialId, NodeId};
use crate::components::layer::Layers;
use crate::components::mesh::Geometry;

/// Local transform of a node relative to its parent (or the world for roots).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Fat node: a single struct with optional render components.
/// Nodes without geometry are pure transform pivots.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// String tag for finding nodes by name.
    pub tag: String,
    /// Hidden nodes are skipped by every pass.
    pub visible: bool,
    /// Transform relative to the parent.
    pub local: Transform,
    /// World matrix, written by `TransformGraph::propagate`.
    pub world: Mat4,
    pub geometry: Option<Geometry>,
    pub material: Option<MaterialId>,
    pub layers: Layers,
}

impl Node {
    /// Create a new visible node at the origin on the scene layer.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            tag: String::new(),
            visible: true,
            local: Transform::default(),
            world: Mat4::IDENTITY,
            geometry: None,
            material: None,
            layers: Layers::default(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.local.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.local.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.local.scale = scale;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    /// World-space position taken from the propagated world matrix.
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Whether the node produces pixels in any pass.
    pub fn is_drawable(&self) -> bool {
        self.visible && self.material.is_some()
    }
}
