// extensions/mod.rs
//
// Optional extension modules layered over the flat Scene.
// Games opt in by creating these alongside the scene.

pub mod cascade;
pub mod transform;

pub use cascade::{CascadeKind, CascadeToggle};
pub use transform::TransformGraph;
