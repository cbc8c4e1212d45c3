//! Error types shared across the engine.
//!
//! Nothing here is fatal to a session: render errors degrade a single frame,
//! asset errors degrade a material, control errors are reported back to the page.

use crate::api::types::{NodeId, TextureId};

/// Errors raised while recording or executing a frame's render passes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// A visible node carries a material but its geometry has been disposed.
    #[error("node {0:?} has a material but no geometry")]
    MissingGeometry(NodeId),

    /// A pass wrote more records than the shared buffer can hold.
    #[error("{section} capacity exceeded ({requested} > {capacity})")]
    CapacityExceeded {
        section: &'static str,
        requested: usize,
        capacity: usize,
    },

    /// The backend reported a failure for a specific pass.
    #[error("backend failure in {pass}: {reason}")]
    Backend { pass: &'static str, reason: String },
}

/// Errors raised by texture and manifest handling.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to parse manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),

    #[error("texture {name} failed to load: {reason}")]
    LoadFailed { name: String, reason: String },
}

/// Errors raised by the control panel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControlError {
    #[error("unknown control `{0}`")]
    UnknownKey(String),

    #[error("control index {0} out of range")]
    UnknownIndex(usize),

    #[error("non-finite value for control `{0}`")]
    NotFinite(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_messages_name_the_node() {
        let err = RenderError::MissingGeometry(NodeId(7));
        assert!(err.to_string().contains("NodeId(7)"));
    }
}
