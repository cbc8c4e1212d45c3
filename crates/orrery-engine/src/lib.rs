pub mod api;
pub mod assets;
pub mod bridge;
pub mod components;
pub mod controls;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig, InitReport, InitStatus};
pub use api::types::{GameEvent, MaterialId, NodeId, TextureId};
pub use assets::{LoadSummary, TextureKind, TextureManifest, TextureRegistry, TextureRequest, TextureState};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::recorder::{FrameRecorder, FrameSummary};
pub use components::layer::Layers;
pub use components::material::{
    BasicMaterial, Color, Material, MaterialLibrary, PointsMaterial, ShaderMaterial, SkyMaterial,
    SkySource, StandardMaterial, UniformSet, UniformValue,
};
pub use components::mesh::Geometry;
pub use components::node::{Node, Transform};
pub use controls::{ControlDescription, ControlKind, ControlPanel, ControlRange, ControlSpec};
pub use core::scene::Scene;
pub use core::time::FrameClock;
pub use error::{AssetError, ControlError, RenderError};
pub use extensions::{CascadeKind, CascadeToggle, TransformGraph};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::{
    BloomSettings, CameraUniform, FrameData, FrameOutcome, MaterialSwapTable, NodeInstance,
    PerspectiveCamera, PointVertex, RenderTarget, Renderer, SelectiveBloom, Viewport,
};
pub use systems::{AmbientLight, LightState, PointLight, Rng};
