pub mod bloom;
pub mod camera;
pub mod compositor;
pub mod instance;
pub mod traits;

// Re-export key types for convenient access
pub use bloom::{BloomParams, BloomSettings, TargetSizes};
pub use camera::{CameraUniform, PerspectiveCamera, Viewport};
pub use compositor::{CompositorStats, FrameOutcome, MaterialSwapTable, SelectiveBloom};
pub use instance::{InstanceBuffer, NodeInstance, PassKind, PassRecord, PointVertex};
pub use traits::{FrameData, RenderTarget, Renderer};
