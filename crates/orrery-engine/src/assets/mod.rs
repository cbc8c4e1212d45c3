pub mod cubemap;
pub mod manifest;
pub mod registry;

pub use manifest::{TextureDescriptor, TextureKind, TextureManifest};
pub use registry::{LoadSummary, TextureRegistry, TextureRequest, TextureState};
