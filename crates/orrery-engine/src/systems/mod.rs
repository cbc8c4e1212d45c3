pub mod lighting;
pub mod rng;

pub use lighting::{AmbientLight, LightState, PointLight};
pub use rng::Rng;
