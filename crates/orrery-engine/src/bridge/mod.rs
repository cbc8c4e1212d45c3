pub mod protocol;
pub mod recorder;
