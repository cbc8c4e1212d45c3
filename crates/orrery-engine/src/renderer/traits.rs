//! Renderer trait: the seam between scene logic and the drawing backend.
//!
//! In the browser the backend is the page's WebGL/WebGPU renderer, fed through
//! `bridge::recorder::FrameRecorder`. Tests use a recording mock.

use crate::components::material::MaterialLibrary;
use crate::core::scene::Scene;
use crate::error::RenderError;
use crate::renderer::bloom::BloomSettings;
use crate::renderer::camera::PerspectiveCamera;

/// Where a pass writes its pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RenderTarget {
    /// The visible canvas.
    Screen = 0,
    /// Offscreen full-scene render, input to the final composite.
    Primary = 1,
    /// Offscreen render with non-bloom nodes hidden; bright-pass input.
    BloomSource = 2,
    /// Blurred glow buffer produced by the bloom pass.
    Bloom = 3,
}

impl RenderTarget {
    pub const ALL: [RenderTarget; 4] = [
        RenderTarget::Screen,
        RenderTarget::Primary,
        RenderTarget::BloomSource,
        RenderTarget::Bloom,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Everything a backend needs to draw one scene pass.
pub struct FrameData<'a> {
    pub scene: &'a Scene,
    pub materials: &'a MaterialLibrary,
    pub camera: &'a PerspectiveCamera,
}

/// Drawing backend.
///
/// Implementors draw with whatever engine they wrap; the selective bloom
/// compositor only sequences calls and swaps materials around them.
pub trait Renderer {
    /// Backend identifier (e.g. "recorder", "mock").
    fn backend(&self) -> &'static str;

    /// Draw every visible node of `frame.scene` into `target`.
    fn render_scene(&mut self, frame: &FrameData, target: RenderTarget) -> Result<(), RenderError>;

    /// Bright-pass, blur, and merge `source` into `dest`.
    fn bloom_pass(
        &mut self,
        settings: &BloomSettings,
        source: RenderTarget,
        dest: RenderTarget,
    ) -> Result<(), RenderError>;

    /// Additively combine `base + bloom` into `dest` with a full-screen pass.
    fn composite(
        &mut self,
        base: RenderTarget,
        bloom: RenderTarget,
        dest: RenderTarget,
    ) -> Result<(), RenderError>;

    /// Resize every render target and full-screen pass, in device pixels.
    fn resize(&mut self, width: u32, height: u32);

    /// Discard whatever this frame has produced so far. Called before a
    /// fallback render so nothing half-composited is presented.
    fn reset_frame(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_codes_are_stable() {
        let codes: Vec<u8> = RenderTarget::ALL.iter().map(|t| t.as_u8()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }
}
