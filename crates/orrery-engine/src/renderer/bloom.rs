//! Bloom pass parameters.
//!
//! The pass itself (bright-pass threshold, mip-chain blur, merge) runs in the
//! backend; this side owns the tunables and the target sizes.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Tunables for the bloom post-process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloomSettings {
    /// Glow intensity multiplier.
    pub strength: f32,
    /// Blur spread, 0 (tight) to 1 (wide).
    pub radius: f32,
    /// Luminance threshold; only pixels brighter than this glow.
    pub threshold: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            strength: 1.5,
            radius: 0.4,
            threshold: 0.0,
        }
    }
}

impl BloomSettings {
    pub const STRENGTH_MAX: f32 = 5.0;

    /// Keep every field inside the range the backend accepts.
    pub fn sanitized(self) -> Self {
        Self {
            strength: self.strength.clamp(0.0, Self::STRENGTH_MAX),
            radius: self.radius.clamp(0.0, 1.0),
            threshold: self.threshold.clamp(0.0, 1.0),
        }
    }

    pub fn params(&self) -> BloomParams {
        let s = self.sanitized();
        BloomParams {
            strength: s.strength,
            radius: s.radius,
            threshold: s.threshold,
            _pad: 0.0,
        }
    }
}

/// Wire form of the bloom settings (4 floats).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BloomParams {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    pub _pad: f32,
}

/// Sizes of the offscreen targets, tracked so resizes reach every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSizes {
    pub primary: (u32, u32),
    pub bloom: (u32, u32),
    pub composite: (u32, u32),
}

impl TargetSizes {
    pub fn for_physical(width: u32, height: u32) -> Self {
        let size = (width.max(1), height.max(1));
        Self {
            primary: size,
            bloom: size,
            composite: size,
        }
    }
}
