/// Render layer membership as a 32-bit mask.
///
/// Layer 0 is the whole scene; every node starts on it.
/// Layer 1 marks a node as bloom-eligible for the selective bloom pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layers(u32);

impl Layers {
    /// Layer every drawable node belongs to.
    pub const ENTIRE_SCENE: u8 = 0;
    /// Layer that feeds the bloom buffer.
    pub const BLOOM_SCENE: u8 = 1;

    /// A mask with only the entire-scene layer enabled.
    pub const fn scene() -> Self {
        Self(1 << Self::ENTIRE_SCENE)
    }

    /// A mask with both the scene and bloom layers enabled.
    pub const fn scene_and_bloom() -> Self {
        Self((1 << Self::ENTIRE_SCENE) | (1 << Self::BLOOM_SCENE))
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn enable(&mut self, layer: u8) {
        self.0 |= 1 << layer;
    }

    pub fn disable(&mut self, layer: u8) {
        self.0 &= !(1 << layer);
    }

    pub fn toggle(&mut self, layer: u8) {
        self.0 ^= 1 << layer;
    }

    pub fn set(&mut self, layer: u8, on: bool) {
        if on {
            self.enable(layer);
        } else {
            self.disable(layer);
        }
    }

    pub fn is_enabled(self, layer: u8) -> bool {
        self.0 & (1 << layer) != 0
    }

    /// True when both masks share at least one layer.
    pub fn test(self, other: Layers) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_bloom(self) -> bool {
        self.is_enabled(Self::BLOOM_SCENE)
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::scene()
    }
}
