/// Scene lighting: one ambient term plus point lights.
///
/// Lights are persistent: they stay until explicitly removed.
/// Each frame the recorder serializes the ambient term and active lights
/// for the page's lit materials.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A 3D point light.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, distance]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    /// Falloff distance in world units. 0 means no falloff.
    pub distance: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(position: Vec3, color: [f32; 3], intensity: f32, distance: f32) -> Self {
        Self {
            position: position.to_array(),
            color,
            intensity,
            distance,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position.to_array();
        self
    }
}

/// Ambient term. Wire format: `[r, g, b, intensity]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl AmbientLight {
    pub const FLOATS: usize = 4;
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.1,
        }
    }
}

/// Manages active lights and the ambient term for the scene.
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: AmbientLight,
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(4)
    }

    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: AmbientLight::default(),
        }
    }

    /// Add a point light. Returns its index.
    pub fn add(&mut self, light: PointLight) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PointLight> {
        self.lights.get_mut(index)
    }

    /// Remove all point lights.
    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn as_slice(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient_intensity(&mut self, intensity: f32) {
        self.ambient.intensity = intensity.max(0.0);
    }

    pub fn set_ambient_color(&mut self, color: [f32; 3]) {
        self.ambient.color = color;
    }

    pub fn ambient(&self) -> AmbientLight {
        self.ambient
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), PointLight::FLOATS * 4);
        assert_eq!(std::mem::size_of::<AmbientLight>(), AmbientLight::FLOATS * 4);
    }

    #[test]
    fn add_and_tune() {
        let mut state = LightState::new();
        let sun = state.add(PointLight::new(Vec3::ZERO, [1.0, 0.95, 0.8], 2.0, 0.0));
        state.get_mut(sun).unwrap().intensity = 3.5;
        assert_eq!(state.count(), 1);
        assert_eq!(state.as_slice()[0].intensity, 3.5);
    }

    #[test]
    fn ambient_intensity_never_negative() {
        let mut state = LightState::new();
        state.set_ambient_intensity(-1.0);
        assert_eq!(state.ambient().intensity, 0.0);
    }

    #[test]
    fn clear_removes_point_lights_only() {
        let mut state = LightState::new();
        state.set_ambient_intensity(0.3);
        state.add(PointLight::new(Vec3::X, [1.0; 3], 1.0, 100.0));
        state.clear();
        assert_eq!(state.count(), 0);
        assert_eq!(state.ambient().intensity, 0.3);
    }
}
