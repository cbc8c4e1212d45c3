//! Sun and corona shader parameters and their uniform sets.
//!
//! Program names match the page's shader registry.

use orrery_engine::{UniformSet, UniformValue};
use serde::Serialize;

pub const SUN_PROGRAM: &str = "sun";
pub const CORONA_PROGRAM: &str = "corona";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunParams {
    /// fBm octave count.
    pub octaves: u32,
    pub lacunarity: f32,
    pub gain: f32,
    /// Surface pattern rotation, radians per second.
    pub rotation_speed: f32,
    pub sunspot_intensity: f32,
    pub base_color: [f32; 3],
    pub spot_color: [f32; 3],
}

impl Default for SunParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            lacunarity: 2.0,
            gain: 0.5,
            rotation_speed: 0.05,
            sunspot_intensity: 0.4,
            base_color: [1.0, 0.6, 0.15],
            spot_color: [0.45, 0.12, 0.02],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoronaParams {
    /// Shell scale relative to the default corona radius.
    pub size: f32,
    pub intensity: f32,
    pub pulse_speed: f32,
    pub color: [f32; 3],
}

impl Default for CoronaParams {
    fn default() -> Self {
        Self {
            size: 1.0,
            intensity: 0.8,
            pulse_speed: 0.6,
            color: [1.0, 0.55, 0.1],
        }
    }
}

pub fn sun_uniforms(params: &SunParams) -> UniformSet {
    let mut set = UniformSet::new().with("time", UniformValue::Float(0.0));
    write_sun(&mut set, params);
    set
}

pub fn corona_uniforms(params: &CoronaParams) -> UniformSet {
    let mut set = UniformSet::new().with("time", UniformValue::Float(0.0));
    write_corona(&mut set, params);
    set
}

pub fn write_sun(set: &mut UniformSet, params: &SunParams) {
    set.set_int("octaves", params.octaves as i32);
    set.set_float("lacunarity", params.lacunarity);
    set.set_float("gain", params.gain);
    set.set_float("rotation_speed", params.rotation_speed);
    set.set_float("sunspot_intensity", params.sunspot_intensity);
    set.set_vec3("base_color", params.base_color);
    set.set_vec3("spot_color", params.spot_color);
}

pub fn write_corona(set: &mut UniformSet, params: &CoronaParams) {
    set.set_float("size", params.size);
    set.set_float("intensity", params.intensity);
    set.set_float("pulse_speed", params.pulse_speed);
    set.set_vec3("color", params.color);
}

/// Advance the shared clock uniform.
pub fn write_time(set: &mut UniformSet, elapsed: f32) {
    set.set_float("time", elapsed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_leads_and_stays_in_place() {
        let mut set = sun_uniforms(&SunParams::default());
        let len = set.len();
        write_time(&mut set, 3.5);
        write_sun(&mut set, &SunParams { gain: 0.7, ..Default::default() });
        assert_eq!(set.len(), len);
        assert_eq!(set.iter().next().map(|(name, _)| *name), Some("time"));
        assert_eq!(set.float("time"), Some(3.5));
        assert_eq!(set.float("gain"), Some(0.7));
    }

    #[test]
    fn corona_layout_is_stable() {
        let set = corona_uniforms(&CoronaParams::default());
        let mut floats = Vec::new();
        set.write_floats(&mut floats);
        // time, size, intensity, pulse_speed, color.rgb
        assert_eq!(floats.len(), 7);
        assert_eq!(floats[1], 1.0);
    }
}
