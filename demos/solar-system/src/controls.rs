//! Tweak-panel parameter store and one control table per group.
//!
//! A control write lands in `Params` first; `SolarSystem::sync` then pushes the
//! touched group into the scene.

use orrery_engine::controls::{is_on, unpack_rgb};
use orrery_engine::{ControlPanel, ControlRange, ControlSpec};
use serde::Serialize;

use crate::bodies::{self, BODIES};
use crate::uniforms::{CoronaParams, SunParams};

pub const GROUP_SUN: &str = "sun";
pub const GROUP_CORONA: &str = "corona";
pub const GROUP_BLOOM: &str = "bloom";
pub const GROUP_CAMERA: &str = "camera";
pub const GROUP_LIGHTS: &str = "lights";
pub const GROUP_SCENE: &str = "scene";
pub const GROUP_VISIBILITY: &str = "visibility";

pub const GROUPS: [&str; 7] = [
    GROUP_SUN,
    GROUP_CORONA,
    GROUP_BLOOM,
    GROUP_CAMERA,
    GROUP_LIGHTS,
    GROUP_SCENE,
    GROUP_VISIBILITY,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BloomParams {
    pub enabled: bool,
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    pub sun: bool,
    pub corona: bool,
    pub planets: bool,
    pub starfield: bool,
    pub shooting_stars: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraParams {
    pub distance: f32,
    /// Radians per second around the sun.
    pub auto_rotate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightParams {
    pub ambient: f32,
    pub sun_light: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneParams {
    pub background: [f32; 3],
    pub segments: u32,
    pub planet_scale: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisibilityParams {
    pub show_all: bool,
    pub sun: bool,
    /// Indexed like `BODIES`.
    pub bodies: [bool; BODIES.len()],
}

impl VisibilityParams {
    pub fn set_body(&mut self, name: &str, on: bool) {
        if let Some((index, _)) = bodies::find(name) {
            self.bodies[index] = on;
        }
    }

    /// Whether body `index` should be drawn, taking show-all into account.
    pub fn body_visible(&self, index: usize) -> bool {
        self.show_all && self.bodies.get(index).copied().unwrap_or(true)
    }

    pub fn sun_visible(&self) -> bool {
        self.show_all && self.sun
    }
}

/// Every live-tunable value. Serialised for the page's debug view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Params {
    pub sun: SunParams,
    pub corona: CoronaParams,
    pub bloom: BloomParams,
    pub camera: CameraParams,
    pub lights: LightParams,
    pub scene: SceneParams,
    pub visibility: VisibilityParams,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            sun: SunParams::default(),
            corona: CoronaParams::default(),
            bloom: BloomParams {
                enabled: true,
                strength: 1.5,
                radius: 0.4,
                threshold: 0.0,
                sun: true,
                corona: true,
                planets: false,
                starfield: true,
                shooting_stars: true,
            },
            camera: CameraParams { distance: 90.0, auto_rotate: 0.0 },
            lights: LightParams { ambient: 0.15, sun_light: 2.0 },
            scene: SceneParams { background: [0.0; 3], segments: 48, planet_scale: 1.0 },
            visibility: VisibilityParams { show_all: true, sun: true, bodies: [true; BODIES.len()] },
        }
    }
}

type Spec = ControlSpec<Params>;

pub const SUN: &[Spec] = &[
    Spec::slider("sun.octaves", GROUP_SUN, "Noise octaves", ControlRange::new(1.0, 8.0, 1.0), 5.0, |p: &mut Params, v: f32| p.sun.octaves = v as u32),
    Spec::slider("sun.lacunarity", GROUP_SUN, "Lacunarity", ControlRange::new(1.0, 4.0, 0.05), 2.0, |p: &mut Params, v: f32| p.sun.lacunarity = v),
    Spec::slider("sun.gain", GROUP_SUN, "Gain", ControlRange::new(0.0, 1.0, 0.01), 0.5, |p: &mut Params, v: f32| p.sun.gain = v),
    Spec::slider("sun.rotation", GROUP_SUN, "Rotation", ControlRange::new(0.0, 0.5, 0.005), 0.05, |p: &mut Params, v: f32| p.sun.rotation_speed = v),
    Spec::slider("sun.sunspots", GROUP_SUN, "Sunspots", ControlRange::new(0.0, 1.0, 0.01), 0.4, |p: &mut Params, v: f32| p.sun.sunspot_intensity = v),
    Spec::color("sun.base_color", GROUP_SUN, "Base color", 0xff9926, |p: &mut Params, v: f32| p.sun.base_color = unpack_rgb(v)),
    Spec::color("sun.spot_color", GROUP_SUN, "Spot color", 0x731f05, |p: &mut Params, v: f32| p.sun.spot_color = unpack_rgb(v)),
];

pub const CORONA: &[Spec] = &[
    Spec::slider("corona.size", GROUP_CORONA, "Size", ControlRange::new(0.5, 3.0, 0.01), 1.0, |p: &mut Params, v: f32| p.corona.size = v),
    Spec::slider("corona.intensity", GROUP_CORONA, "Intensity", ControlRange::new(0.0, 2.0, 0.01), 0.8, |p: &mut Params, v: f32| p.corona.intensity = v),
    Spec::slider("corona.pulse", GROUP_CORONA, "Pulse speed", ControlRange::new(0.0, 5.0, 0.05), 0.6, |p: &mut Params, v: f32| p.corona.pulse_speed = v),
    Spec::color("corona.color", GROUP_CORONA, "Color", 0xff8c1a, |p: &mut Params, v: f32| p.corona.color = unpack_rgb(v)),
];

pub const BLOOM: &[Spec] = &[
    Spec::toggle("bloom.enabled", GROUP_BLOOM, "Bloom", true, |p: &mut Params, v: f32| p.bloom.enabled = is_on(v)),
    Spec::slider("bloom.strength", GROUP_BLOOM, "Strength", ControlRange::new(0.0, 5.0, 0.05), 1.5, |p: &mut Params, v: f32| p.bloom.strength = v),
    Spec::slider("bloom.radius", GROUP_BLOOM, "Radius", ControlRange::new(0.0, 1.0, 0.01), 0.4, |p: &mut Params, v: f32| p.bloom.radius = v),
    Spec::slider("bloom.threshold", GROUP_BLOOM, "Threshold", ControlRange::new(0.0, 1.0, 0.01), 0.0, |p: &mut Params, v: f32| p.bloom.threshold = v),
    Spec::toggle("bloom.sun", GROUP_BLOOM, "Sun glow", true, |p: &mut Params, v: f32| p.bloom.sun = is_on(v)),
    Spec::toggle("bloom.corona", GROUP_BLOOM, "Corona glow", true, |p: &mut Params, v: f32| p.bloom.corona = is_on(v)),
    Spec::toggle("bloom.planets", GROUP_BLOOM, "Planet glow", false, |p: &mut Params, v: f32| p.bloom.planets = is_on(v)),
    Spec::toggle("bloom.starfield", GROUP_BLOOM, "Star glow", true, |p: &mut Params, v: f32| p.bloom.starfield = is_on(v)),
    Spec::toggle("bloom.shooting_stars", GROUP_BLOOM, "Shooting star glow", true, |p: &mut Params, v: f32| p.bloom.shooting_stars = is_on(v)),
];

pub const CAMERA: &[Spec] = &[
    Spec::slider("camera.distance", GROUP_CAMERA, "Distance", ControlRange::new(20.0, 400.0, 1.0), 90.0, |p: &mut Params, v: f32| p.camera.distance = v),
    Spec::slider("camera.auto_rotate", GROUP_CAMERA, "Auto rotate", ControlRange::new(0.0, 0.5, 0.005), 0.0, |p: &mut Params, v: f32| p.camera.auto_rotate = v),
];

pub const LIGHTS: &[Spec] = &[
    Spec::slider("lights.ambient", GROUP_LIGHTS, "Ambient", ControlRange::new(0.0, 1.0, 0.01), 0.15, |p: &mut Params, v: f32| p.lights.ambient = v),
    Spec::slider("lights.sun", GROUP_LIGHTS, "Sun light", ControlRange::new(0.0, 5.0, 0.05), 2.0, |p: &mut Params, v: f32| p.lights.sun_light = v),
];

pub const SCENE: &[Spec] = &[
    Spec::color("scene.background", GROUP_SCENE, "Background tint", 0x000000, |p: &mut Params, v: f32| p.scene.background = unpack_rgb(v)),
    Spec::slider("scene.segments", GROUP_SCENE, "Segments", ControlRange::new(8.0, 128.0, 8.0), 48.0, |p: &mut Params, v: f32| p.scene.segments = v as u32),
    Spec::slider("scene.planet_scale", GROUP_SCENE, "Planet scale", ControlRange::new(0.5, 3.0, 0.05), 1.0, |p: &mut Params, v: f32| p.scene.planet_scale = v),
];

pub const VISIBILITY: &[Spec] = &[
    Spec::toggle("visibility.all", GROUP_VISIBILITY, "Show all", true, |p: &mut Params, v: f32| p.visibility.show_all = is_on(v)),
    Spec::toggle("visibility.sun", GROUP_VISIBILITY, "Sun", true, |p: &mut Params, v: f32| p.visibility.sun = is_on(v)),
    Spec::toggle("visibility.mercury", GROUP_VISIBILITY, "Mercury", true, |p: &mut Params, v: f32| p.visibility.set_body("mercury", is_on(v))),
    Spec::toggle("visibility.venus", GROUP_VISIBILITY, "Venus", true, |p: &mut Params, v: f32| p.visibility.set_body("venus", is_on(v))),
    Spec::toggle("visibility.earth", GROUP_VISIBILITY, "Earth", true, |p: &mut Params, v: f32| p.visibility.set_body("earth", is_on(v))),
    Spec::toggle("visibility.moon", GROUP_VISIBILITY, "Moon", true, |p: &mut Params, v: f32| p.visibility.set_body("moon", is_on(v))),
    Spec::toggle("visibility.mars", GROUP_VISIBILITY, "Mars", true, |p: &mut Params, v: f32| p.visibility.set_body("mars", is_on(v))),
    Spec::toggle("visibility.jupiter", GROUP_VISIBILITY, "Jupiter", true, |p: &mut Params, v: f32| p.visibility.set_body("jupiter", is_on(v))),
    Spec::toggle("visibility.saturn", GROUP_VISIBILITY, "Saturn", true, |p: &mut Params, v: f32| p.visibility.set_body("saturn", is_on(v))),
    Spec::toggle("visibility.uranus", GROUP_VISIBILITY, "Uranus", true, |p: &mut Params, v: f32| p.visibility.set_body("uranus", is_on(v))),
    Spec::toggle("visibility.neptune", GROUP_VISIBILITY, "Neptune", true, |p: &mut Params, v: f32| p.visibility.set_body("neptune", is_on(v))),
];

pub fn panel() -> ControlPanel<Params> {
    ControlPanel::from_groups(&[SUN, CORONA, BLOOM, CAMERA, LIGHTS, SCENE, VISIBILITY])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_parameter_store() {
        let mut panel = panel();
        let mut params = Params::default();
        let before = params;
        panel.apply_defaults(&mut params);
        assert_eq!(params.bloom, before.bloom);
        assert_eq!(params.camera, before.camera);
        assert_eq!(params.lights, before.lights);
        assert_eq!(params.scene, before.scene);
        assert_eq!(params.visibility, before.visibility);
        assert_eq!(params.sun.octaves, before.sun.octaves);
        assert_eq!(params.corona.size, before.corona.size);
    }

    #[test]
    fn keys_are_unique_and_grouped() {
        let panel = panel();
        let desc = panel.describe();
        for (i, a) in desc.iter().enumerate() {
            assert!(GROUPS.contains(&a.group), "{}", a.key);
            assert!(a.key.starts_with(a.group), "{}", a.key);
            for b in &desc[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn every_toggleable_body_has_a_visibility_control() {
        let panel = panel();
        for body in BODIES.iter().filter(|b| b.is_toggleable()) {
            let key = format!("visibility.{}", body.name);
            assert!(panel.index_of(&key).is_some(), "{key}");
        }
    }

    #[test]
    fn out_of_range_writes_are_clamped() {
        let mut panel = panel();
        let mut params = Params::default();
        assert_eq!(panel.set(&mut params, "sun.octaves", 12.0), Ok(8.0));
        assert_eq!(params.sun.octaves, 8);
        assert_eq!(panel.set(&mut params, "scene.segments", 50.0), Ok(48.0));
        assert_eq!(params.scene.segments, 48);
    }

    #[test]
    fn show_all_masks_each_body() {
        let mut vis = Params::default().visibility;
        vis.set_body("mars", false);
        let (mars, _) = bodies::find("mars").unwrap();
        let (earth, _) = bodies::find("earth").unwrap();
        assert!(!vis.body_visible(mars));
        assert!(vis.body_visible(earth));
        vis.show_all = false;
        assert!(!vis.body_visible(earth));
        assert!(!vis.sun_visible());
    }
}
