//! Solar system orrery: elliptical orbits, a moon, Saturn's ring, a starfield,
//! shooting stars, and a noise-shaded sun whose glow is composited selectively.
//!
//! Controls: drag to orbit the camera, scroll to zoom. The page's tweak panel
//! writes by key through `set_control`, or by index as queued `Control` events.

use glam::{Quat, Vec2, Vec3};
use orrery_engine::*;

use crate::bodies::{self, BodyKind};
use crate::controls::{
    self, Params, GROUPS, GROUP_BLOOM, GROUP_CAMERA, GROUP_CORONA, GROUP_LIGHTS, GROUP_SCENE,
    GROUP_SUN, GROUP_VISIBILITY,
};
use crate::orbit;
use crate::scene::{self, BloomCategory, SceneHandles};
use crate::shooting_stars::{ShootingStarConfig, ShootingStarPool};
use crate::starfield::StarfieldConfig;
use crate::uniforms;

pub const TEXTURE_MANIFEST: &str = include_str!("../assets/textures.json");

// ── Custom event kinds from the page ─────────────────────────────────

const CUSTOM_PAUSE: u32 = 1;
const CUSTOM_TIME_SCALE: u32 = 2;

// ── Game event kinds to the page ─────────────────────────────────────

/// a = loaded, b = failed, c = pending.
pub const EVENT_LOAD_PROGRESS: f32 = 1.0;
/// a = outcome code of the previous frame.
pub const EVENT_FRAME_OUTCOME: f32 = 2.0;
/// a = camera distance.
pub const EVENT_CAMERA_DISTANCE: f32 = 3.0;

const DRAG_RADIANS_PER_PIXEL: f32 = 0.005;
const WHEEL_ZOOM_RATE: f32 = 0.001;
const STAR_SEED: u64 = 0x0057_a25e;

pub struct SolarSystem {
    params: Params,
    panel: ControlPanel<Params>,
    handles: Option<SceneHandles>,
    visibility: CascadeToggle,
    bloom: CascadeToggle,
    star_config: ShootingStarConfig,
    field_config: StarfieldConfig,
    stars: ShootingStarPool,
    rng: Rng,
    /// Last pointer position while a drag is in progress.
    drag: Option<Vec2>,
    last_progress: Option<LoadSummary>,
    last_outcome: Option<u32>,
    last_distance: Option<f32>,
}

impl SolarSystem {
    pub fn new() -> Self {
        let mut params = Params::default();
        let mut panel = controls::panel();
        panel.apply_defaults(&mut params);

        let star_config = ShootingStarConfig::default();
        let mut rng = Rng::new(STAR_SEED);
        let stars = ShootingStarPool::new(star_config, &mut rng);

        Self {
            params,
            panel,
            handles: None,
            visibility: CascadeToggle::visibility(),
            bloom: CascadeToggle::bloom(),
            star_config,
            field_config: StarfieldConfig::default(),
            stars,
            rng,
            drag: None,
            last_progress: None,
            last_outcome: None,
            last_distance: None,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn handles(&self) -> Option<&SceneHandles> {
        self.handles.as_ref()
    }

    pub fn stars(&self) -> &ShootingStarPool {
        &self.stars
    }

    /// Current parameter store as JSON, for the page's debug view.
    pub fn params_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_else(|err| {
            log::error!("failed to serialise params: {err}");
            String::from("null")
        })
    }

    /// Push one control group's values into the scene.
    fn sync(&mut self, ctx: &mut EngineContext, group: &str) {
        let Some(h) = self.handles.as_ref() else { return };
        let p = self.params;
        match group {
            GROUP_SUN => {
                ctx.materials.write_uniforms(h.sun_material, |u| uniforms::write_sun(u, &p.sun));
            }
            GROUP_CORONA => {
                ctx.materials.write_uniforms(h.corona_material, |u| uniforms::write_corona(u, &p.corona));
                if let Some(node) = ctx.scene.get_mut(h.corona) {
                    node.local.scale = Vec3::splat(p.corona.size);
                }
            }
            GROUP_BLOOM => {
                ctx.bloom = BloomSettings {
                    strength: p.bloom.strength,
                    radius: p.bloom.radius,
                    threshold: p.bloom.threshold,
                };
                ctx.bloom_enabled = p.bloom.enabled;
                let wanted = [
                    (BloomCategory::Sun, p.bloom.sun),
                    (BloomCategory::Corona, p.bloom.corona),
                    (BloomCategory::Planets, p.bloom.planets),
                    (BloomCategory::Starfield, p.bloom.starfield),
                    (BloomCategory::ShootingStars, p.bloom.shooting_stars),
                ];
                let roots: Vec<(NodeId, bool)> = wanted
                    .iter()
                    .flat_map(|&(category, on)| h.bloom_roots(category).into_iter().map(move |root| (root, on)))
                    .collect();
                apply_cascade(&mut self.bloom, ctx, &roots);
            }
            GROUP_CAMERA => ctx.camera.set_distance(p.camera.distance),
            GROUP_LIGHTS => {
                ctx.lights.set_ambient_intensity(p.lights.ambient);
                if let Some(light) = ctx.lights.get_mut(h.sun_light) {
                    light.intensity = p.lights.sun_light;
                }
            }
            GROUP_SCENE => {
                ctx.clear_color = p.scene.background;
                let tint_changed = matches!(
                    ctx.materials.get(h.sky_material),
                    Some(Material::Sky(sky)) if sky.tint != p.scene.background
                );
                if tint_changed {
                    if let Some(Material::Sky(sky)) = ctx.materials.get_mut(h.sky_material) {
                        sky.tint = p.scene.background;
                    }
                }

                let mut retessellated = false;
                for id in h.tessellated() {
                    let Some(node) = ctx.scene.get_mut(id) else { continue };
                    let Some(geometry) = node.geometry else { continue };
                    let resized = geometry.with_segments(p.scene.segments);
                    if resized != geometry {
                        node.geometry = Some(resized);
                        retessellated = true;
                    }
                }
                if retessellated {
                    ctx.mark_geometry_changed();
                }

                for body in &h.bodies {
                    if let Some(node) = ctx.scene.get_mut(body.mesh) {
                        node.local.scale = Vec3::splat(p.scene.planet_scale);
                    }
                }
            }
            GROUP_VISIBILITY => {
                let sun_on = p.visibility.sun_visible();
                let mut roots = vec![(h.sun, sun_on), (h.corona, sun_on)];
                roots.extend(
                    h.bodies
                        .iter()
                        .filter(|b| b.def.is_toggleable())
                        .map(|b| (b.root, p.visibility.body_visible(b.index))),
                );
                apply_cascade(&mut self.visibility, ctx, &roots);
            }
            other => log::debug!("no sync for control group {other}"),
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => self.drag = Some(Vec2::new(x, y)),
                InputEvent::PointerUp { .. } => self.drag = None,
                InputEvent::PointerMove { x, y } => {
                    if let Some(last) = self.drag {
                        let d = Vec2::new(x, y) - last;
                        ctx.camera.orbit(-d.x * DRAG_RADIANS_PER_PIXEL, d.y * DRAG_RADIANS_PER_PIXEL);
                        self.drag = Some(Vec2::new(x, y));
                    }
                }
                InputEvent::Wheel { delta } if delta.is_finite() => {
                    ctx.camera.zoom(1.0 + delta * WHEEL_ZOOM_RATE);
                    // Slider and camera both settle on the snapped distance.
                    match self.panel.set(&mut self.params, "camera.distance", ctx.camera.distance()) {
                        Ok(snapped) => ctx.camera.set_distance(snapped),
                        Err(err) => log::warn!("{err}"),
                    }
                }
                InputEvent::Wheel { delta } => log::debug!("ignoring wheel delta {delta}"),
                InputEvent::Control { index, value } => match self.panel.set_index(&mut self.params, index, value) {
                    Ok(_) => {
                        if let Some(group) = self.panel.group_at(index) {
                            self.sync(ctx, group);
                        }
                    }
                    Err(err) => log::warn!("control write rejected: {err}"),
                },
                InputEvent::Custom { kind, a, .. } => match kind {
                    CUSTOM_PAUSE => ctx.clock.set_paused(a >= 0.5),
                    CUSTOM_TIME_SCALE => ctx.clock.set_time_scale(a.max(0.0)),
                    _ => {}
                },
                InputEvent::TextureLoaded { texture } => {
                    log::debug!("texture {} ready", ctx.textures.name(texture).unwrap_or("?"));
                }
                InputEvent::TextureFailed { texture } => {
                    log::debug!("texture {} fell back", ctx.textures.name(texture).unwrap_or("?"));
                }
            }
        }
    }

    fn update_bodies(&mut self, ctx: &mut EngineContext, t: f32, dt: f32) {
        let Some(h) = self.handles.as_mut() else { return };
        for body in &mut h.bodies {
            let def = body.def;
            match def.kind {
                BodyKind::Planet => {
                    let position = orbit::orbit_position(t, def.orbital_speed, def.orbital_radius, def.eccentricity, body.tilt);
                    if let Some(anchor) = ctx.scene.get_mut(body.root) {
                        anchor.local.translation = position;
                    }
                }
                BodyKind::Moon { .. } => {
                    let angle = orbit::moon_angle(t, def.orbital_speed);
                    if let Some(pivot) = ctx.scene.get_mut(body.root) {
                        pivot.local.rotation = orbit::pivot_rotation(angle);
                    }
                }
                // Rings keep their tilt and ride on the parent's anchor.
                BodyKind::Ring { .. } => continue,
            }
            body.spin = orbit::spin(body.spin, def.rotation_speed, dt);
            if let Some(mesh) = ctx.scene.get_mut(body.mesh) {
                mesh.local.rotation = Quat::from_rotation_y(body.spin);
            }
        }
    }

    fn emit_status(&mut self, ctx: &mut EngineContext) {
        let progress = ctx.load_summary();
        if self.last_progress != Some(progress) {
            self.last_progress = Some(progress);
            ctx.emit_event(GameEvent::new(
                EVENT_LOAD_PROGRESS,
                progress.loaded as f32,
                progress.failed as f32,
                progress.pending as f32,
            ));
            if progress.is_settled() {
                log::info!("textures settled: {} loaded, {} failed", progress.loaded, progress.failed);
            }
        }

        if self.last_outcome != Some(ctx.frame_outcome) {
            self.last_outcome = Some(ctx.frame_outcome);
            ctx.emit_event(GameEvent::new(EVENT_FRAME_OUTCOME, ctx.frame_outcome as f32, 0.0, 0.0));
        }

        let distance = ctx.camera.distance();
        if self.last_distance != Some(distance) {
            self.last_distance = Some(distance);
            ctx.emit_event(GameEvent::new(EVENT_CAMERA_DISTANCE, distance, 0.0, 0.0));
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a set of cascade roots to the wanted state.
///
/// Every switched-off root is restored newest first, then the off set is
/// applied again in order. Nested roots (a moon under its planet) then always
/// snapshot a fully restored subtree.
fn apply_cascade(toggle: &mut CascadeToggle, ctx: &mut EngineContext, roots: &[(NodeId, bool)]) {
    for &(root, _) in roots.iter().rev() {
        if toggle.is_off(root) {
            toggle.set(&mut ctx.scene, &ctx.graph, root, true);
        }
    }
    for &(root, on) in roots {
        if !on {
            toggle.set(&mut ctx.scene, &ctx.graph, root, false);
        }
    }
}

impl Game for SolarSystem {
    fn config(&self) -> GameConfig {
        GameConfig {
            max_trail_vertices: self.star_config.count * self.star_config.trail_len,
            bloom: BloomSettings {
                strength: self.params.bloom.strength,
                radius: self.params.bloom.radius,
                threshold: self.params.bloom.threshold,
            },
            clear_color: self.params.scene.background,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) -> InitReport {
        let mut report = InitReport::ready();

        let manifest = match TextureManifest::from_json(TEXTURE_MANIFEST) {
            Ok(manifest) => manifest,
            Err(err) => {
                report.warn(format!("texture manifest unreadable ({err}), drawing flat colors"));
                TextureManifest { base_path: String::new(), textures: Vec::new() }
            }
        };

        ctx.camera = PerspectiveCamera::new(60.0, ctx.viewport.aspect(), 0.1, 5000.0).with_distance_limits(20.0, 400.0);

        let (handles, warnings) = scene::build(ctx, &manifest, &self.params, &self.star_config, &self.field_config);
        for warning in warnings {
            report.warn(warning);
        }
        self.handles = Some(handles);

        for group in GROUPS {
            self.sync(ctx, group);
        }
        report.controls = self.panel.describe();

        log::info!(
            "solar system: {} bodies, {} stars, {} shooting stars",
            bodies::BODIES.len(),
            ctx.static_points.len(),
            self.stars.len()
        );
        report
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);

        let dt = ctx.clock.delta();
        let t = ctx.clock.elapsed() as f32;

        if self.params.camera.auto_rotate > 0.0 {
            ctx.camera.orbit(self.params.camera.auto_rotate * dt, 0.0);
        }

        self.update_bodies(ctx, t, dt);

        if let Some(h) = self.handles.as_ref() {
            ctx.materials.write_uniforms(h.sun_material, |u| uniforms::write_time(u, t));
            ctx.materials.write_uniforms(h.corona_material, |u| uniforms::write_time(u, t));
        }

        self.stars.update(dt, &mut self.rng);
        let trail_visible = self
            .handles
            .as_ref()
            .and_then(|h| ctx.scene.get(h.shooting_stars))
            .is_some_and(|node| node.visible);
        if trail_visible {
            self.stars.write_trail_vertices(&mut ctx.trail);
        }

        self.emit_status(ctx);
    }

    fn set_control(&mut self, ctx: &mut EngineContext, key: &str, value: f32) -> Result<f32, ControlError> {
        let group = self
            .panel
            .group_of(key)
            .ok_or_else(|| ControlError::UnknownKey(key.to_string()))?;
        let applied = self.panel.set(&mut self.params, key, value)?;
        self.sync(ctx, group);
        Ok(applied)
    }

    fn describe_controls(&self) -> Vec<ControlDescription> {
        self.panel.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_web::GameRunner;

    fn runner() -> GameRunner<SolarSystem> {
        let mut r = GameRunner::new(SolarSystem::new());
        let report = r.init();
        assert_eq!(report.status, InitStatus::Ready, "{:?}", report.warnings);
        r
    }

    fn handles(r: &GameRunner<SolarSystem>) -> SceneHandles {
        r.game().handles().cloned().unwrap()
    }

    fn subtree_glows(r: &GameRunner<SolarSystem>, root: NodeId) -> bool {
        let ctx = r.context();
        std::iter::once(root)
            .chain(ctx.graph.descendants(root))
            .filter_map(|id| ctx.scene.get(id))
            .filter(|node| node.is_drawable())
            .all(|node| node.layers.is_bloom())
    }

    fn subtree_layers(r: &GameRunner<SolarSystem>, root: NodeId) -> Vec<(NodeId, u32)> {
        let ctx = r.context();
        std::iter::once(root)
            .chain(ctx.graph.descendants(root))
            .map(|id| (id, ctx.scene.get(id).unwrap().layers.bits()))
            .collect()
    }

    #[test]
    fn init_requests_every_manifest_texture() {
        let mut r = GameRunner::new(SolarSystem::new());
        let report = r.init();
        assert_eq!(report.textures.len(), r.context().textures.len());
        assert!(report.textures.len() >= 14);
        assert!(!report.controls.is_empty());
        assert_eq!(r.context().static_points.len(), StarfieldConfig::default().count);
    }

    #[test]
    fn materials_survive_a_bloom_cycle() {
        let mut r = runner();
        let before = r.context().scene.material_snapshot();
        r.tick(1.0 / 60.0);
        assert_eq!(r.last_outcome(), &FrameOutcome::Composited);
        assert_eq!(r.context().scene.material_snapshot(), before);
    }

    #[test]
    fn planet_bloom_toggle_restores_the_whole_subtree() {
        let mut r = runner();
        let h = handles(&r);
        let saturn = h.body("saturn").unwrap().root;
        let earth = h.body("earth").unwrap().root;
        let off = (subtree_layers(&r, saturn), subtree_layers(&r, earth));
        assert!(off.0.iter().all(|&(_, bits)| !Layers::from_bits(bits).is_bloom()));

        assert_eq!(r.set_control("bloom.planets", 1.0), 1.0);
        assert!(subtree_glows(&r, saturn));
        assert!(subtree_glows(&r, earth));

        r.set_control("bloom.planets", 0.0);
        assert_eq!((subtree_layers(&r, saturn), subtree_layers(&r, earth)), off);
    }

    #[test]
    fn hiding_a_planet_hides_its_children() {
        let mut r = runner();
        let h = handles(&r);
        let ring = h.body("saturn.ring").unwrap().mesh;
        let moon = h.body("moon").unwrap().mesh;

        r.set_control("visibility.saturn", 0.0);
        assert!(!r.context().scene.get(ring).unwrap().visible);

        // Moon hidden on its own survives its planet coming back.
        r.set_control("visibility.earth", 0.0);
        r.set_control("visibility.moon", 0.0);
        r.set_control("visibility.earth", 1.0);
        assert!(r.context().scene.get(h.body("earth").unwrap().mesh).unwrap().visible);
        assert!(!r.context().scene.get(moon).unwrap().visible);

        r.set_control("visibility.moon", 1.0);
        r.set_control("visibility.saturn", 1.0);
        assert!(r.context().scene.get(moon).unwrap().visible);
        assert!(r.context().scene.get(ring).unwrap().visible);
    }

    #[test]
    fn show_all_off_hides_sun_and_bodies() {
        let mut r = runner();
        let h = handles(&r);
        r.set_control("visibility.all", 0.0);
        let ctx = r.context();
        assert!(!ctx.scene.get(h.sun).unwrap().visible);
        assert!(!ctx.scene.get(h.corona).unwrap().visible);
        assert!(h.bodies.iter().all(|b| !ctx.scene.get(b.mesh).unwrap().visible));
        assert!(ctx.scene.get(h.starfield).unwrap().visible);
    }

    #[test]
    fn failed_texture_falls_back_to_flat_color() {
        let mut r = runner();
        let h = handles(&r);
        let earth = h.body("earth").unwrap();
        let map = r.context().textures.id_of("earth").unwrap();

        r.texture_failed(map.0, "404");
        r.tick(1.0 / 60.0);

        match r.context().materials.get(earth.material) {
            Some(Material::Basic(basic)) => assert_eq!(basic.color, earth.def.color),
            other => panic!("expected flat fallback, got {:?}", other),
        }
        assert!(!matches!(r.last_outcome(), FrameOutcome::Failed(_)));
        let progress = r.context().events.iter().find(|e| e.kind == EVENT_LOAD_PROGRESS).unwrap();
        assert_eq!(progress.b, 1.0);
    }

    #[test]
    fn resize_updates_camera_and_targets_only() {
        let mut r = runner();
        r.tick(1.0 / 60.0);
        let transforms: Vec<_> = r.context().scene.iter().map(|n| (n.id, n.local)).collect();

        r.resize(1920, 1080, 2.0);
        let ctx = r.context();
        assert!((ctx.camera.aspect - 1920.0 / 1080.0).abs() < 1e-5);
        assert_eq!(r.recorder().physical_size(), (3840, 2160));
        let after: Vec<_> = ctx.scene.iter().map(|n| (n.id, n.local)).collect();
        assert_eq!(after, transforms);
    }

    #[test]
    fn bodies_move_and_spin_between_frames() {
        let mut r = runner();
        let h = handles(&r);
        let mars = h.body("mars").unwrap();
        r.tick(0.05);
        let first = r.context().scene.get(mars.mesh).unwrap().world_position();
        for _ in 0..10 {
            r.tick(0.05);
        }
        let ctx = r.context();
        let later = ctx.scene.get(mars.mesh).unwrap().world_position();
        assert!((later - first).length() > 1e-3);
        assert_ne!(ctx.scene.get(mars.mesh).unwrap().local.rotation, Quat::IDENTITY);
        // Still on the ellipse.
        let a = mars.def.orbital_radius;
        let b = orbit::semi_minor(a, mars.def.eccentricity);
        assert!(((later.x / a).powi(2) + (later.z / b).powi(2) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn moon_follows_earth() {
        let mut r = runner();
        let h = handles(&r);
        let earth = h.body("earth").unwrap();
        let moon = h.body("moon").unwrap();
        for _ in 0..30 {
            r.tick(0.1);
        }
        let ctx = r.context();
        let e = ctx.scene.get(earth.mesh).unwrap().world_position();
        let m = ctx.scene.get(moon.mesh).unwrap().world_position();
        assert!(((m - e).length() - moon.def.orbital_radius).abs() < 1e-3);
    }

    #[test]
    fn sun_controls_reach_the_uniforms() {
        let mut r = runner();
        let h = handles(&r);
        let version = r.context().materials.version(h.sun_material);
        let gain = r.set_control("sun.gain", 0.8);
        assert!((gain - 0.8).abs() < 1e-5);
        let size = r.set_control("corona.size", 2.0);
        let ctx = r.context();
        match ctx.materials.get(h.sun_material) {
            Some(Material::Shader(shader)) => assert_eq!(shader.uniforms.float("gain"), Some(gain)),
            other => panic!("expected shader, got {:?}", other),
        }
        assert_eq!(ctx.materials.version(h.sun_material), version);
        assert_eq!(ctx.scene.get(h.corona).unwrap().local.scale, Vec3::splat(size));
    }

    #[test]
    fn segments_control_retessellates_once() {
        let mut r = runner();
        let h = handles(&r);
        let version = r.context().geometry_version();
        r.set_control("scene.segments", 64.0);
        assert_eq!(r.context().geometry_version(), version.wrapping_add(1));
        r.set_control("scene.segments", 64.0);
        assert_eq!(r.context().geometry_version(), version.wrapping_add(1));
        let geometry = r.context().scene.get(h.sun).unwrap().geometry.unwrap();
        assert_eq!(geometry.segments(), Some(64));
    }

    #[test]
    fn wheel_zoom_updates_the_distance_control() {
        let mut r = runner();
        r.push_input(InputEvent::Wheel { delta: 500.0 });
        r.tick(1.0 / 60.0);
        let distance = r.context().camera.distance();
        assert!(distance > 90.0);
        assert_eq!(r.game().params().camera.distance, distance);
        let event = r.context().events.iter().find(|e| e.kind == EVENT_CAMERA_DISTANCE).unwrap();
        assert_eq!(event.a, distance);
    }

    #[test]
    fn wheel_zoom_snaps_the_camera_and_ignores_nan() {
        let mut r = runner();
        r.push_input(InputEvent::Wheel { delta: 123.0 });
        r.tick(1.0 / 60.0);
        let distance = r.context().camera.distance();
        assert_eq!(distance, distance.round());
        assert_eq!(r.game().params().camera.distance, distance);

        r.set_control("camera.distance", 150.0);
        r.push_input(InputEvent::Wheel { delta: f32::NAN });
        r.tick(1.0 / 60.0);
        assert_eq!(r.context().camera.distance(), 150.0);
        assert_eq!(r.game().params().camera.distance, 150.0);
    }

    #[test]
    fn indexed_control_write_runs_the_visibility_cascade() {
        let mut r = runner();
        let h = handles(&r);
        let saturn = h.body("saturn").unwrap();
        let ring = h.body("saturn.ring").unwrap().mesh;
        let index = r
            .game()
            .describe_controls()
            .iter()
            .find(|c| c.key == "visibility.saturn")
            .map(|c| c.index)
            .unwrap();

        r.push_input(InputEvent::Control { index, value: 0.0 });
        r.tick(1.0 / 60.0);
        assert!(!r.game().params().visibility.body_visible(saturn.index));
        assert!(!r.context().scene.get(saturn.mesh).unwrap().visible);
        assert!(!r.context().scene.get(ring).unwrap().visible);

        r.push_input(InputEvent::Control { index, value: 1.0 });
        r.tick(1.0 / 60.0);
        assert!(r.context().scene.get(ring).unwrap().visible);
    }

    #[test]
    fn indexed_control_out_of_range_is_ignored() {
        let mut r = runner();
        let before = r.game().params_json();
        r.push_input(InputEvent::Control { index: 10_000, value: 1.0 });
        r.tick(1.0 / 60.0);
        assert_eq!(r.game().params_json(), before);
    }

    #[test]
    fn pause_freezes_orbits() {
        let mut r = runner();
        let h = handles(&r);
        let venus = h.body("venus").unwrap().root;
        r.tick(0.1);
        r.push_input(InputEvent::Custom { kind: CUSTOM_PAUSE, a: 1.0, b: 0.0, c: 0.0 });
        r.tick(0.1);
        let frozen = r.context().scene.get(venus).unwrap().local.translation;
        r.tick(0.1);
        assert_eq!(r.context().scene.get(venus).unwrap().local.translation, frozen);
    }

    #[test]
    fn params_json_tracks_control_writes() {
        let mut r = runner();
        r.set_control("scene.segments", 32.0);
        let json: serde_json::Value = serde_json::from_str(&r.game().params_json()).unwrap();
        assert_eq!(json["scene"]["segments"], 32);
        assert_eq!(json["visibility"]["bodies"].as_array().unwrap().len(), bodies::BODIES.len());
    }

    #[test]
    fn unknown_control_is_rejected() {
        let mut r = runner();
        assert!(r.set_control("sun.flares", 1.0).is_nan());
        assert!(r.set_control("sun.gain", f32::NAN).is_nan());
    }

    #[test]
    fn shooting_star_trails_reach_the_frame() {
        let mut r = runner();
        for _ in 0..5 {
            r.tick(1.0 / 60.0);
        }
        assert!(!r.context().trail.is_empty());
        assert!(r.context().trail.len() <= r.game().config().max_trail_vertices);

        let h = handles(&r);
        r.set_control("bloom.shooting_stars", 0.0);
        assert!(!r.context().scene.get(h.shooting_stars).unwrap().layers.is_bloom());
    }
}
