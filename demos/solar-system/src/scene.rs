//! Scene builder: runs once at startup.
//!
//! Graph layout:
//! ```text
//! sky
//! sun                    corona
//! <planet>.anchor ── <planet>            (mesh, spins)
//!                 ├── saturn.ring        (Ring bodies)
//!                 └── moon.pivot ── moon (Moon bodies)
//! starfield              shooting_stars
//! ```
//! Anchors follow the orbit; cascades (visibility, bloom) start at the
//! anchor or pivot so children go along.

use glam::{Quat, Vec3};
use orrery_engine::{
    BasicMaterial, EngineContext, Geometry, Layers, Material, MaterialId, Node, NodeId, PointLight,
    PointsMaterial, ShaderMaterial, SkyMaterial, SkySource, StandardMaterial, TextureId,
    TextureManifest,
};

use crate::bodies::{self, BodyDef, BodyKind, BODIES};
use crate::controls::Params;
use crate::shooting_stars::ShootingStarConfig;
use crate::starfield::{self, StarfieldConfig};
use crate::uniforms::{self, CORONA_PROGRAM, SUN_PROGRAM};

/// Tilt of ring planes against the orbit plane.
pub const RING_TILT: f32 = 0.47;
pub const SKY_SIZE: f32 = 2000.0;

/// Glow group a node belongs to. Every drawable body is in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloomCategory {
    Sun,
    Corona,
    Planets,
    Starfield,
    ShootingStars,
}

#[derive(Debug, Clone)]
pub struct BodyHandle {
    pub def: &'static BodyDef,
    /// Index into `BODIES`.
    pub index: usize,
    /// Cascade root: anchor for planets, pivot for moons, the mesh for rings.
    pub root: NodeId,
    pub mesh: NodeId,
    pub material: MaterialId,
    pub tilt: f32,
    pub spin: f32,
}

#[derive(Debug, Clone)]
pub struct SceneHandles {
    pub sky: NodeId,
    pub sky_material: MaterialId,
    pub sun: NodeId,
    pub sun_material: MaterialId,
    pub corona: NodeId,
    pub corona_material: MaterialId,
    pub bodies: Vec<BodyHandle>,
    pub starfield: NodeId,
    pub shooting_stars: NodeId,
    /// Index of the sun's point light in the light state.
    pub sun_light: usize,
}

impl SceneHandles {
    /// Cascade roots of one glow group.
    pub fn bloom_roots(&self, category: BloomCategory) -> Vec<NodeId> {
        match category {
            BloomCategory::Sun => vec![self.sun],
            BloomCategory::Corona => vec![self.corona],
            BloomCategory::Planets => self
                .bodies
                .iter()
                .filter(|b| b.def.kind == BodyKind::Planet)
                .map(|b| b.root)
                .collect(),
            BloomCategory::Starfield => vec![self.starfield],
            BloomCategory::ShootingStars => vec![self.shooting_stars],
        }
    }

    pub fn body(&self, name: &str) -> Option<&BodyHandle> {
        self.bodies.iter().find(|b| b.def.name == name)
    }

    /// Mesh nodes whose geometry follows the segments control.
    pub fn tessellated(&self) -> impl Iterator<Item = NodeId> + '_ {
        [self.sun, self.corona]
            .into_iter()
            .chain(self.bodies.iter().map(|b| b.mesh))
    }
}

/// Look up `name` in the manifest and queue its fetch.
fn request(ctx: &mut EngineContext, manifest: &TextureManifest, name: &str, warnings: &mut Vec<String>) -> Option<TextureId> {
    match manifest.find(name) {
        Some(desc) => Some(ctx.textures.request(name, manifest.url(desc), desc.kind)),
        None => {
            warnings.push(format!("texture `{name}` missing from manifest, using flat color"));
            None
        }
    }
}

fn body_material(ctx: &mut EngineContext, manifest: &TextureManifest, def: &BodyDef, warnings: &mut Vec<String>) -> Material {
    let t = def.textures;
    let mut fetch = |name: Option<&'static str>| match name {
        Some(name) => request(ctx, manifest, name, warnings),
        None => None,
    };
    match def.kind {
        BodyKind::Ring { .. } => {
            let mut ring = BasicMaterial::new(def.color);
            ring.map = fetch(t.map);
            ring.alpha_map = fetch(t.alpha);
            ring.opacity = 0.9;
            ring.transparent = true;
            ring.double_sided = true;
            Material::Basic(ring)
        }
        BodyKind::Planet | BodyKind::Moon { .. } => {
            let mut standard = StandardMaterial::new(def.color);
            standard.map = fetch(t.map);
            standard.normal_map = fetch(t.normal);
            standard.specular_map = fetch(t.specular);
            standard.bump_map = fetch(t.bump);
            Material::Standard(standard)
        }
    }
}

fn sky_material(ctx: &mut EngineContext, manifest: &TextureManifest, tint: [f32; 3], warnings: &mut Vec<String>) -> (Material, Geometry) {
    if let Some(faces) = manifest.sky_faces() {
        let ids = faces.map(|desc| ctx.textures.request(&desc.name, manifest.url(desc), desc.kind));
        let material = Material::Sky(SkyMaterial { source: SkySource::CubeFaces { faces: ids }, tint });
        return (material, Geometry::SkyBox { size: SKY_SIZE });
    }
    let sphere = Geometry::SkySphere { radius: SKY_SIZE * 0.5, segments: 32 };
    if let Some(desc) = manifest.panorama() {
        let texture = ctx.textures.request(&desc.name, manifest.url(desc), desc.kind);
        return (Material::Sky(SkyMaterial { source: SkySource::Panorama { texture }, tint }), sphere);
    }
    warnings.push("no sky textures in manifest, drawing a flat background".to_string());
    (Material::Sky(SkyMaterial { source: SkySource::Flat, tint }), sphere)
}

fn spawn_mesh(ctx: &mut EngineContext, tag: &str, geometry: Geometry, material: MaterialId, layers: Layers) -> NodeId {
    let id = ctx.next_id();
    ctx.spawn(Node::new(id).with_tag(tag).with_geometry(geometry).with_material(material).with_layers(layers))
}

/// Build the whole scene. Returns the handles and any non-fatal warnings.
pub fn build(
    ctx: &mut EngineContext,
    manifest: &TextureManifest,
    params: &Params,
    stars: &ShootingStarConfig,
    field: &StarfieldConfig,
) -> (SceneHandles, Vec<String>) {
    let mut warnings = Vec::new();
    let segments = params.scene.segments;

    // ── Sky ──────────────────────────────────────────────────────────
    let (sky_mat, sky_geometry) = sky_material(ctx, manifest, params.scene.background, &mut warnings);
    let sky_material = ctx.materials.add(sky_mat);
    let sky = spawn_mesh(ctx, "sky", sky_geometry, sky_material, Layers::scene());

    // ── Sun + corona ─────────────────────────────────────────────────
    let sun_material = ctx.materials.add(Material::Shader(ShaderMaterial {
        program: SUN_PROGRAM.to_string(),
        uniforms: uniforms::sun_uniforms(&params.sun),
        transparent: false,
        additive: false,
    }));
    let sun = spawn_mesh(
        ctx,
        "sun",
        Geometry::sphere(bodies::SUN_RADIUS, segments),
        sun_material,
        Layers::scene_and_bloom(),
    );

    let corona_material = ctx.materials.add(Material::Shader(ShaderMaterial {
        program: CORONA_PROGRAM.to_string(),
        uniforms: uniforms::corona_uniforms(&params.corona),
        transparent: true,
        additive: true,
    }));
    let corona = spawn_mesh(
        ctx,
        "corona",
        Geometry::sphere(bodies::SUN_RADIUS * bodies::CORONA_SCALE, segments),
        corona_material,
        Layers::scene_and_bloom(),
    );

    let sun_light = ctx.lights.add(PointLight::new(Vec3::ZERO, bodies::SUN_COLOR, params.lights.sun_light, 0.0));
    ctx.lights.set_ambient_intensity(params.lights.ambient);

    // ── Bodies ───────────────────────────────────────────────────────
    let mut handles: Vec<BodyHandle> = Vec::with_capacity(BODIES.len());
    for (index, def) in BODIES.iter().enumerate() {
        let material_def = body_material(ctx, manifest, def, &mut warnings);
        let material = ctx.materials.add(material_def);
        let tilt = crate::orbit::tilt_for(def.name);
        let parent_root = def
            .parent()
            .and_then(|name| handles.iter().find(|h| h.def.name == name))
            .map(|h| h.root);

        let (root, mesh) = match def.kind {
            BodyKind::Planet => {
                let anchor = ctx.next_id();
                let start = crate::orbit::orbit_position(0.0, def.orbital_speed, def.orbital_radius, def.eccentricity, tilt);
                ctx.spawn(Node::new(anchor).with_tag(format!("{}.anchor", def.name)).with_translation(start));
                let mesh = ctx.next_id();
                ctx.spawn_child(
                    Node::new(mesh)
                        .with_tag(def.name)
                        .with_geometry(Geometry::sphere(def.radius, segments))
                        .with_material(material)
                        .with_layers(Layers::scene_and_bloom()),
                    anchor,
                );
                (anchor, mesh)
            }
            BodyKind::Moon { parent } => {
                let Some(parent_root) = parent_root else {
                    warnings.push(format!("{} has no parent `{parent}`, skipped", def.name));
                    continue;
                };
                let pivot = ctx.next_id();
                ctx.spawn_child(Node::new(pivot).with_tag(format!("{}.pivot", def.name)), parent_root);
                let mesh = ctx.next_id();
                ctx.spawn_child(
                    Node::new(mesh)
                        .with_tag(def.name)
                        .with_translation(Vec3::new(def.orbital_radius, 0.0, 0.0))
                        .with_geometry(Geometry::sphere(def.radius, segments))
                        .with_material(material)
                        .with_layers(Layers::scene_and_bloom()),
                    pivot,
                );
                (pivot, mesh)
            }
            BodyKind::Ring { parent, inner } => {
                let Some(parent_root) = parent_root else {
                    warnings.push(format!("{} has no parent `{parent}`, skipped", def.name));
                    continue;
                };
                let mesh = ctx.next_id();
                ctx.spawn_child(
                    Node::new(mesh)
                        .with_tag(def.name)
                        .with_rotation(Quat::from_rotation_x(RING_TILT))
                        .with_geometry(Geometry::ring(inner, def.radius, segments))
                        .with_material(material)
                        .with_layers(Layers::scene_and_bloom()),
                    parent_root,
                );
                (mesh, mesh)
            }
        };
        handles.push(BodyHandle { def, index, root, mesh, material, tilt, spin: 0.0 });
    }

    // ── Starfield ────────────────────────────────────────────────────
    ctx.set_static_points(starfield::build(field));
    let star_material = ctx.materials.add(Material::Points(PointsMaterial {
        size: field.base_size,
        color: [1.0; 3],
        opacity: 1.0,
        vertex_alpha: true,
        additive: false,
    }));
    let starfield = spawn_mesh(
        ctx,
        "starfield",
        Geometry::Points { count: field.count as u32 },
        star_material,
        Layers::scene_and_bloom(),
    );

    // ── Shooting stars ───────────────────────────────────────────────
    let trail_material = ctx.materials.add(Material::Points(PointsMaterial {
        size: stars.size,
        color: stars.color,
        opacity: 1.0,
        vertex_alpha: true,
        additive: true,
    }));
    let shooting_stars = spawn_mesh(
        ctx,
        "shooting_stars",
        Geometry::Trail { capacity: (stars.count * stars.trail_len) as u32 },
        trail_material,
        Layers::scene_and_bloom(),
    );

    ctx.clear_color = params.scene.background;
    ctx.graph.propagate(&mut ctx.scene);

    let handles = SceneHandles {
        sky,
        sky_material,
        sun,
        sun_material,
        corona,
        corona_material,
        bodies: handles,
        starfield,
        shooting_stars,
        sun_light,
    };
    (handles, warnings)
}
