//! Materials and the material arena.
//!
//! Nodes refer to materials by `MaterialId`. Every mutation bumps a per-material
//! version so the page knows which GPU materials need a refresh.

use serde::Serialize;
use crate::api::types::{MaterialId, TextureId};

/// RGB color, linear, typically in [0, 1] (may exceed 1 for HDR glow).
pub type Color = [f32; 3];

/// A single shader uniform value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec3([f32; 3]),
}

/// Ordered set of named uniforms for a shader program.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UniformSet {
    values: Vec<(&'static str, UniformValue)>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: UniformValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &'static str, value: UniformValue) {
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.set(name, UniformValue::Float(value));
    }

    pub fn set_int(&mut self, name: &'static str, value: i32) {
        self.set(name, UniformValue::Int(value));
    }

    pub fn set_vec3(&mut self, name: &'static str, value: [f32; 3]) {
        self.set(name, UniformValue::Vec3(value));
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(v),
            UniformValue::Int(v) => Some(v as f32),
            UniformValue::Vec3(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, UniformValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flatten into `f32`s in declaration order (Vec3 takes three slots).
    pub fn write_floats(&self, out: &mut Vec<f32>) {
        for (_, value) in &self.values {
            match *value {
                UniformValue::Float(v) => out.push(v),
                UniformValue::Int(v) => out.push(v as f32),
                UniformValue::Vec3(v) => out.extend_from_slice(&v),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardMaterial {
    pub color: Color,
    pub map: Option<TextureId>,
    pub normal_map: Option<TextureId>,
    pub specular_map: Option<TextureId>,
    pub bump_map: Option<TextureId>,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub shininess: f32,
}

impl StandardMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            map: None,
            normal_map: None,
            specular_map: None,
            bump_map: None,
            emissive: [0.0; 3],
            emissive_intensity: 0.0,
            shininess: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicMaterial {
    pub color: Color,
    pub map: Option<TextureId>,
    /// Alpha map (white = opaque). Used for ring transparency.
    pub alpha_map: Option<TextureId>,
    pub opacity: f32,
    pub transparent: bool,
    pub double_sided: bool,
}

impl BasicMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            map: None,
            alpha_map: None,
            opacity: 1.0,
            transparent: false,
            double_sided: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsMaterial {
    pub size: f32,
    pub color: Color,
    pub opacity: f32,
    /// Per-vertex alpha is read from the vertex stream (trail fade).
    pub vertex_alpha: bool,
    pub additive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderMaterial {
    /// Name of the shader program on the page side.
    pub program: String,
    pub uniforms: UniformSet,
    pub transparent: bool,
    pub additive: bool,
}

/// Where a sky material gets its pixels from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkySource {
    /// +X, -X, +Y, -Y, +Z, -Z.
    CubeFaces { faces: [TextureId; 6] },
    Panorama { texture: TextureId },
    /// No image; only the tint is drawn.
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkyMaterial {
    pub source: SkySource,
    pub tint: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Material {
    Standard(StandardMaterial),
    Basic(BasicMaterial),
    Points(PointsMaterial),
    Shader(ShaderMaterial),
    Sky(SkyMaterial),
    /// Fully transparent placeholder. Writes neither color nor depth.
    Hidden,
}

impl Material {
    /// Every texture this material samples.
    pub fn textures(&self) -> Vec<TextureId> {
        match self {
            Material::Standard(m) => [m.map, m.normal_map, m.specular_map, m.bump_map]
                .into_iter()
                .flatten()
                .collect(),
            Material::Basic(m) => [m.map, m.alpha_map].into_iter().flatten().collect(),
            Material::Sky(m) => match &m.source {
                SkySource::CubeFaces { faces } => faces.to_vec(),
                SkySource::Panorama { texture } => vec![*texture],
                SkySource::Flat => Vec::new(),
            },
            Material::Points(_) | Material::Shader(_) | Material::Hidden => Vec::new(),
        }
    }

    /// Degrade this material after `texture` failed to load.
    /// Returns true when anything changed.
    fn degrade(&mut self, texture: TextureId) -> bool {
        match self {
            Material::Standard(m) => {
                if m.map == Some(texture) {
                    // Color map gone: fall back to a flat basic material.
                    let color = m.color;
                    *self = Material::Basic(BasicMaterial::new(color));
                    return true;
                }
                let mut changed = false;
                for slot in [&mut m.normal_map, &mut m.specular_map, &mut m.bump_map] {
                    if *slot == Some(texture) {
                        *slot = None;
                        changed = true;
                    }
                }
                changed
            }
            Material::Basic(m) => {
                let mut changed = false;
                for slot in [&mut m.map, &mut m.alpha_map] {
                    if *slot == Some(texture) {
                        *slot = None;
                        changed = true;
                    }
                }
                changed
            }
            Material::Sky(m) => {
                let uses = match &m.source {
                    SkySource::CubeFaces { faces } => faces.contains(&texture),
                    SkySource::Panorama { texture: t } => *t == texture,
                    SkySource::Flat => false,
                };
                if uses {
                    m.source = SkySource::Flat;
                }
                uses
            }
            Material::Points(_) | Material::Shader(_) | Material::Hidden => false,
        }
    }
}

#[derive(Debug, Clone)]
struct MaterialEntry {
    material: Material,
    version: u32,
}

/// Serialisable snapshot of one material for the page.
#[derive(Debug, Serialize)]
pub struct MaterialDescription<'a> {
    pub id: MaterialId,
    pub version: u32,
    pub material: &'a Material,
}

/// Arena of materials indexed by `MaterialId`.
///
/// Slot 0 always holds the shared `Hidden` placeholder used by the bloom darken step.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    entries: Vec<MaterialEntry>,
    /// Bumped on every change to any material.
    generation: u32,
}

impl MaterialLibrary {
    pub const HIDDEN: MaterialId = MaterialId(0);

    pub fn new() -> Self {
        Self {
            entries: vec![MaterialEntry {
                material: Material::Hidden,
                version: 0,
            }],
            generation: 0,
        }
    }

    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.entries.len() as u32);
        self.entries.push(MaterialEntry { material, version: 0 });
        self.generation = self.generation.wrapping_add(1);
        id
    }

    /// The shared fully-transparent placeholder.
    pub fn hidden(&self) -> MaterialId {
        Self::HIDDEN
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.entries.get(id.0 as usize).map(|e| &e.material)
    }

    /// Mutable access. Marks the material as needing a refresh on the page.
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        let entry = self.entries.get_mut(id.0 as usize)?;
        entry.version = entry.version.wrapping_add(1);
        self.generation = self.generation.wrapping_add(1);
        Some(&mut entry.material)
    }

    /// Swap in a new material under an existing id. Returns the old one.
    pub fn replace(&mut self, id: MaterialId, material: Material) -> Option<Material> {
        let entry = self.entries.get_mut(id.0 as usize)?;
        let old = std::mem::replace(&mut entry.material, material);
        entry.version = entry.version.wrapping_add(1);
        self.generation = self.generation.wrapping_add(1);
        Some(old)
    }

    /// Mark a material for a visual refresh without changing it
    /// (e.g. a texture it samples finished loading).
    pub fn needs_update(&mut self, id: MaterialId) {
        if let Some(entry) = self.entries.get_mut(id.0 as usize) {
            entry.version = entry.version.wrapping_add(1);
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn version(&self, id: MaterialId) -> u32 {
        self.entries.get(id.0 as usize).map(|e| e.version).unwrap_or(0)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Uniforms of a shader material, mutably.
    pub fn uniforms_mut(&mut self, id: MaterialId) -> Option<&mut UniformSet> {
        match self.get_mut(id)? {
            Material::Shader(shader) => Some(&mut shader.uniforms),
            _ => None,
        }
    }

    /// Update shader uniforms in place without a version bump. Uniform values
    /// reach the page through the uniform block every frame.
    pub fn write_uniforms(&mut self, id: MaterialId, f: impl FnOnce(&mut UniformSet)) -> bool {
        match self.entries.get_mut(id.0 as usize).map(|e| &mut e.material) {
            Some(Material::Shader(shader)) => {
                f(&mut shader.uniforms);
                true
            }
            _ => false,
        }
    }

    /// Materials sampling `texture`.
    pub fn users_of(&self, texture: TextureId) -> Vec<MaterialId> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.material.textures().contains(&texture))
            .map(|(i, _)| MaterialId(i as u32))
            .collect()
    }

    /// Degrade every material that samples `texture`. Returns the affected ids.
    pub fn apply_texture_failure(&mut self, texture: TextureId) -> Vec<MaterialId> {
        let mut affected = Vec::new();
        for (i, entry) in self.entries.iter_mut().enumerate() {
            if entry.material.degrade(texture) {
                entry.version = entry.version.wrapping_add(1);
                affected.push(MaterialId(i as u32));
            }
        }
        if !affected.is_empty() {
            self.generation = self.generation.wrapping_add(1);
        }
        affected
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (MaterialId(i as u32), &e.material))
    }

    pub fn describe(&self) -> Vec<MaterialDescription<'_>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| MaterialDescription {
                id: MaterialId(i as u32),
                version: e.version,
                material: &e.material,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}
