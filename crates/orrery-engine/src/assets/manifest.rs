use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Texture manifest describing every image a game requests at startup.
/// Loaded from JSON; the page fetches each entry relative to `base_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureManifest {
    /// Directory prefix applied to every entry's path (e.g. "textures/").
    #[serde(default)]
    pub base_path: String,
    pub textures: Vec<TextureDescriptor>,
}

/// Describes one texture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Lookup name used by game code (e.g. "earth.normal").
    pub name: String,
    /// Path relative to the manifest's base path.
    pub path: String,
    #[serde(default)]
    pub kind: TextureKind,
}

/// How a texture is sampled. Decides which material slot it fills and
/// what the page does with it (color space, wrap mode).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    #[default]
    Color,
    Normal,
    Specular,
    Bump,
    Alpha,
    /// One face of a cube map; faces are ordered +X, -X, +Y, -Y, +Z, -Z.
    SkyFace { face: u8 },
    /// Equirectangular panorama.
    Panorama,
}

impl TextureManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        serde_json::from_str(json).map_err(AssetError::Manifest)
    }

    pub fn find(&self, name: &str) -> Option<&TextureDescriptor> {
        self.textures.iter().find(|t| t.name == name)
    }

    /// Full fetch path of an entry.
    pub fn url(&self, desc: &TextureDescriptor) -> String {
        if self.base_path.is_empty() || self.base_path.ends_with('/') {
            format!("{}{}", self.base_path, desc.path)
        } else {
            format!("{}/{}", self.base_path, desc.path)
        }
    }

    /// Cube-face entries in face order, if all six are listed.
    pub fn sky_faces(&self) -> Option<[&TextureDescriptor; 6]> {
        let mut faces: [Option<&TextureDescriptor>; 6] = [None; 6];
        for desc in &self.textures {
            if let TextureKind::SkyFace { face } = desc.kind {
                if let Some(slot) = faces.get_mut(face as usize) {
                    *slot = Some(desc);
                }
            }
        }
        let [a, b, c, d, e, f] = faces;
        Some([a?, b?, c?, d?, e?, f?])
    }

    pub fn panorama(&self) -> Option<&TextureDescriptor> {
        self.textures.iter().find(|t| t.kind == TextureKind::Panorama)
    }
}
