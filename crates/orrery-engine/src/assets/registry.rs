use serde::Serialize;

use crate::api::types::TextureId;
use crate::assets::manifest::{TextureKind, TextureManifest};
use crate::error::AssetError;

/// Load state of one texture. Requests settle at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum TextureState {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
struct TextureEntry {
    name: String,
    url: String,
    kind: TextureKind,
    state: TextureState,
}

/// One fetch the page should issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureRequest {
    pub id: TextureId,
    pub name: String,
    pub url: String,
    pub kind: TextureKind,
}

/// Load progress counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub requested: usize,
    pub loaded: usize,
    pub failed: usize,
    pub pending: usize,
}

impl LoadSummary {
    pub fn is_settled(&self) -> bool {
        self.pending == 0
    }
}

/// Registry of requested textures and their load state.
///
/// Fetches run on the page and settle in any order; the registry only
/// records outcomes so materials can be refreshed or degraded.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<TextureEntry>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every texture listed in a manifest.
    pub fn from_manifest(manifest: &TextureManifest) -> Self {
        let mut registry = Self::new();
        for desc in &manifest.textures {
            registry.request(&desc.name, manifest.url(desc), desc.kind);
        }
        registry
    }

    /// Request a texture. Requesting the same name twice returns the first id.
    pub fn request(&mut self, name: &str, url: impl Into<String>, kind: TextureKind) -> TextureId {
        if let Some(id) = self.id_of(name) {
            return id;
        }
        let id = TextureId(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            name: name.to_string(),
            url: url.into(),
            kind,
            state: TextureState::Pending,
        });
        id
    }

    pub fn id_of(&self, name: &str) -> Option<TextureId> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .map(|i| TextureId(i as u32))
    }

    pub fn name(&self, id: TextureId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|e| e.name.as_str())
    }

    pub fn state(&self, id: TextureId) -> Option<&TextureState> {
        self.entries.get(id.0 as usize).map(|e| &e.state)
    }

    /// Record a successful load. Returns false if the request had already settled.
    pub fn mark_loaded(&mut self, id: TextureId) -> Result<bool, AssetError> {
        let entry = self.entry_mut(id)?;
        if entry.state != TextureState::Pending {
            log::debug!("texture {} settled twice, ignoring load", entry.name);
            return Ok(false);
        }
        entry.state = TextureState::Loaded;
        log::debug!("texture {} loaded", entry.name);
        Ok(true)
    }

    /// Record a failed load. Logged, never fatal. Returns false if already settled.
    pub fn mark_failed(&mut self, id: TextureId, reason: impl Into<String>) -> Result<bool, AssetError> {
        let entry = self.entry_mut(id)?;
        if entry.state != TextureState::Pending {
            log::debug!("texture {} settled twice, ignoring failure", entry.name);
            return Ok(false);
        }
        let reason = reason.into();
        log::warn!(
            "{}",
            AssetError::LoadFailed { name: entry.name.clone(), reason: reason.clone() }
        );
        entry.state = TextureState::Failed(reason);
        Ok(true)
    }

    fn entry_mut(&mut self, id: TextureId) -> Result<&mut TextureEntry, AssetError> {
        self.entries
            .get_mut(id.0 as usize)
            .ok_or(AssetError::UnknownTexture(id))
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| e.state == TextureState::Pending).count()
    }

    pub fn summary(&self) -> LoadSummary {
        let mut summary = LoadSummary {
            requested: self.entries.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.state {
                TextureState::Pending => summary.pending += 1,
                TextureState::Loaded => summary.loaded += 1,
                TextureState::Failed(_) => summary.failed += 1,
            }
        }
        summary
    }

    /// Every fetch the page should issue, in id order.
    pub fn requests(&self) -> Vec<TextureRequest> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| TextureRequest {
                id: TextureId(i as u32),
                name: e.name.clone(),
                url: e.url.clone(),
                kind: e.kind,
            })
            .collect()
    }

    /// Names and reasons of every failed texture.
    pub fn failures(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.state {
                TextureState::Failed(reason) => Some((e.name.clone(), reason.clone())),
                _ => None,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TextureRegistry {
        let json = r#"{
            "base_path": "textures/",
            "textures": [
                { "name": "earth", "path": "earth.jpg" },
                { "name": "mars", "path": "mars.jpg" },
                { "name": "sky", "path": "milky_way.jpg", "kind": "panorama" }
            ]
        }"#;
        TextureRegistry::from_manifest(&TextureManifest::from_json(json).unwrap())
    }

    #[test]
    fn loads_from_manifest() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.pending_count(), 3);
        let sky = reg.id_of("sky").unwrap();
        assert_eq!(reg.requests()[sky.0 as usize].url, "textures/milky_way.jpg");
        assert_eq!(reg.requests()[sky.0 as usize].kind, TextureKind::Panorama);
    }

    #[test]
    fn duplicate_request_reuses_id() {
        let mut reg = registry();
        let again = reg.request("earth", "elsewhere.jpg", TextureKind::Color);
        assert_eq!(Some(again), reg.id_of("earth"));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn settles_in_any_order() {
        let mut reg = registry();
        let mars = reg.id_of("mars").unwrap();
        let earth = reg.id_of("earth").unwrap();
        assert!(reg.mark_failed(mars, "404").unwrap());
        assert!(reg.mark_loaded(earth).unwrap());
        assert_eq!(
            reg.summary(),
            LoadSummary { requested: 3, loaded: 1, failed: 1, pending: 1 }
        );
        assert_eq!(reg.failures(), vec![("mars".to_string(), "404".to_string())]);
    }

    #[test]
    fn settling_twice_is_ignored() {
        let mut reg = registry();
        let earth = reg.id_of("earth").unwrap();
        reg.mark_failed(earth, "timeout").unwrap();
        assert!(!reg.mark_loaded(earth).unwrap());
        assert_eq!(reg.state(earth), Some(&TextureState::Failed("timeout".into())));
    }

    #[test]
    fn unknown_texture_is_an_error() {
        let mut reg = TextureRegistry::new();
        assert!(matches!(reg.mark_loaded(TextureId(4)), Err(AssetError::UnknownTexture(_))));
    }
}
