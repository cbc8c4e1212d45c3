use serde::Serialize;

use crate::api::types::{GameEvent, NodeId};
use crate::assets::registry::{LoadSummary, TextureRegistry, TextureRequest};
use crate::components::material::MaterialLibrary;
use crate::components::node::Node;
use crate::controls::ControlDescription;
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::error::ControlError;
use crate::extensions::transform::TransformGraph;
use crate::input::queue::InputQueue;
use crate::renderer::bloom::BloomSettings;
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::instance::PointVertex;
use crate::systems::lighting::LightState;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Longest frame delta fed to the game, in seconds (default: 0.1).
    pub max_dt: f32,
    /// Maximum node instances across all passes of one frame (default: 256).
    pub max_instances: usize,
    /// Maximum recorded passes per frame (default: 8).
    pub max_passes: usize,
    /// Maximum dynamic trail vertices per frame (default: 4096).
    pub max_trail_vertices: usize,
    /// Size of the shader uniform block in floats (default: 256).
    pub max_uniform_floats: usize,
    /// Maximum point lights (default: 4).
    pub max_lights: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Bloom tunables at startup.
    pub bloom: BloomSettings,
    /// Canvas clear color.
    pub clear_color: [f32; 3],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            max_instances: 256,
            max_passes: 8,
            max_trail_vertices: 4096,
            max_uniform_floats: 256,
            max_lights: 4,
            max_events: 32,
            bloom: BloomSettings::default(),
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Whether the scene came up with everything it asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStatus {
    Ready,
    /// Running, but something is missing (a host element, a manifest entry).
    Degraded,
}

/// Result of initialisation, handed to the embedding page as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub status: InitStatus,
    pub nodes: usize,
    pub materials: usize,
    /// Fetches the page should issue.
    pub textures: Vec<TextureRequest>,
    pub controls: Vec<ControlDescription>,
    pub warnings: Vec<String>,
}

impl InitReport {
    pub fn ready() -> Self {
        Self {
            status: InitStatus::Ready,
            nodes: 0,
            materials: 0,
            textures: Vec::new(),
            controls: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a warning. Any warning degrades the status.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.warnings.push(message);
        self.status = InitStatus::Degraded;
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the scene, request textures, set up controls.
    fn init(&mut self, ctx: &mut EngineContext) -> InitReport;

    /// Per-frame update, before the frame is rendered.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Write a tweak-panel control. Returns the value actually applied.
    fn set_control(&mut self, _ctx: &mut EngineContext, key: &str, _value: f32) -> Result<f32, ControlError> {
        Err(ControlError::UnknownKey(key.to_string()))
    }

    /// Widget list for the tweak panel.
    fn describe_controls(&self) -> Vec<ControlDescription> {
        Vec::new()
    }
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub graph: TransformGraph,
    pub materials: MaterialLibrary,
    pub textures: TextureRegistry,
    pub lights: LightState,
    pub camera: PerspectiveCamera,
    pub viewport: Viewport,
    pub clock: FrameClock,
    pub bloom: BloomSettings,
    /// When false the runner renders without the bloom pipeline.
    pub bloom_enabled: bool,
    pub clear_color: [f32; 3],
    /// Static point cloud (starfield), read by the page when the version changes.
    pub static_points: Vec<PointVertex>,
    static_points_version: u32,
    geometry_version: u32,
    /// Trail vertices rebuilt every frame.
    pub trail: Vec<PointVertex>,
    pub events: Vec<GameEvent>,
    /// Outcome code of the last rendered frame (see `FrameOutcome::code`).
    pub frame_outcome: u32,
    next_id: u32,
}

impl EngineContext {
    pub fn new() -> Self {
        Self::with_config(&GameConfig::default())
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self {
            scene: Scene::new(),
            graph: TransformGraph::new(),
            materials: MaterialLibrary::new(),
            textures: TextureRegistry::new(),
            lights: LightState::with_capacity(config.max_lights),
            camera: PerspectiveCamera::default(),
            viewport: Viewport::default(),
            clock: FrameClock::new(config.max_dt),
            bloom: config.bloom,
            bloom_enabled: true,
            clear_color: config.clear_color,
            static_points: Vec::new(),
            static_points_version: 0,
            geometry_version: 0,
            trail: Vec::with_capacity(config.max_trail_vertices),
            events: Vec::new(),
            frame_outcome: 0,
            next_id: 1,
        }
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a root node to the scene and the transform graph.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.graph.register(id);
        self.scene.spawn(node);
        id
    }

    /// Add a node hanging off `parent`.
    pub fn spawn_child(&mut self, node: Node, parent: NodeId) -> NodeId {
        let id = node.id;
        self.graph.set_parent(id, Some(parent));
        self.scene.spawn(node);
        id
    }

    /// Remove a node. Its children become roots.
    pub fn despawn(&mut self, id: NodeId) -> Option<Node> {
        self.graph.remove(id);
        self.scene.despawn(id)
    }

    /// Replace the static point cloud.
    pub fn set_static_points(&mut self, points: Vec<PointVertex>) {
        self.static_points = points;
        self.static_points_version = self.static_points_version.wrapping_add(1);
    }

    pub fn static_points_version(&self) -> u32 {
        self.static_points_version
    }

    /// Tell the page to re-read node geometry (e.g. after a tessellation change).
    pub fn mark_geometry_changed(&mut self) {
        self.geometry_version = self.geometry_version.wrapping_add(1);
    }

    pub fn geometry_version(&self) -> u32 {
        self.geometry_version
    }

    /// Apply a new viewport to the camera. Zero-sized viewports are ignored.
    /// Returns true when the size actually changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            log::warn!("ignoring resize to {}x{}", viewport.width, viewport.height);
            return false;
        }
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.camera.resize(&viewport);
        true
    }

    pub fn load_summary(&self) -> LoadSummary {
        self.textures.summary()
    }

    /// Emit a game event to be forwarded to the page.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (trail vertices, events).
    pub fn clear_frame_data(&mut self) {
        self.trail.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_child_links_graph() {
        let mut ctx = EngineContext::new();
        let earth = ctx.next_id();
        let pivot = ctx.next_id();
        ctx.spawn(Node::new(earth).with_translation(Vec3::new(15.0, 0.0, 0.0)));
        ctx.spawn_child(Node::new(pivot).with_translation(Vec3::new(2.0, 0.0, 0.0)), earth);
        ctx.graph.propagate(&mut ctx.scene);
        assert_eq!(ctx.graph.parent(pivot), Some(earth));
        assert!((ctx.scene.get(pivot).unwrap().world_position() - Vec3::new(17.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn resize_updates_camera_and_leaves_transforms() {
        let mut ctx = EngineContext::new();
        let id = ctx.next_id();
        ctx.spawn(Node::new(id).with_translation(Vec3::new(3.0, 1.0, 0.0)));
        let before = ctx.scene.get(id).unwrap().local;

        assert!(ctx.resize(Viewport::new(1000, 500, 1.0)));
        assert!(!ctx.resize(Viewport::new(1000, 500, 1.0)));
        assert!(!ctx.resize(Viewport::new(0, 500, 1.0)));

        assert!((ctx.camera.aspect - 2.0).abs() < 1e-6);
        assert_eq!(ctx.scene.get(id).unwrap().local, before);
    }

    #[test]
    fn report_warning_degrades_status() {
        let mut report = InitReport::ready();
        report.warn("no #status element");
        assert_eq!(report.status, InitStatus::Degraded);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
    }

    #[test]
    fn static_points_bump_version() {
        let mut ctx = EngineContext::new();
        ctx.set_static_points(vec![PointVertex::default(); 3]);
        assert_eq!(ctx.static_points_version(), 1);
    }

    #[test]
    fn clear_frame_data_keeps_static_points() {
        let mut ctx = EngineContext::new();
        ctx.set_static_points(vec![PointVertex::default(); 3]);
        ctx.trail.push(PointVertex::default());
        ctx.emit_event(GameEvent::new(1.0, 0.0, 0.0, 0.0));
        ctx.clear_frame_data();
        assert!(ctx.trail.is_empty() && ctx.events.is_empty());
        assert_eq!(ctx.static_points.len(), 3);
    }
}
