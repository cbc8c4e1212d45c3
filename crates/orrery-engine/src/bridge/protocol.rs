/// Shared buffer layout.
/// Must stay in sync with the page's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 32 floats]
/// [Camera: 36 floats]
/// [Bloom: 4 floats]
/// [Lights: 4 ambient + max_lights × 8 floats]
/// [Passes: max_passes × 4 floats]
/// [Instances: max_instances × 20 floats]
/// [Trail vertices: max_trail_vertices × 8 floats]
/// [Uniforms: max_uniform_floats floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written once into the header at init.
/// The page reads them from the header to compute offsets dynamically.

use crate::api::game::GameConfig;
use crate::api::types::GameEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{NodeInstance, PassRecord, PointVertex};
use crate::systems::lighting::{AmbientLight, PointLight};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_PASSES: usize = 3;
pub const HEADER_PASS_COUNT: usize = 4;
pub const HEADER_MAX_INSTANCES: usize = 5;
pub const HEADER_INSTANCE_COUNT: usize = 6;
pub const HEADER_MAX_TRAIL_VERTICES: usize = 7;
pub const HEADER_TRAIL_VERTEX_COUNT: usize = 8;
pub const HEADER_MAX_UNIFORM_FLOATS: usize = 9;
pub const HEADER_UNIFORM_FLOAT_COUNT: usize = 10;
pub const HEADER_MAX_EVENTS: usize = 11;
pub const HEADER_EVENT_COUNT: usize = 12;
pub const HEADER_MAX_LIGHTS: usize = 13;
pub const HEADER_LIGHT_COUNT: usize = 14;
/// Bumped whenever any material changed; the page re-reads the material JSON.
pub const HEADER_MATERIAL_GENERATION: usize = 15;
/// Bumped whenever the static point cloud changed.
pub const HEADER_STATIC_POINTS_VERSION: usize = 16;
/// `FrameOutcome::code` of the last frame.
pub const HEADER_FRAME_OUTCOME: usize = 17;
pub const HEADER_VIEWPORT_WIDTH: usize = 18;
pub const HEADER_VIEWPORT_HEIGHT: usize = 19;
pub const HEADER_PIXEL_RATIO: usize = 20;
pub const HEADER_ELAPSED: usize = 21;
pub const HEADER_CLEAR_R: usize = 22;
pub const HEADER_CLEAR_G: usize = 23;
pub const HEADER_CLEAR_B: usize = 24;
/// Bumped whenever node geometry changed; the page re-reads the scene JSON.
pub const HEADER_GEOMETRY_VERSION: usize = 25;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera block.
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Floats in the bloom block: strength, radius, threshold, pad.
pub const BLOOM_FLOATS: usize = 4;

/// Floats per point light (fixed wire format).
pub const LIGHT_FLOATS: usize = PointLight::FLOATS;

/// Floats per pass record: kind, target, a, b (fixed wire format).
pub const PASS_FLOATS: usize = PassRecord::FLOATS;

/// Floats per node instance (fixed wire format).
pub const INSTANCE_FLOATS: usize = NodeInstance::FLOATS;

/// Floats per trail vertex (fixed wire format).
pub const TRAIL_VERTEX_FLOATS: usize = PointVertex::FLOATS;

/// Floats per game event: kind, a, b, c (fixed wire format).
pub const EVENT_FLOATS: usize = GameEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_lights: usize,
    pub max_passes: usize,
    pub max_instances: usize,
    pub max_trail_vertices: usize,
    pub max_uniform_floats: usize,
    pub max_events: usize,

    /// Offset (in floats) where the camera block begins.
    pub camera_offset: usize,
    pub bloom_offset: usize,
    /// Ambient term first, then point lights.
    pub lights_offset: usize,
    pub pass_offset: usize,
    pub instance_offset: usize,
    pub trail_offset: usize,
    pub uniform_offset: usize,
    pub event_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_lights: usize,
        max_passes: usize,
        max_instances: usize,
        max_trail_vertices: usize,
        max_uniform_floats: usize,
        max_events: usize,
    ) -> Self {
        let camera_offset = HEADER_FLOATS;
        let bloom_offset = camera_offset + CAMERA_FLOATS;
        let lights_offset = bloom_offset + BLOOM_FLOATS;
        let pass_offset = lights_offset + AmbientLight::FLOATS + max_lights * LIGHT_FLOATS;
        let instance_offset = pass_offset + max_passes * PASS_FLOATS;
        let trail_offset = instance_offset + max_instances * INSTANCE_FLOATS;
        let uniform_offset = trail_offset + max_trail_vertices * TRAIL_VERTEX_FLOATS;
        let event_offset = uniform_offset + max_uniform_floats;
        let buffer_total_floats = event_offset + max_events * EVENT_FLOATS;

        Self {
            max_lights,
            max_passes,
            max_instances,
            max_trail_vertices,
            max_uniform_floats,
            max_events,
            camera_offset,
            bloom_offset,
            lights_offset,
            pass_offset,
            instance_offset,
            trail_offset,
            uniform_offset,
            event_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.max_lights,
            config.max_passes,
            config.max_instances,
            config.max_trail_vertices,
            config.max_uniform_floats,
            config.max_events,
        )
    }

    /// Zeroed buffer with the capacities already in the header.
    pub fn allocate(&self) -> Vec<f32> {
        let mut buffer = vec![0.0; self.buffer_total_floats];
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        buffer[HEADER_MAX_PASSES] = self.max_passes as f32;
        buffer[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        buffer[HEADER_MAX_TRAIL_VERTICES] = self.max_trail_vertices as f32;
        buffer[HEADER_MAX_UNIFORM_FLOATS] = self.max_uniform_floats as f32;
        buffer[HEADER_MAX_EVENTS] = self.max_events as f32;
        buffer
    }
}
