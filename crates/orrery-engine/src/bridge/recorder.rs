//! `Renderer` backend that records passes into the shared buffer.
//!
//! The page replays the pass list each animation frame with its own GPU
//! renderer. Offscreen passes are strict: a visible node whose geometry was
//! disposed fails the pass. A pass straight to the screen draws what it can.

use crate::api::types::GameEvent;
use crate::bridge::protocol::*;
use crate::components::material::{Material, MaterialLibrary};
use crate::error::RenderError;
use crate::renderer::bloom::BloomSettings;
use crate::renderer::camera::{PerspectiveCamera, Viewport};
use crate::renderer::compositor::FrameOutcome;
use crate::renderer::instance::{InstanceBuffer, NodeInstance, PassKind, PassRecord, PointVertex};
use crate::renderer::traits::{FrameData, RenderTarget, Renderer};
use crate::systems::lighting::LightState;

/// Per-frame data written after the passes.
pub struct FrameSummary<'a> {
    pub camera: &'a PerspectiveCamera,
    pub materials: &'a MaterialLibrary,
    pub lights: &'a LightState,
    pub trail: &'a [PointVertex],
    pub events: &'a [GameEvent],
    pub outcome: &'a FrameOutcome,
    pub viewport: Viewport,
    pub elapsed: f32,
    pub clear_color: [f32; 3],
    pub static_points_version: u32,
    pub geometry_version: u32,
}

pub struct FrameRecorder {
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    passes: Vec<PassRecord>,
    instances: InstanceBuffer,
    bloom: BloomSettings,
    physical_size: (u32, u32),
    frame: u64,
}

impl FrameRecorder {
    pub fn new(layout: ProtocolLayout) -> Self {
        let buffer = layout.allocate();
        let instances = InstanceBuffer::with_capacity(layout.max_instances);
        let passes = Vec::with_capacity(layout.max_passes);
        Self {
            layout,
            buffer,
            passes,
            instances,
            bloom: BloomSettings::default(),
            physical_size: (0, 0),
            frame: 0,
        }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Clear pass and instance lists for a new frame.
    pub fn begin_frame(&mut self) {
        self.passes.clear();
        self.instances.clear();
    }

    pub fn passes(&self) -> &[PassRecord] {
        &self.passes
    }

    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    /// Device-pixel size of the render targets, from the last resize.
    pub fn physical_size(&self) -> (u32, u32) {
        self.physical_size
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    fn push_pass(&mut self, record: PassRecord) -> Result<(), RenderError> {
        if self.passes.len() >= self.layout.max_passes {
            return Err(RenderError::CapacityExceeded {
                section: "passes",
                requested: self.passes.len() + 1,
                capacity: self.layout.max_passes,
            });
        }
        self.passes.push(record);
        Ok(())
    }

    /// Serialise the recorded frame into the shared buffer.
    pub fn finish_frame(&mut self, summary: &FrameSummary) {
        self.frame += 1;
        let layout = &self.layout;
        let buf = &mut self.buffer;

        let camera = summary.camera.uniform();
        write_floats(buf, layout.camera_offset, bytemuck::cast_slice(std::slice::from_ref(&camera)));
        let bloom = self.bloom.params();
        write_floats(buf, layout.bloom_offset, bytemuck::cast_slice(std::slice::from_ref(&bloom)));

        let ambient = summary.lights.ambient();
        write_floats(buf, layout.lights_offset, bytemuck::cast_slice(std::slice::from_ref(&ambient)));
        let lights = clip("lights", summary.lights.as_slice(), layout.max_lights);
        write_floats(buf, layout.lights_offset + 4, bytemuck::cast_slice(lights));

        write_floats(buf, layout.pass_offset, bytemuck::cast_slice(&self.passes));
        write_floats(buf, layout.instance_offset, self.instances.as_floats());

        let trail = clip("trail vertices", summary.trail, layout.max_trail_vertices);
        write_floats(buf, layout.trail_offset, bytemuck::cast_slice(trail));

        let uniform_floats = write_uniforms(buf, layout, summary.materials);

        let events = clip("events", summary.events, layout.max_events);
        write_floats(buf, layout.event_offset, bytemuck::cast_slice(events));

        buf[HEADER_FRAME_COUNTER] = self.frame as f32;
        buf[HEADER_PASS_COUNT] = self.passes.len() as f32;
        buf[HEADER_INSTANCE_COUNT] = self.instances.len() as f32;
        buf[HEADER_TRAIL_VERTEX_COUNT] = trail.len() as f32;
        buf[HEADER_UNIFORM_FLOAT_COUNT] = uniform_floats as f32;
        buf[HEADER_EVENT_COUNT] = events.len() as f32;
        buf[HEADER_LIGHT_COUNT] = lights.len() as f32;
        buf[HEADER_MATERIAL_GENERATION] = summary.materials.generation() as f32;
        buf[HEADER_STATIC_POINTS_VERSION] = summary.static_points_version as f32;
        buf[HEADER_GEOMETRY_VERSION] = summary.geometry_version as f32;
        buf[HEADER_FRAME_OUTCOME] = summary.outcome.code() as f32;
        buf[HEADER_VIEWPORT_WIDTH] = summary.viewport.width as f32;
        buf[HEADER_VIEWPORT_HEIGHT] = summary.viewport.height as f32;
        buf[HEADER_PIXEL_RATIO] = summary.viewport.pixel_ratio;
        buf[HEADER_ELAPSED] = summary.elapsed;
        buf[HEADER_CLEAR_R] = summary.clear_color[0];
        buf[HEADER_CLEAR_G] = summary.clear_color[1];
        buf[HEADER_CLEAR_B] = summary.clear_color[2];
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// Raw pointer for the page's Float32Array view over wasm memory.
    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

fn write_floats(buf: &mut [f32], offset: usize, data: &[f32]) {
    buf[offset..offset + data.len()].copy_from_slice(data);
}

/// Truncate `items` to `capacity`, logging what was dropped.
fn clip<'a, T>(section: &str, items: &'a [T], capacity: usize) -> &'a [T] {
    if items.len() > capacity {
        log::warn!("{section}: {} records exceed capacity {capacity}, dropping the rest", items.len());
        &items[..capacity]
    } else {
        items
    }
}

/// Shader uniforms as `[material_id, n, v0 .. vn-1]` runs. Returns floats written.
fn write_uniforms(buf: &mut [f32], layout: &ProtocolLayout, materials: &MaterialLibrary) -> usize {
    let mut scratch = Vec::new();
    let mut written = 0;
    for (id, material) in materials.iter() {
        let Material::Shader(shader) = material else { continue };
        scratch.clear();
        shader.uniforms.write_floats(&mut scratch);
        let run = 2 + scratch.len();
        if written + run > layout.max_uniform_floats {
            log::warn!("uniform block full, skipping material {:?}", id);
            continue;
        }
        let at = layout.uniform_offset + written;
        buf[at] = id.0 as f32;
        buf[at + 1] = scratch.len() as f32;
        write_floats(buf, at + 2, &scratch);
        written += run;
    }
    written
}

impl Renderer for FrameRecorder {
    fn backend(&self) -> &'static str {
        "recorder"
    }

    fn render_scene(&mut self, frame: &FrameData, target: RenderTarget) -> Result<(), RenderError> {
        let start = self.instances.len();
        let lenient = target == RenderTarget::Screen;
        let hidden = frame.materials.hidden();

        for node in frame.scene.iter() {
            if !node.is_drawable() || node.material == Some(hidden) {
                continue;
            }
            let Some(instance) = NodeInstance::from_node(node) else {
                if lenient {
                    log::warn!("skipping node {:?} with no geometry", node.id);
                    continue;
                }
                self.instances.truncate(start);
                return Err(RenderError::MissingGeometry(node.id));
            };
            if self.instances.len() >= self.layout.max_instances {
                let requested = self.instances.len() + 1;
                self.instances.truncate(start);
                return Err(RenderError::CapacityExceeded {
                    section: "instances",
                    requested,
                    capacity: self.layout.max_instances,
                });
            }
            self.instances.push(instance);
        }

        let count = self.instances.len() - start;
        let pass = PassRecord::new(PassKind::Scene, target.as_u8(), start as u32, count as u32);
        if let Err(err) = self.push_pass(pass) {
            self.instances.truncate(start);
            return Err(err);
        }
        Ok(())
    }

    fn bloom_pass(
        &mut self,
        settings: &BloomSettings,
        source: RenderTarget,
        dest: RenderTarget,
    ) -> Result<(), RenderError> {
        self.bloom = settings.sanitized();
        self.push_pass(PassRecord::new(PassKind::Bloom, dest.as_u8(), source.as_u8() as u32, 0))
    }

    fn composite(
        &mut self,
        base: RenderTarget,
        bloom: RenderTarget,
        dest: RenderTarget,
    ) -> Result<(), RenderError> {
        self.push_pass(PassRecord::new(
            PassKind::Composite,
            dest.as_u8(),
            base.as_u8() as u32,
            bloom.as_u8() as u32,
        ))
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.physical_size = (width, height);
    }

    fn reset_frame(&mut self) {
        self.begin_frame();
    }
}
