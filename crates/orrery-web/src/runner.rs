use orrery_engine::{
    EngineContext, FrameOutcome, FrameRecorder, FrameSummary, Game, GameConfig, InitReport,
    InitStatus, InputEvent, InputQueue, ProtocolLayout, SelectiveBloom, TextureId, Viewport,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game (e.g., `solar-system`) creates a `thread_local!` GameRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    recorder: FrameRecorder,
    bloom: SelectiveBloom,
    config: GameConfig,
    last_outcome: FrameOutcome,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let ctx = EngineContext::with_config(&config);
        let recorder = FrameRecorder::new(ProtocolLayout::from_config(&config));
        let bloom = SelectiveBloom::new(config.bloom, &ctx.viewport);

        Self {
            game,
            ctx,
            input: InputQueue::new(),
            recorder,
            bloom,
            config,
            last_outcome: FrameOutcome::Direct,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) -> InitReport {
        let mut report = self.game.init(&mut self.ctx);
        report.nodes = self.ctx.scene.len();
        report.materials = self.ctx.materials.len();
        report.textures = self.ctx.textures.requests();
        if report.controls.is_empty() {
            report.controls = self.game.describe_controls();
        }

        self.ctx.graph.propagate(&mut self.ctx.scene);
        let (w, h) = self.ctx.viewport.physical_size();
        orrery_engine::Renderer::resize(&mut self.recorder, w, h);
        self.initialized = true;

        match report.status {
            InitStatus::Ready => log::info!(
                "scene ready: {} nodes, {} materials, {} textures requested",
                report.nodes,
                report.materials,
                report.textures.len()
            ),
            InitStatus::Degraded => log::warn!("scene degraded: {}", report.warnings.join("; ")),
        }
        report
    }

    /// `init` serialised for the page. Never fails; a serialisation error
    /// becomes a degraded report carrying the message.
    pub fn init_json(&mut self) -> String {
        let report = self.init();
        serde_json::to_string(&report).unwrap_or_else(|err| {
            log::error!("failed to serialise init report: {err}");
            format!(r#"{{"status":"degraded","warnings":["{}"]}}"#, err.to_string().replace('"', "'"))
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply a new canvas size right away. Runs between frames, never inside one.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        let viewport = Viewport::new(width, height, pixel_ratio);
        if self.ctx.resize(viewport) {
            self.bloom.resize(&viewport, &mut self.recorder);
            log::info!("resized to {}x{} @{}", width, height, viewport.pixel_ratio);
        }
    }

    /// Write a control synchronously. Returns the applied value, or NaN if rejected.
    pub fn set_control(&mut self, key: &str, value: f32) -> f32 {
        match self.game.set_control(&mut self.ctx, key, value) {
            Ok(applied) => applied,
            Err(err) => {
                log::warn!("control write rejected: {err}");
                f32::NAN
            }
        }
    }

    /// A texture fetch completed: refresh every material sampling it.
    pub fn texture_loaded(&mut self, texture: u32) {
        let texture = TextureId(texture);
        match self.ctx.textures.mark_loaded(texture) {
            Ok(true) => {
                for material in self.ctx.materials.users_of(texture) {
                    self.ctx.materials.needs_update(material);
                }
                self.input.push(InputEvent::TextureLoaded { texture });
            }
            Ok(false) => {}
            Err(err) => log::warn!("{err}"),
        }
    }

    /// A texture fetch failed: degrade every material sampling it to its fallback look.
    pub fn texture_failed(&mut self, texture: u32, reason: &str) {
        let texture = TextureId(texture);
        match self.ctx.textures.mark_failed(texture, reason) {
            Ok(true) => {
                let affected = self.ctx.materials.apply_texture_failure(texture);
                log::info!("{} material(s) fell back after texture failure", affected.len());
                self.input.push(InputEvent::TextureFailed { texture });
            }
            Ok(false) => {}
            Err(err) => log::warn!("{err}"),
        }
    }

    /// Run one frame: update the game, propagate transforms, record the passes.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();
        self.ctx.clock.tick(dt);

        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();

        self.ctx.graph.propagate(&mut self.ctx.scene);

        self.bloom.settings = self.ctx.bloom;
        self.bloom.enabled = self.ctx.bloom_enabled;
        self.recorder.begin_frame();
        let outcome = self.bloom.render_frame(
            &mut self.ctx.scene,
            &self.ctx.materials,
            &self.ctx.camera,
            &mut self.recorder,
        );

        self.recorder.finish_frame(&FrameSummary {
            camera: &self.ctx.camera,
            materials: &self.ctx.materials,
            lights: &self.ctx.lights,
            trail: &self.ctx.trail,
            events: &self.ctx.events,
            outcome: &outcome,
            viewport: self.ctx.viewport,
            elapsed: self.ctx.clock.elapsed() as f32,
            clear_color: self.ctx.clear_color,
            static_points_version: self.ctx.static_points_version(),
            geometry_version: self.ctx.geometry_version(),
        });
        self.ctx.frame_outcome = outcome.code();
        self.last_outcome = outcome;
    }

    pub fn last_outcome(&self) -> &FrameOutcome {
        &self.last_outcome
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn recorder(&self) -> &FrameRecorder {
        &self.recorder
    }

    // ---- Pointer accessors for shared buffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.recorder.buffer_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.recorder.buffer_len() as u32
    }

    pub fn static_points_ptr(&self) -> *const f32 {
        self.ctx.static_points.as_ptr() as *const f32
    }

    pub fn static_point_count(&self) -> u32 {
        self.ctx.static_points.len() as u32
    }

    // ---- JSON descriptions, re-read when the header versions change ----

    pub fn scene_json(&self) -> String {
        to_json("scene", &self.ctx.scene.describe())
    }

    pub fn materials_json(&self) -> String {
        to_json("materials", &self.ctx.materials.describe())
    }

    pub fn controls_json(&self) -> String {
        to_json("controls", &self.game.describe_controls())
    }

    pub fn load_summary_json(&self) -> String {
        to_json("load summary", &self.ctx.load_summary())
    }

    // ---- Capacity accessors (read by the page via wasm_bindgen exports) ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_trail_vertices(&self) -> u32 {
        self.config.max_trail_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}

fn to_json<T: serde::Serialize + ?Sized>(what: &str, value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        log::error!("failed to serialise {what}: {err}");
        "null".to_string()
    })
}
