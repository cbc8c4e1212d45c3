pub mod host;
pub mod runner;

pub use runner::GameRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper returning `None` before `game_init`
/// - All wasm-bindgen exports (game_init, game_tick, input, controls,
///   texture callbacks, buffer and JSON accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use orrery_engine::*;
///
/// mod game;
/// use game::MyScene;
///
/// orrery_web::export_game!(MyScene, "my-scene");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `orrery_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: called before game_init()", $game_name);
                        None
                    }
                }
            })
        }

        /// Build the scene. Returns the init report as JSON.
        #[wasm_bindgen]
        pub fn game_init() -> String {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            let report = with_runner(|r| {
                let mut report = r.init();
                let summary = r.context().load_summary();
                let text = $crate::host::progress_text(summary.loaded, summary.failed, summary.requested);
                if !$crate::host::set_status($crate::host::STATUS_ELEMENT_ID, &text) {
                    report.warn(format!("missing #{} element", $crate::host::STATUS_ELEMENT_ID));
                }
                report
            });

            match report.map(|report| serde_json::to_string(&report)) {
                Some(Ok(json)) => {
                    log::info!("{}: initialized", $game_name);
                    json
                }
                Some(Err(err)) => {
                    log::error!("{}: init report could not be serialised: {}", $game_name, err);
                    String::from(r#"{"status":"degraded"}"#)
                }
                None => String::from(r#"{"status":"degraded"}"#),
            }
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_wheel(delta: f32) {
            with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
        }

        #[wasm_bindgen]
        pub fn game_resize(width: u32, height: u32, pixel_ratio: f32) {
            with_runner(|r| r.resize(width, height, pixel_ratio));
        }

        /// Write a tweak-panel control. Returns the applied value, NaN if rejected.
        #[wasm_bindgen]
        pub fn game_set_control(key: &str, value: f32) -> f32 {
            with_runner(|r| r.set_control(key, value)).unwrap_or(f32::NAN)
        }

        /// Queue a tweak-panel write by control index. Applied on the next tick.
        #[wasm_bindgen]
        pub fn game_control(index: u32, value: f32) {
            with_runner(|r| r.push_input(InputEvent::Control { index: index as usize, value }));
        }

        #[wasm_bindgen]
        pub fn game_texture_loaded(texture: u32) {
            with_runner(|r| {
                r.texture_loaded(texture);
                let s = r.context().load_summary();
                $crate::host::set_status(
                    $crate::host::STATUS_ELEMENT_ID,
                    &$crate::host::progress_text(s.loaded, s.failed, s.requested),
                );
            });
        }

        #[wasm_bindgen]
        pub fn game_texture_failed(texture: u32, reason: &str) {
            with_runner(|r| {
                r.texture_failed(texture, reason);
                let s = r.context().load_summary();
                $crate::host::set_status(
                    $crate::host::STATUS_ELEMENT_ID,
                    &$crate::host::progress_text(s.loaded, s.failed, s.requested),
                );
            });
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_buffer_ptr() -> *const f32 {
            with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_static_points_ptr() -> *const f32 {
            with_runner(|r| r.static_points_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_static_point_count() -> u32 {
            with_runner(|r| r.static_point_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_scene_json() -> String {
            with_runner(|r| r.scene_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_materials_json() -> String {
            with_runner(|r| r.materials_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_controls_json() -> String {
            with_runner(|r| r.controls_json()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_load_summary_json() -> String {
            with_runner(|r| r.load_summary_json()).unwrap_or_default()
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_trail_vertices() -> u32 {
            with_runner(|r| r.max_trail_vertices()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or(0)
        }
    };
}
