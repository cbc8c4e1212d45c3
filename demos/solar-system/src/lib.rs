use wasm_bindgen::prelude::*;
use orrery_engine::*;

pub mod bodies;
pub mod controls;
pub mod game;
pub mod orbit;
pub mod scene;
pub mod shooting_stars;
pub mod starfield;
pub mod uniforms;

use game::SolarSystem;

orrery_web::export_game!(SolarSystem, "solar-system");
