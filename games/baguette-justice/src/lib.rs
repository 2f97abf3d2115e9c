use wasm_bindgen::prelude::*;
use baguette_engine::*;

pub mod charge;
pub mod controller;
pub mod cues;
pub mod enemy;
pub mod game;
pub mod justice;
pub mod state;
pub mod tuning;

pub use game::BaguetteJustice;

baguette_web::export_game!(BaguetteJustice, "baguette-justice");

/// Current match snapshot as JSON.
#[wasm_bindgen]
pub fn get_snapshot_json() -> String {
    with_runner(|r| r.game().snapshot_json())
}

