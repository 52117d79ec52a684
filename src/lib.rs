use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod common;
pub mod config;
pub mod io;
pub mod pipe;
pub mod session;

pub use common::{Grid, D, P};
pub use config::{ConfigError, GameConfig};
pub use pipe::*;
pub use session::{Command, FlowAnimation, FlowFrame, FlowStep, Response, Session, SessionError, SessionState};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[derive(Serialize, Debug)]
struct FlowCheck {
    connected: bool,
    path: Vec<P>,
}

/// Generates a board and returns its view as JSON, or an empty string when
/// `size` is too small.
#[wasm_bindgen]
pub fn generate_pipe_board(size: i32, seed: f64) -> String {
    let opt = GeneratorOption {
        size,
        ..GeneratorOption::default()
    };
    let generator = match BoardGenerator::new(opt) {
        Ok(generator) => generator,
        Err(_) => return "".to_string(),
    };
    let mut rng = StdRng::seed_from_u64(seed.to_bits());
    match generator.generate(&mut rng) {
        Ok(board) => serde_json::to_string(&board.view()).unwrap_or_default(),
        Err(_) => "".to_string(),
    }
}

/// Checks a board given in the text format; empty string if it cannot be read.
#[wasm_bindgen]
pub fn check_pipe_board(text: &str) -> String {
    let board = match read_board(&mut text.as_bytes()) {
        Ok(board) => board,
        Err(_) => return "".to_string(),
    };
    let path = board.flow_path();
    let payload = FlowCheck {
        connected: path.is_some(),
        path: path.unwrap_or_default(),
    };
    serde_json::to_string(&payload).unwrap_or_default()
}
