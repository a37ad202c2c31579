// Ambient canvas effects for the browser: a pointer-reactive particle field
// and a snowfall overlay. The simulation and frame loop are plain Rust and
// run anywhere; the `web` module binds them to a canvas when built for wasm.

mod utils;

pub mod animator;
pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod snowfall;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

use wasm_bindgen::prelude::*;

pub use animator::{Animator, FrameScheduler, LoopState, Scene};
pub use config::{FieldConfig, SnowConfig};
pub use error::RenderError;
pub use field::ParticleField;
pub use snowfall::Snowfall;
pub use surface::{Surface, Viewport};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    utils::init_logging();
    log::info!("particle-field {} initialized", env!("CARGO_PKG_VERSION"));
}
