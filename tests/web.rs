#![cfg(target_arch = "wasm32")]

use particle_field::web::{ParticleBackground, SnowfallOverlay};
use particle_field::{FieldConfig, SnowConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn mount_canvas() -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas
        .style()
        .set_property("width", "320px")
        .unwrap();
    canvas
        .style()
        .set_property("height", "240px")
        .unwrap();
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

#[wasm_bindgen_test]
fn particle_background_runs_until_destroyed() {
    let canvas = mount_canvas();
    let config = FieldConfig {
        particle_count: 12,
        ..FieldConfig::default()
    };
    let mut background = ParticleBackground::attach(canvas.clone(), Some(config)).unwrap();
    assert!(background.running());
    assert_eq!(background.particle_count(), 12);

    let dpr = web_sys::window().unwrap().device_pixel_ratio();
    assert_eq!(canvas.width(), (320.0 * dpr) as u32);
    assert_eq!(canvas.height(), (240.0 * dpr) as u32);

    background.destroy();
    assert!(!background.running());
    background.destroy();
}

#[wasm_bindgen_test]
fn canvas_with_another_context_is_rejected() {
    let canvas = mount_canvas();
    // Once a canvas hands out one context type it refuses every other one
    if canvas.get_context("bitmaprenderer").ok().flatten().is_none() {
        return;
    }
    assert!(ParticleBackground::attach(canvas, None).is_err());
}

#[wasm_bindgen_test]
fn snowfall_overlay_accepts_navigation_notices() {
    let canvas = mount_canvas();
    let mut overlay = SnowfallOverlay::attach(canvas, Some(SnowConfig::default())).unwrap();
    assert!(overlay.running());
    overlay.notify_navigation();
    overlay.destroy();
    assert!(!overlay.running());
}
