use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod config;
pub mod controller;
pub mod device;
pub mod display;
pub mod error;
pub mod flags;
pub mod frame;
pub mod fullscreen;
pub mod host;
pub mod input;
pub mod page;
pub mod probe;
mod shared;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use controller::{CanvasSize, PresentationController, PresentationState};
pub use device::PresentationDevice;
pub use error::BridgeError;
pub use host::{Host, MessageValue};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = page::current_config();
    if console_log::init_with_level(config.log_level).is_err() {
        web_sys::console::warn_1(&JsValue::from_str("logger already installed"));
    }

    if let Err(err) = page::install_globals(vr_init, post_render) {
        web_sys::console::error_1(&err.into());
    }
}

#[wasm_bindgen(js_name = vrInit)]
pub fn vr_init() {
    if let Err(err) = page::init() {
        log::error!("[vrInit] {}", err);
    }
}

#[wasm_bindgen(js_name = postRender)]
pub fn post_render() {
    page::post_render();
}
