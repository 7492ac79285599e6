//! Avatar Crop WASM - WebAssembly bindings for the avatar cropper
//!
//! This crate exposes `avatar-crop-core` to the web front-end's photo
//! dialog.
//!
//! # Module Structure
//!
//! - `cropper` - `JsAvatarCropper`, the interactive crop/zoom/rotate component
//! - `types` - `JsFrame`, a WASM-compatible RGB raster
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsAvatarCropper } from '@adoras/avatar-crop';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsAvatarCropper();
//! cropper.open_data_url(photoDataUrl);
//! ctx.putImageData(cropper.render_image_data(), 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod types;

pub use cropper::JsAvatarCropper;
pub use types::JsFrame;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        // A logger is already installed (module re-initialized)
        return;
    }
    log::debug!("Initialized avatar-crop-wasm {}", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
