//! WASM bindings for the avatar cropper dialog.
//!
//! The page owns one `JsAvatarCropper` per open dialog. Pointer handlers
//! forward to the drag methods, the zoom slider to `set_scale`, and after
//! each call the page repaints with `render_image_data()`.
//!
//! # Example (TypeScript)
//!
//! ```typescript
//! const cropper = new JsAvatarCropper({ output_size: 300 });
//! cropper.open_bytes(new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.onpointerdown = (e) => cropper.begin_drag(e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => { cropper.update_drag(e.offsetX, e.offsetY); paint(); };
//! canvas.onpointerup = () => cropper.end_drag();
//! slider.min = cropper.min_scale; slider.max = cropper.max_scale;
//!
//! saveButton.onclick = () => cropper.confirm((jpeg, dataUrl) => upload(jpeg));
//! ```

use avatar_crop_core::{AvatarCropper, CropError, CropOutcome, CropperConfig, ImageSource};
use wasm_bindgen::prelude::*;
use wasm_bindgen::Clamped;
use web_sys::ImageData;

use crate::types::JsFrame;

/// Message shown for any decode failure.
pub(crate) const LOAD_FAILED: &str = "Could not load image";

/// The cropper component, exposed to JavaScript.
#[wasm_bindgen]
pub struct JsAvatarCropper {
    inner: AvatarCropper,
}

#[wasm_bindgen]
impl JsAvatarCropper {
    /// Create a cropper. `config` may be `undefined` or a partial
    /// `CropperConfig` object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsAvatarCropper, JsValue> {
        let config: CropperConfig = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Self::with_config(config).map_err(to_js_error)
    }

    /// Load encoded image bytes (JPEG, PNG or WebP).
    pub fn open_bytes(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner
            .open(ImageSource::Bytes(bytes))
            .map_err(to_js_error)
    }

    /// Load a `data:image/...;base64,` URL.
    pub fn open_data_url(&mut self, url: &str) -> Result<(), JsValue> {
        let source = ImageSource::from_url(url).map_err(|e| to_js_error(e.into()))?;
        self.inner.open(source).map_err(to_js_error)
    }

    /// Release the current image.
    pub fn close(&mut self) {
        self.inner.close();
    }

    #[wasm_bindgen(getter)]
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.inner.is_dragging()
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        self.inner.begin_drag(x, y);
    }

    pub fn update_drag(&mut self, x: f64, y: f64) {
        self.inner.update_drag(x, y);
    }

    pub fn end_drag(&mut self) {
        self.inner.end_drag();
    }

    pub fn set_scale(&mut self, value: f64) {
        self.inner.set_scale(value);
    }

    pub fn rotate(&mut self) {
        self.inner.rotate();
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> Option<f64> {
        self.inner.transform().map(|t| t.scale)
    }

    #[wasm_bindgen(getter)]
    pub fn min_scale(&self) -> Option<f64> {
        self.inner.min_scale()
    }

    #[wasm_bindgen(getter)]
    pub fn max_scale(&self) -> Option<f64> {
        self.inner.max_scale()
    }

    /// Rotation in degrees: 0, 90, 180 or 270.
    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> Option<u16> {
        self.inner.transform().map(|t| t.rotation.degrees())
    }

    #[wasm_bindgen(getter)]
    pub fn offset_x(&self) -> Option<f64> {
        self.inner.transform().map(|t| t.offset.x)
    }

    #[wasm_bindgen(getter)]
    pub fn offset_y(&self) -> Option<f64> {
        self.inner.transform().map(|t| t.offset.y)
    }

    /// The current frame as RGB, or `undefined` with nothing loaded.
    pub fn frame(&self) -> Option<JsFrame> {
        self.inner.frame().cloned().map(JsFrame::from_decoded)
    }

    /// The current frame as `ImageData` for `putImageData`.
    pub fn render_image_data(&self) -> Result<ImageData, JsValue> {
        let frame = self
            .inner
            .frame()
            .ok_or_else(|| JsValue::from_str(&CropError::NotLoaded.to_string()))?;
        let rgba = frame.to_rgba();
        ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_slice()),
            frame.width,
            frame.height,
        )
    }

    /// Export the avatar and call `on_confirm(jpegBytes, dataUrl)`.
    pub fn confirm(&mut self, on_confirm: &js_sys::Function) -> Result<(), JsValue> {
        let image = match self.inner.confirm().map_err(to_js_error)? {
            CropOutcome::Confirmed(image) => image,
            CropOutcome::Cancelled => return Ok(()),
        };
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let data_url = JsValue::from_str(&image.to_data_url());
        on_confirm.call2(&JsValue::NULL, &bytes, &data_url)?;
        Ok(())
    }

    /// Abort, release the image, and call `on_cancel()`.
    pub fn cancel(&mut self, on_cancel: &js_sys::Function) -> Result<(), JsValue> {
        self.inner.cancel();
        on_cancel.call0(&JsValue::NULL)?;
        Ok(())
    }
}

impl JsAvatarCropper {
    pub(crate) fn with_config(config: CropperConfig) -> Result<Self, CropError> {
        Ok(Self {
            inner: AvatarCropper::new(config)?,
        })
    }
}

/// Map a cropper error to a JS error value. Decode failures are collapsed
/// into a generic message; the detail goes to the console log.
pub(crate) fn to_js_error(err: CropError) -> JsValue {
    JsValue::from_str(&user_message(&err))
}

fn user_message(err: &CropError) -> String {
    match err {
        CropError::Decode(e) => {
            log::warn!("Image load failed: {e}");
            LOAD_FAILED.to_string()
        }
        other => other.to_string(),
    }
}


/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_default_config_from_undefined() {
        let c = JsAvatarCropper::new(JsValue::UNDEFINED).unwrap();
        assert!(!c.is_loaded());
    }

    #[wasm_bindgen_test]
    fn test_open_garbage_gives_generic_error() {
        let mut c = JsAvatarCropper::new(JsValue::UNDEFINED).unwrap();
        let err = c.open_bytes(vec![1, 2, 3]).unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some(LOAD_FAILED));
    }

    #[wasm_bindgen_test]
    fn test_remote_url_rejected() {
        let mut c = JsAvatarCropper::new(JsValue::UNDEFINED).unwrap();
        assert!(c.open_data_url("https://example.com/me.jpg").is_err());
    }

    #[wasm_bindgen_test]
    fn test_render_requires_image() {
        let c = JsAvatarCropper::new(JsValue::UNDEFINED).unwrap();
        assert!(c.render_image_data().is_err());
    }
}
