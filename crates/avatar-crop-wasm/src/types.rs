//! WASM-compatible wrapper types for image data.

use avatar_crop_core::DecodedImage;
use wasm_bindgen::prelude::*;

/// An RGB raster (a decoded source or a rendered frame) for JavaScript.
///
/// # Memory Management
///
/// Pixels live in WASM memory. `pixels()` and `rgba()` copy them out as a
/// `Uint8Array`; the generated `free()` releases a large frame early.
#[wasm_bindgen]
pub struct JsFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsFrame {
    /// Create a frame from dimensions and RGB pixel data (3 bytes per pixel).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsFrame {
        JsFrame {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the RGB pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGB pixel data as Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// RGBA pixel data with opaque alpha, ready for `new ImageData(...)`.
    pub fn rgba(&self) -> Vec<u8> {
        self.to_decoded().to_rgba()
    }
}

impl JsFrame {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Note: This clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let frame = JsFrame::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(frame.width(), 100);
        assert_eq!(frame.height(), 50);
        assert_eq!(frame.byte_length(), 15000);
    }

    #[test]
    fn test_rgba_expansion() {
        let frame = JsFrame::new(2, 1, vec![255, 128, 64, 32, 16, 8]);
        assert_eq!(frame.rgba(), vec![255, 128, 64, 255, 32, 16, 8, 255]);
        assert_eq!(frame.pixels(), vec![255, 128, 64, 32, 16, 8]);
    }

    #[test]
    fn test_from_decoded_round_trip() {
        let decoded = DecodedImage::filled(20, 10, [1, 2, 3]);
        let frame = JsFrame::from_decoded(decoded.clone());
        assert_eq!(frame.to_decoded(), decoded);
    }
}
