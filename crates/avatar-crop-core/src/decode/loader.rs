//! Decoding an image reference into upright RGB pixels.
//!
//! Decoding is a single capability with two implementations: the
//! [`OrientedDecoder`] honours EXIF orientation, the [`PlainDecoder`] ignores
//! metadata entirely. [`ImageLoader`] tries them in order, so a photo with a
//! damaged EXIF block still loads (possibly sideways) instead of failing.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};

use super::orientation::{apply_orientation, read_orientation};
use super::{DecodeError, DecodedImage, ImageSource};

/// Default cap on encoded input size (25 MiB).
pub const DEFAULT_MAX_SOURCE_BYTES: usize = 25 * 1024 * 1024;

/// Raster formats the loader accepts.
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// One way of turning encoded bytes into a [`DecodedImage`].
pub trait Decoder {
    /// Short name used in log messages.
    fn name(&self) -> &'static str;

    /// Decode `bytes` into RGB pixels.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError>;
}

/// Decodes and applies the EXIF orientation tag.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientedDecoder;

impl Decoder for OrientedDecoder {
    fn name(&self) -> &'static str {
        "oriented"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        // Read orientation before decoding so a bad EXIF block fails fast
        let orientation = read_orientation(bytes)?;
        let img = decode_dynamic(bytes)?;
        finish(apply_orientation(img, orientation))
    }
}

/// Decodes stored pixels as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainDecoder;

impl Decoder for PlainDecoder {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        finish(decode_dynamic(bytes)?)
    }
}

/// Resolves an [`ImageSource`] and runs it through a chain of decoders.
pub struct ImageLoader {
    decoders: Vec<Box<dyn Decoder>>,
    max_source_bytes: usize,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SOURCE_BYTES)
    }
}

impl ImageLoader {
    /// Orientation-aware decoding with a plain fallback.
    pub fn new(max_source_bytes: usize) -> Self {
        Self::with_decoders(
            Box::new(OrientedDecoder),
            vec![Box::new(PlainDecoder)],
            max_source_bytes,
        )
    }

    /// Use a custom decoder chain: `primary` first, then each fallback in
    /// order.
    pub fn with_decoders(
        primary: Box<dyn Decoder>,
        fallbacks: Vec<Box<dyn Decoder>>,
        max_source_bytes: usize,
    ) -> Self {
        let mut decoders = Vec::with_capacity(1 + fallbacks.len());
        decoders.push(primary);
        decoders.extend(fallbacks);
        Self {
            decoders,
            max_source_bytes,
        }
    }

    /// Load an image reference into upright RGB pixels.
    ///
    /// # Errors
    ///
    /// Returns the error of the last decoder in the chain when none succeed,
    /// or an input error (`TooLarge`, `InvalidFormat`, `MalformedDataUrl`)
    /// before any decoding is attempted.
    pub fn load(&self, source: ImageSource) -> Result<DecodedImage, DecodeError> {
        self.check_size(source.estimated_len())?;
        let bytes = source.into_bytes()?;
        self.check_size(bytes.len())?;
        self.decode_bytes(&bytes)
    }

    /// Decode already-resolved bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        sniff_format(bytes)?;

        let mut last_error = DecodeError::InvalidFormat;
        for (i, decoder) in self.decoders.iter().enumerate() {
            match decoder.decode(bytes) {
                Ok(img) => {
                    log::debug!(
                        "Decoded {}x{} image with {} decoder",
                        img.width,
                        img.height,
                        decoder.name()
                    );
                    return Ok(img);
                }
                Err(e) => {
                    if i + 1 < self.decoders.len() {
                        log::warn!(
                            "{} decoder failed ({}), falling back to next decoder",
                            decoder.name(),
                            e
                        );
                    }
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    fn check_size(&self, size: usize) -> Result<(), DecodeError> {
        if size > self.max_source_bytes {
            return Err(DecodeError::TooLarge {
                size,
                limit: self.max_source_bytes,
            });
        }
        Ok(())
    }
}

fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    match image::guess_format(bytes) {
        Ok(format) if SUPPORTED_FORMATS.contains(&format) => Ok(format),
        _ => Err(DecodeError::InvalidFormat),
    }
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))
}

fn finish(img: DynamicImage) -> Result<DecodedImage, DecodeError> {
    let decoded = DecodedImage::from_rgb_image(img.into_rgb8());
    if decoded.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::super::orientation::fixtures::*;
    use super::*;

    #[test]
    fn test_load_png() {
        let img = ImageLoader::default()
            .load(ImageSource::Bytes(two_tone_png(6, 4)))
            .unwrap();
        assert_eq!((img.width, img.height), (6, 4));
        assert_eq!(img.pixel(0, 0), [255, 0, 0]);
        assert_eq!(img.pixel(5, 3), [0, 0, 255]);
    }

    #[test]
    fn test_load_jpeg_applies_orientation() {
        let img = ImageLoader::default()
            .load(ImageSource::Bytes(jpeg_with_orientation(16, 8, 6)))
            .unwrap();
        // Rotate90CW swaps the stored 16x8 into an upright 8x16
        assert_eq!((img.width, img.height), (8, 16));
    }

    #[test]
    fn test_broken_exif_falls_back_to_plain_decode() {
        let img = ImageLoader::default()
            .load(ImageSource::Bytes(jpeg_with_broken_exif(16, 8)))
            .unwrap();
        assert_eq!((img.width, img.height), (16, 8));
    }

    #[test]
    fn test_oriented_decoder_alone_rejects_broken_exif() {
        let loader = ImageLoader::with_decoders(Box::new(OrientedDecoder), Vec::new(), usize::MAX);
        let result = loader.load(ImageSource::Bytes(jpeg_with_broken_exif(16, 8)));
        assert!(matches!(result, Err(DecodeError::ExifError(_))));
    }

    struct Rejecting;

    impl Decoder for Rejecting {
        fn name(&self) -> &'static str {
            "rejecting"
        }

        fn decode(&self, _bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
            Err(DecodeError::ExifError("rejected".to_string()))
        }
    }

    #[test]
    fn test_custom_chain_tries_fallbacks_in_order() {
        let png = two_tone_png(5, 3);

        let loader = ImageLoader::with_decoders(Box::new(Rejecting), Vec::new(), usize::MAX);
        assert!(matches!(
            loader.decode_bytes(&png),
            Err(DecodeError::ExifError(_))
        ));

        let loader = ImageLoader::with_decoders(
            Box::new(Rejecting),
            vec![Box::new(Rejecting), Box::new(PlainDecoder)],
            usize::MAX,
        );
        let img = loader.decode_bytes(&png).unwrap();
        assert_eq!((img.width, img.height), (5, 3));
    }

    #[test]
    fn test_plain_decoder_ignores_orientation() {
        let img = PlainDecoder.decode(&jpeg_with_orientation(16, 8, 6)).unwrap();
        assert_eq!((img.width, img.height), (16, 8));
    }

    #[test]
    fn test_load_data_url() {
        use base64::{engine::general_purpose, Engine as _};

        let url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(two_tone_png(3, 5))
        );
        let img = ImageLoader::default()
            .load(ImageSource::from_url(&url).unwrap())
            .unwrap();
        assert_eq!((img.width, img.height), (3, 5));
    }

    #[test]
    fn test_unsupported_format() {
        let result = ImageLoader::default().load(ImageSource::Bytes(b"GIF89a......".to_vec()));
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));

        let result = ImageLoader::default().load(ImageSource::Bytes(vec![0x00, 0x01, 0x02]));
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_empty_bytes() {
        let result = ImageLoader::default().load(ImageSource::Bytes(Vec::new()));
        assert!(result.is_err());
    }

    #[test]
    fn test_truncated_jpeg() {
        let jpeg = plain_jpeg(32, 32);
        let result = ImageLoader::default().load(ImageSource::Bytes(jpeg[..40].to_vec()));
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_data_url_at_exact_limit_loads() {
        use base64::{engine::general_purpose, Engine as _};

        let png = two_tone_png(4, 4);
        let encoded = general_purpose::STANDARD.encode(&png);
        // Wrapped the way MIME encoders emit base64
        let wrapped: Vec<&str> = encoded
            .as_bytes()
            .chunks(16)
            .map(|chunk| std::str::from_utf8(chunk).unwrap())
            .collect();
        let url = format!("data:image/png;base64,{}", wrapped.join("\n"));

        let loader = ImageLoader::new(png.len());
        let img = loader.load(ImageSource::DataUrl(url.clone())).unwrap();
        assert_eq!((img.width, img.height), (4, 4));

        let loader = ImageLoader::new(png.len() - 1);
        let result = loader.load(ImageSource::DataUrl(url));
        assert!(matches!(
            result,
            Err(DecodeError::TooLarge { size, .. }) if size == png.len()
        ));
    }

    #[test]
    fn test_size_limit() {
        let loader = ImageLoader::new(16);
        let result = loader.load(ImageSource::Bytes(two_tone_png(8, 8)));
        assert!(matches!(result, Err(DecodeError::TooLarge { limit: 16, .. })));
    }
}
