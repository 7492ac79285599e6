//! The avatar cropper component.
//!
//! [`AvatarCropper`] ties the pipeline together: it loads a source, keeps the
//! view transform and drag state, redraws its canvas synchronously after every
//! change, and exports the final frame on confirmation.
//!
//! Everything tied to one source lives in a single session. Opening a new
//! source, cancelling, or closing drops the session, which releases the
//! decoded pixels and the canvas buffer together.

use thiserror::Error;

use crate::config::{ConfigError, CropperConfig};
use crate::decode::{DecodeError, DecodedImage, ImageLoader, ImageSource};
use crate::encode::{EncodeError, EncodedImage, Exporter};
use crate::render::{render_frame, Canvas};
use crate::transform::{ScaleLimits, TransformState, ViewTransform};

/// Errors surfaced by the cropper.
#[derive(Debug, Error)]
pub enum CropError {
    /// Confirm was requested with nothing loaded.
    #[error("No image is loaded")]
    NotLoaded,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// How the cropping dialog ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CropOutcome {
    Confirmed(EncodedImage),
    Cancelled,
}

struct Session {
    source: DecodedImage,
    state: TransformState,
    canvas: Canvas,
}

impl Session {
    fn redraw(&mut self) {
        self.canvas.draw(Some(&self.source), self.state.transform());
    }
}

/// Interactive avatar cropper.
pub struct AvatarCropper {
    config: CropperConfig,
    loader: ImageLoader,
    exporter: Exporter,
    session: Option<Session>,
}

impl AvatarCropper {
    /// Create an empty cropper.
    pub fn new(config: CropperConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self {
            loader: ImageLoader::new(config.max_source_bytes),
            exporter: Exporter::new(config.correction_margin, config.jpeg_quality),
            config,
            session: None,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    /// Load a new source, replacing the current one.
    ///
    /// The previous session is released first. On failure the cropper is
    /// left empty and can be opened again.
    pub fn open(&mut self, source: ImageSource) -> Result<(), CropError> {
        self.close();
        let image = self.loader.load(source)?;
        self.open_decoded(image)
    }

    /// Start a session from already-decoded pixels.
    pub fn open_decoded(&mut self, image: DecodedImage) -> Result<(), CropError> {
        self.close();
        if image.is_empty() {
            return Err(DecodeError::Empty.into());
        }

        let limits = ScaleLimits::for_source(
            image.width,
            image.height,
            self.config.output_size,
            self.config.max_scale,
        );
        log::debug!(
            "Opened {}x{} source, scale range {:.4}..{:.4}",
            image.width,
            image.height,
            limits.min,
            limits.max
        );

        let mut session = Session {
            source: image,
            state: TransformState::new(limits, self.config.initial_margin),
            canvas: Canvas::new(self.config.preview_settings()),
        };
        session.redraw();
        self.session = Some(session);
        Ok(())
    }

    /// Release the current source and canvas, if any.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!(
                "Released {}x{} source and {} byte canvas",
                session.source.width,
                session.source.height,
                session.canvas.frame().byte_size()
            );
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Natural (orientation-corrected) size of the loaded source.
    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.session
            .as_ref()
            .map(|s| (s.source.width, s.source.height))
    }

    pub fn transform(&self) -> Option<ViewTransform> {
        self.session.as_ref().map(|s| *s.state.transform())
    }

    pub fn min_scale(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.state.limits().min)
    }

    pub fn max_scale(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.state.limits().max)
    }

    pub fn is_dragging(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.state.is_dragging())
    }

    /// The frame as last drawn.
    pub fn frame(&self) -> Option<&DecodedImage> {
        self.session.as_ref().map(|s| s.canvas.frame())
    }

    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if let Some(session) = self.session.as_mut() {
            session.state.begin_drag(x, y);
        }
    }

    pub fn update_drag(&mut self, x: f64, y: f64) {
        if let Some(session) = self.session.as_mut() {
            if session.state.update_drag(x, y) {
                session.redraw();
            }
        }
    }

    pub fn end_drag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.state.end_drag();
        }
    }

    /// Zoom slider input; clamped to the scale range.
    pub fn set_scale(&mut self, value: f64) {
        if let Some(session) = self.session.as_mut() {
            if session.state.set_scale(value) {
                session.redraw();
            }
        }
    }

    /// Rotate a quarter turn clockwise.
    pub fn rotate(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.state.rotate();
            session.redraw();
        }
    }

    /// Export the current frame as JPEG.
    ///
    /// Any gesture in progress is ended. If the scale had fallen below the
    /// coverage minimum it is corrected, and the session keeps the corrected
    /// scale. The session stays open, so confirming twice yields the same
    /// bytes.
    pub fn confirm(&mut self) -> Result<CropOutcome, CropError> {
        let session = self.session.as_mut().ok_or(CropError::NotLoaded)?;
        session.state.end_drag();

        let transform = *session.state.transform();
        let min_scale = session.state.limits().min;
        let settings = self.config.export_settings();
        let source = &session.source;

        let export = self.exporter.export(transform.scale, min_scale, |scale| {
            render_frame(source, &transform.with_scale(scale), &settings)
        })?;

        if let Some(scale) = export.corrected_scale {
            session.state.force_scale(scale);
            session.redraw();
        }

        Ok(CropOutcome::Confirmed(export.image))
    }

    /// Abort cropping and release the session.
    pub fn cancel(&mut self) -> CropOutcome {
        self.close();
        CropOutcome::Cancelled
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
