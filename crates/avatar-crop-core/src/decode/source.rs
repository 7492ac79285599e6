//! Image references accepted by the loader.

use base64::{engine::general_purpose, Engine as _};

use super::DecodeError;

/// A reference to an image handed over by the photo picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Encoded file bytes (e.g. read from a `Blob`).
    Bytes(Vec<u8>),
    /// A `data:image/...;base64,...` URL.
    DataUrl(String),
}

impl ImageSource {
    /// Build a source from a URL-like string.
    ///
    /// Only `data:` URLs carry their payload inline; anything else has to be
    /// fetched by the caller and passed as [`ImageSource::Bytes`].
    pub fn from_url(url: &str) -> Result<Self, DecodeError> {
        if url.trim_start().starts_with("data:") {
            Ok(ImageSource::DataUrl(url.to_string()))
        } else {
            Err(DecodeError::UnsupportedReference(scheme_of(url)))
        }
    }

    /// Resolve the reference to encoded bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, DecodeError> {
        match self {
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::DataUrl(url) => parse_data_url(&url),
        }
    }

    /// Encoded size, computed without decoding.
    ///
    /// For data URLs this counts only the base64 payload after the comma,
    /// skipping whitespace and padding, which is exact for a valid payload.
    pub fn estimated_len(&self) -> usize {
        match self {
            ImageSource::Bytes(bytes) => bytes.len(),
            ImageSource::DataUrl(url) => {
                let payload = url.split_once(',').map_or("", |(_, payload)| payload);
                let digits = payload
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace() && *b != b'=')
                    .count();
                digits * 3 / 4
            }
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

fn scheme_of(url: &str) -> String {
    match url.split_once(':') {
        Some((scheme, _)) if !scheme.is_empty() => format!("{scheme}: URL"),
        _ => "relative reference".to_string(),
    }
}

fn parse_data_url(url: &str) -> Result<Vec<u8>, DecodeError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::MalformedDataUrl("missing data: prefix".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| DecodeError::MalformedDataUrl("missing payload separator".to_string()))?;

    let mime = header.split(';').next().unwrap_or_default();
    if !mime.is_empty() && !mime.starts_with("image/") {
        return Err(DecodeError::MalformedDataUrl(format!(
            "not an image media type: {mime}"
        )));
    }
    if !header.split(';').any(|param| param == "base64") {
        return Err(DecodeError::MalformedDataUrl(
            "payload is not base64-encoded".to_string(),
        ));
    }

    let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DecodeError::MalformedDataUrl(e.to_string()))
}
