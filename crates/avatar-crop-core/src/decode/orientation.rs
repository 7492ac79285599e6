//! EXIF orientation lookup and correction.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;

use super::{DecodeError, Orientation};

/// Read the EXIF orientation tag from an encoded image.
///
/// A container without EXIF data (or without the orientation tag) is
/// `Orientation::Normal`. Malformed EXIF data is an error so the caller can
/// fall back to a decode that ignores metadata.
pub fn read_orientation(bytes: &[u8]) -> Result<Orientation, DecodeError> {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => Ok(exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default()),
        Err(exif::Error::NotFound(_)) => Ok(Orientation::Normal),
        Err(e) => Err(DecodeError::ExifError(e.to_string())),
    }
}

/// Transform stored pixels so they display upright.
pub(crate) fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
