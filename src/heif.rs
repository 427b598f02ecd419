use std::path::Path;

use image::{DynamicImage, RgbImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

use crate::error::AppError;

/// Decode an HEIC/HEIF container the primary decoder rejects. The image is
/// rebuilt from the decoded interleaved RGB plane using its reported
/// dimensions and row stride; the stride padding must not leak into the
/// pixel buffer.
pub fn decode(path: &Path) -> Result<DynamicImage, AppError> {
    let lib_heif = LibHeif::new();
    let context = HeifContext::read_from_file(&path.to_string_lossy())?;
    let handle = context.primary_image_handle()?;
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)?;

    let planes = decoded.planes();
    let plane = planes
        .interleaved
        .ok_or_else(|| AppError::Generic("decoded HEIF image has no interleaved plane".into()))?;

    let width = plane.width;
    let height = plane.height;
    let row_bytes = width as usize * 3;

    let mut buf = Vec::with_capacity(row_bytes * height as usize);
    for row in plane.data.chunks(plane.stride).take(height as usize) {
        buf.extend_from_slice(&row[..row_bytes]);
    }

    let rgb = RgbImage::from_raw(width, height, buf).ok_or_else(|| {
        AppError::Generic("HEIF plane dimensions do not match its pixel buffer".into())
    })?;
    Ok(DynamicImage::ImageRgb8(rgb))
}
