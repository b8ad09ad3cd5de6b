use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::domain::errors::DomainError;
use crate::domain::ports::ImageProcessor;

/// Square JPEG thumbnails: centre crop, then resize.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegThumbnailer;

impl ImageProcessor for JpegThumbnailer {
    fn square_jpeg(&self, bytes: &[u8], size: u32) -> Result<Vec<u8>, DomainError> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| DomainError::InvalidInput(format!("unreadable image: {e}")))?;

        let (width, height) = img.dimensions();
        let side = width.min(height);
        let square = img.crop_imm((width - side) / 2, (height - side) / 2, side, side);
        let resized = square.resize_exact(size, size, FilterType::Lanczos3);

        // JPEG has no alpha channel.
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
        let mut out = Cursor::new(Vec::new());
        rgb.write_to(&mut out, ImageFormat::Jpeg)
            .map_err(|e| DomainError::Internal(format!("jpeg encoding failed: {e}")))?;
        Ok(out.into_inner())
    }
}
