//! Thumbnail normalization: any raster image in, a 720×720 JPEG out.
//!
//! The largest square that fits the source is cut around the most salient
//! region rather than the geometric centre, then scaled to the output size.

pub mod saliency;

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, RgbImage};
use tracing::debug;

use crate::errors::PipelineError;

/// Edge length of the square thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 720;
pub const JPEG_QUALITY: u8 = 82;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// A JPEG-encoded, exactly square thumbnail.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub jpeg_bytes: Vec<u8>,
}

impl NormalizedImage {
    pub fn data_url(&self) -> String {
        format!("{DATA_URL_PREFIX}{}", STANDARD.encode(&self.jpeg_bytes))
    }
}

/// Decodes, cover-crops and re-encodes the photo. CPU-bound; see [`normalize_photo`].
pub fn normalize(bytes: &[u8]) -> Result<NormalizedImage, PipelineError> {
    let img = image::load_from_memory(bytes).map_err(|e| {
        debug!("Photo decode failed: {e}");
        PipelineError::UnsupportedOrCorruptImage
    })?;

    let square = cover_crop(&img, THUMBNAIL_SIZE);
    let jpeg_bytes = encode_jpeg(&square, JPEG_QUALITY)?;

    debug!(
        source_width = img.width(),
        source_height = img.height(),
        jpeg_bytes = jpeg_bytes.len(),
        "Thumbnail normalized"
    );
    Ok(NormalizedImage { jpeg_bytes })
}

/// Runs [`normalize`] on the blocking pool so codec work stays off the async workers.
pub async fn normalize_photo(bytes: Bytes) -> Result<NormalizedImage, PipelineError> {
    tokio::task::spawn_blocking(move || normalize(&bytes))
        .await
        .map_err(|e| PipelineError::Unexpected(anyhow::anyhow!("image worker failed: {e}")))?
}

/// Picks the most salient square at source resolution, then scales only that
/// square to `size`. Work stays bounded by the source and output sizes.
fn cover_crop(img: &DynamicImage, size: u32) -> RgbImage {
    let source = img.to_rgb8();
    let (width, height) = source.dimensions();
    let side = width.min(height).max(1);

    let (x, y) = saliency::crop_origin(&source, side, side);
    let square = imageops::crop_imm(&source, x, y, side, side).to_image();

    imageops::resize(&square, size, size, FilterType::Lanczos3)
}

fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, PipelineError> {
    let mut out = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
    encoder
        .encode(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .map_err(|e| PipelineError::Unexpected(anyhow::anyhow!("JPEG encoding failed: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgb, RgbImage};

    fn encode_fixture(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn assert_square_jpeg(image: &NormalizedImage) {
        assert_eq!(
            image::guess_format(&image.jpeg_bytes).unwrap(),
            ImageFormat::Jpeg
        );
        let decoded = image::load_from_memory(&image.jpeg_bytes).unwrap();
        assert_eq!(decoded.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
    }

    #[test]
    fn test_landscape_jpeg_becomes_square() {
        let out = normalize(&encode_fixture(2000, 1000, ImageFormat::Jpeg)).unwrap();
        assert_square_jpeg(&out);
    }

    #[test]
    fn test_portrait_png_becomes_square_jpeg() {
        let out = normalize(&encode_fixture(300, 900, ImageFormat::Png)).unwrap();
        assert_square_jpeg(&out);
    }

    #[test]
    fn test_small_image_is_upscaled() {
        let out = normalize(&encode_fixture(64, 48, ImageFormat::Png)).unwrap();
        assert_square_jpeg(&out);
    }

    #[test]
    fn test_extreme_aspect_ratios_become_square() {
        for (w, h) in [(2, 4000), (4000, 2), (4, 1500)] {
            let out = normalize(&encode_fixture(w, h, ImageFormat::Png)).unwrap();
            assert_square_jpeg(&out);
        }
    }

    #[test]
    fn test_crop_window_is_taken_at_source_resolution() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 900, Rgb([40, 80, 120])));
        let square = cover_crop(&img, THUMBNAIL_SIZE);
        assert_eq!(square.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));
        let centre = square.get_pixel(360, 360);
        for (got, want) in centre.0.iter().zip([40u8, 80, 120]) {
            assert!(got.abs_diff(want) <= 1, "{centre:?}");
        }
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        let err = normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedOrCorruptImage));
    }

    #[test]
    fn test_truncated_image_is_rejected() {
        let png = encode_fixture(200, 200, ImageFormat::Png);
        let err = normalize(&png[..png.len() / 3]).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedOrCorruptImage));
    }

    #[test]
    fn test_output_is_deterministic() {
        let src = encode_fixture(500, 320, ImageFormat::Png);
        assert_eq!(normalize(&src).unwrap().jpeg_bytes, normalize(&src).unwrap().jpeg_bytes);
    }

    #[test]
    fn test_data_url_prefix() {
        let image = NormalizedImage {
            jpeg_bytes: vec![0xFF, 0xD8, 0xFF],
        };
        assert_eq!(image.data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[tokio::test]
    async fn test_normalize_photo_runs_off_thread() {
        let src = Bytes::from(encode_fixture(800, 600, ImageFormat::Png));
        let out = normalize_photo(src).await.unwrap();
        assert_square_jpeg(&out);
    }
}
