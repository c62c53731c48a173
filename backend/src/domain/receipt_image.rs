//! Image preparation for the receipt scanning pipeline: downscale to a
//! bounded size, crop the reading region, re-encode as JPEG.

use anyhow::Result;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

/// Neither output dimension exceeds this bound
pub const MAX_DIMENSION: u32 = 1024;

/// Fixed JPEG re-encode quality, bounding the upload payload
pub const JPEG_QUALITY: u8 = 85;

/// Fixed reading region cropped from the center of the image
pub const CROP_WIDTH: u32 = 800;
pub const CROP_HEIGHT: u32 = 800;

/// Run a captured image through the full preparation sequence:
/// decode, downscale, center-crop, JPEG-encode.
pub fn prepare_receipt_image(bytes: &[u8]) -> Result<Vec<u8>> {
    let image = image::load_from_memory(bytes)?;
    let image = downscale(image, MAX_DIMENSION);
    let image = crop_center(image, CROP_WIDTH, CROP_HEIGHT);
    encode_jpeg(&image)
}

/// Scale the image down so neither dimension exceeds `bound`, preserving
/// aspect ratio. Images already within the bound pass through unchanged;
/// the scale factor is capped at 1.0.
fn downscale(image: DynamicImage, bound: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width <= bound && height <= bound {
        return image;
    }
    image.resize(bound, bound, FilterType::Lanczos3)
}

/// Crop a fixed-size region from the center, clamped to the image bounds
fn crop_center(image: DynamicImage, crop_width: u32, crop_height: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    let crop_width = crop_width.min(width);
    let crop_height = crop_height.min(height);
    let x = (width - crop_width) / 2;
    let y = (height - crop_height) / 2;
    image.crop_imm(x, y, crop_width, crop_height)
}

fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    image.write_with_encoder(encoder)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn solid_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([200, 200, 200])))
    }

    #[test]
    fn test_downscale_bounds_both_dimensions() {
        let scaled = downscale(solid_image(2048, 1024), MAX_DIMENSION);
        let (width, height) = scaled.dimensions();
        assert!(width <= MAX_DIMENSION);
        assert!(height <= MAX_DIMENSION);
    }

    #[test]
    fn test_downscale_preserves_aspect_ratio() {
        let scaled = downscale(solid_image(2048, 1024), MAX_DIMENSION);
        assert_eq!(scaled.dimensions(), (1024, 512));

        let scaled = downscale(solid_image(1500, 3000), MAX_DIMENSION);
        assert_eq!(scaled.dimensions(), (512, 1024));
    }

    #[test]
    fn test_downscale_never_upscales() {
        let original = solid_image(300, 200);
        let scaled = downscale(original, MAX_DIMENSION);
        assert_eq!(scaled.dimensions(), (300, 200));
    }

    #[test]
    fn test_crop_center_clamps_to_image_bounds() {
        let cropped = crop_center(solid_image(1000, 600), CROP_WIDTH, CROP_HEIGHT);
        assert_eq!(cropped.dimensions(), (800, 600));

        let cropped = crop_center(solid_image(400, 300), CROP_WIDTH, CROP_HEIGHT);
        assert_eq!(cropped.dimensions(), (400, 300));
    }

    #[test]
    fn test_prepare_receipt_image_end_to_end() {
        let mut png_bytes = Cursor::new(Vec::new());
        solid_image(2400, 1600)
            .write_to(&mut png_bytes, image::ImageFormat::Png)
            .unwrap();

        let jpeg = prepare_receipt_image(png_bytes.get_ref()).unwrap();
        let output = image::load_from_memory(&jpeg).unwrap();
        let (width, height) = output.dimensions();

        assert!(width <= CROP_WIDTH);
        assert!(height <= CROP_HEIGHT);
    }

    #[test]
    fn test_prepare_rejects_garbage_input() {
        assert!(prepare_receipt_image(b"not an image").is_err());
    }
}
