use crate::error::ImageProcessingError;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbaImage};
use tracing::debug;

pub const CONTRAST_FACTOR: f32 = 1.5;

/// Decode an uploaded image, drop its metadata, convert to grayscale and
/// boost contrast.
pub fn normalize_image(bytes: &[u8]) -> Result<DynamicImage, ImageProcessingError> {
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    debug!("Decoded {}x{} image ({:?})", width, height, decoded.color());

    let stripped = strip_metadata(&decoded)?;
    let gray = to_luma_rec601(&stripped);
    let enhanced = enhance_contrast(&gray, CONTRAST_FACTOR);

    Ok(DynamicImage::ImageLuma8(enhanced))
}

/// Rebuild the image from its raw pixels only, so nothing from the original
/// container (EXIF, GPS, ICC, timestamps) can travel further.
fn strip_metadata(image: &DynamicImage) -> Result<RgbaImage, ImageProcessingError> {
    let (width, height) = image.dimensions();
    let pixels = image.to_rgba8().into_raw();
    RgbaImage::from_raw(width, height, pixels)
        .ok_or(ImageProcessingError::Rebuild { width, height })
}

/// Grayscale with ITU-R 601-2 luma weights (299/587/114), in 16-bit fixed
/// point. `DynamicImage::to_luma8` uses Rec.709 weights instead.
fn to_luma_rec601(image: &RgbaImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        let luma =
            (u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000) >> 16;
        Luma([luma as u8])
    })
}

/// Blend each pixel away from the mean intensity by `factor`.
fn enhance_contrast(image: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return image.clone();
    }
    let sum: u64 = image.pixels().map(|p| u64::from(p.0[0])).sum();
    let mean = (sum as f32 / pixel_count as f32 + 0.5).floor();

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let value = mean + factor * (f32::from(pixel.0[0]) - mean);
        *pixel = Luma([value.clamp(0.0, 255.0) as u8]);
    }
    out
}
