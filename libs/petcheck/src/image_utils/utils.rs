use anyhow::Result;
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Lowercased extension of an uploaded file name, if it has one.
pub fn file_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(ext.to_lowercase())
}

pub fn allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Decode raw upload bytes, guessing the format from the magic bytes.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        anyhow::bail!("Image data is empty");
    }
    image::load_from_memory(bytes)
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))
}

pub fn load_image_from_path(path: &Path) -> Result<DynamicImage> {
    image::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to load image from {}: {}", path.display(), e))
}

/// Factor that brings the longer side of a `width`x`height` image down to
/// `max_side`. 1.0 when it already fits or `max_side` is 0.
pub fn fit_factor(width: u32, height: u32, max_side: u32) -> f32 {
    let longer = width.max(height);
    if max_side == 0 || longer <= max_side {
        return 1.0;
    }
    max_side as f32 / longer as f32
}

pub fn scale_by(image: &DynamicImage, factor: f32) -> DynamicImage {
    if factor >= 1.0 {
        return image.clone();
    }
    let width = ((image.width() as f32 * factor).round() as u32).max(1);
    let height = ((image.height() as f32 * factor).round() as u32).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("license.PNG"));
        assert!(allowed_file("pet.photo.jpeg"));
        assert!(allowed_file("a.jpg"));
        assert!(!allowed_file("scan.gif"));
        assert!(!allowed_file("jpg"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_decode_image_bytes() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(8, 4));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let decoded = decode_image_bytes(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));

        assert!(decode_image_bytes(b"not an image").is_err());
        assert!(decode_image_bytes(&[]).is_err());
    }

    #[test]
    fn test_fit_factor() {
        assert!((fit_factor(400, 200, 100) - 0.25).abs() < f32::EPSILON);
        assert_eq!(fit_factor(400, 200, 1024), 1.0);
        assert_eq!(fit_factor(4000, 200, 0), 1.0);
    }

    #[test]
    fn test_scale_by() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(400, 200));
        let scaled = scale_by(&img, 0.25);
        assert_eq!((scaled.width(), scaled.height()), (100, 50));

        let same = scale_by(&img, 1.0);
        assert_eq!((same.width(), same.height()), (400, 200));
    }
}
