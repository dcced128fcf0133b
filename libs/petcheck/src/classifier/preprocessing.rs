//! Image preprocessing for the skin condition network
//!
//! Matches the transform the network was trained with: resize the shorter
//! side to 256, center-crop 224x224, scale to [0,1] and normalize with the
//! ImageNet statistics.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

pub const RESIZE_SHORTER_SIDE: u32 = 256;

pub const CROP_SIZE: u32 = 224;

/// Mean values for normalization (ImageNet)
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Std values for normalization (ImageNet)
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Square region of the source, `(left, top, side)`, that ends up as the
/// center crop once the shorter side is resized to `RESIZE_SHORTER_SIDE`.
///
/// Cropping first keeps the resize bounded by the crop size, whatever the
/// aspect ratio of the upload.
fn center_crop_region(width: u32, height: u32) -> (u32, u32, u32) {
    let shorter = width.min(height).max(1) as u64;
    let side = (shorter * CROP_SIZE as u64 + RESIZE_SHORTER_SIDE as u64 / 2) / RESIZE_SHORTER_SIDE as u64;
    let side = side.max(1) as u32;
    let left = width.saturating_sub(side) / 2;
    let top = height.saturating_sub(side) / 2;
    (left, top, side)
}

/// NCHW tensor `[1, 3, 224, 224]` ready for the network.
pub fn preprocess(image: &DynamicImage) -> Array4<f32> {
    let (left, top, side) = center_crop_region(image.width(), image.height());
    let rgb = image
        .crop_imm(left, top, side, side)
        .resize_exact(CROP_SIZE, CROP_SIZE, FilterType::Triangle)
        .to_rgb8();

    let size = CROP_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            let normalized = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            tensor[[0, c, y as usize, x as usize]] = normalized;
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_output_shape() {
        let wide = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
        assert_eq!(preprocess(&wide).shape(), &[1, 3, 224, 224]);

        let tall = DynamicImage::ImageRgb8(RgbImage::new(100, 300));
        assert_eq!(preprocess(&tall).shape(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_crop_region_matches_resize_then_crop() {
        // 512x1024 resizes to 256x512, whose center crop starts at (16, 144)
        assert_eq!(center_crop_region(512, 1024), (32, 288, 448));
        assert_eq!(center_crop_region(256, 256), (16, 16, 224));
        assert_eq!(center_crop_region(1, 20_000), (0, 9_999, 1));
    }

    #[test]
    fn test_extreme_aspect_ratio() {
        let sliver = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 20_000, Rgb([255, 0, 0])));
        let tensor = preprocess(&sliver);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);
        let red = (1.0 - MEAN[0]) / STD[0];
        assert!((tensor[[0, 0, 112, 112]] - red).abs() < 1e-4);
    }

    #[test]
    fn test_crop_keeps_center() {
        let mut tall = RgbImage::from_pixel(100, 1000, Rgb([0, 0, 255]));
        for y in 400..600 {
            for x in 0..100 {
                tall.put_pixel(x, y, Rgb([255, 0, 0]));
            }
        }
        let tensor = preprocess(&DynamicImage::ImageRgb8(tall));
        let red = (1.0 - MEAN[0]) / STD[0];
        for y in [0, 112, 223] {
            assert!((tensor[[0, 0, y, 112]] - red).abs() < 1e-4);
        }
    }

    #[test]
    fn test_normalization() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([255, 255, 255])));
        let tensor = preprocess(&white);
        for c in 0..3 {
            let expected = (1.0 - MEAN[c]) / STD[c];
            assert!((tensor[[0, c, 100, 100]] - expected).abs() < 1e-4);
        }
    }
}
