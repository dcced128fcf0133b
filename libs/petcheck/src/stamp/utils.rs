use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;
use imageproc::integral_image::{integral_image, integral_squared_image, sum_image_pixels};
use imageproc::template_matching::{match_template, MatchTemplateMethod};
use std::borrow::Cow;
use std::path::Path;

use super::types::StampConfig;
use crate::image_utils::{fit_factor, load_image_from_path, scale_by};

pub fn edge_map(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    canny(gray, low, high)
}

/// `n * sum(x^2) - sum(x)^2`, i.e. `n^2` times the variance of the samples.
fn centered_energy(n: u64, sum: u64, squares: u64) -> u128 {
    (n as u128 * squares as u128).saturating_sub(sum as u128 * sum as u128)
}

/// Highest normalized correlation coefficient of `template` over `document`.
///
/// Template and window are both mean-subtracted before correlating, so a
/// score lies in [-1, 1] and textured paper with no stamp stays near zero.
/// Windows or templates without variance score zero, and so does a template
/// larger than the document.
pub fn best_match_score(document: &GrayImage, template: &GrayImage) -> f32 {
    let (width, height) = template.dimensions();
    if width == 0 || height == 0 || width > document.width() || height > document.height() {
        log::warn!(
            "Stamp template {}x{} does not fit in document {}x{}",
            width,
            height,
            document.width(),
            document.height()
        );
        return 0.0;
    }

    let n = width as u64 * height as u64;
    let template_sum: u64 = template.pixels().map(|p| p[0] as u64).sum();
    let template_squares: u64 = template.pixels().map(|p| (p[0] as u64).pow(2)).sum();
    let template_energy = centered_energy(n, template_sum, template_squares);
    if template_energy == 0 {
        return 0.0;
    }

    let correlation = match_template(document, template, MatchTemplateMethod::CrossCorrelation);
    let sums = integral_image::<_, u64>(document);
    let squares = integral_squared_image::<_, u64>(document);

    let mut best = 0.0f32;
    for (x, y, cross) in correlation.enumerate_pixels() {
        let (right, bottom) = (x + width - 1, y + height - 1);
        let window_sum = sum_image_pixels(&sums, x, y, right, bottom)[0];
        let window_squares = sum_image_pixels(&squares, x, y, right, bottom)[0];
        let window_energy = centered_energy(n, window_sum, window_squares);
        if window_energy == 0 {
            continue;
        }

        let numerator = n as f64 * cross[0] as f64 - template_sum as f64 * window_sum as f64;
        let score = numerator / (template_energy as f64 * window_energy as f64).sqrt();
        if score.is_finite() {
            best = best.max(score.min(1.0) as f32);
        }
    }
    best
}

/// Reference stamp held in memory for the process lifetime, with its edge
/// map computed once at load.
pub struct StampDetector {
    reference: GrayImage,
    reference_edges: GrayImage,
    config: StampConfig,
}

impl StampDetector {
    pub fn new(reference: &DynamicImage, config: StampConfig) -> Self {
        let reference = reference.to_luma8();
        let reference_edges = edge_map(&reference, config.canny_low, config.canny_high);

        if reference_edges.pixels().all(|p| p[0] == 0) {
            log::warn!("Reference stamp has no edges, every document will fail the stamp check");
        }

        let factor = fit_factor(reference.width(), reference.height(), config.max_stamp_side);
        if factor < 1.0 {
            log::info!(
                "Reference stamp {}x{} is matched at scale {:.3}, documents are scaled to match",
                reference.width(),
                reference.height(),
                factor
            );
        }

        Self {
            reference,
            reference_edges,
            config,
        }
    }

    pub fn from_path(path: &Path, config: StampConfig) -> Result<Self> {
        let reference = load_image_from_path(path)?;
        log::info!(
            "Loaded reference stamp {} ({}x{})",
            path.display(),
            reference.width(),
            reference.height()
        );
        Ok(Self::new(&reference, config))
    }

    /// Scale shared by document and reference so that neither exceeds its
    /// configured side limit.
    fn match_factor(&self, document: &DynamicImage) -> f32 {
        let document_factor = fit_factor(document.width(), document.height(), self.config.max_match_side);
        let stamp_factor = fit_factor(self.reference.width(), self.reference.height(), self.config.max_stamp_side);
        document_factor.min(stamp_factor)
    }

    pub fn score(&self, document: &DynamicImage) -> f32 {
        let factor = self.match_factor(document);
        let document = scale_by(document, factor);

        let template_edges = if factor < 1.0 {
            let width = ((self.reference.width() as f32 * factor).round() as u32).max(1);
            let height = ((self.reference.height() as f32 * factor).round() as u32).max(1);
            let scaled = imageops::resize(&self.reference, width, height, FilterType::Triangle);
            log::debug!(
                "Matching at scale {:.3}, document {}x{}, stamp {}x{}",
                factor,
                document.width(),
                document.height(),
                width,
                height
            );
            Cow::Owned(edge_map(&scaled, self.config.canny_low, self.config.canny_high))
        } else {
            Cow::Borrowed(&self.reference_edges)
        };

        let document_edges = edge_map(&document.to_luma8(), self.config.canny_low, self.config.canny_high);
        best_match_score(&document_edges, &template_edges)
    }

    pub fn is_present(&self, document: &DynamicImage) -> bool {
        let score = self.score(document);
        log::info!("Template match score: {:.3}", score);

        if score > self.config.threshold {
            log::info!("Stamp detected in image");
            true
        } else {
            log::info!("Stamp not detected (threshold {:.3})", self.config.threshold);
            false
        }
    }
}
