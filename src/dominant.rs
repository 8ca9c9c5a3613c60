//! Dominant color extraction
//!
//! The engine only needs one representative color per image; how it is found
//! is somebody else's business. `ColorThiefExtractor` delegates to the
//! `color-thief` crate (modified median cut quantization) and takes the most
//! prominent palette entry. Extraction never fails: anything that goes wrong
//! yields neutral gray.

use image::RgbaImage;
use std::path::Path;
use tracing::{debug, warn};
use crate::color::Color;

pub trait DominantColorExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Color;
}

impl<F> DominantColorExtractor for F
where
    F: Fn(&Path) -> Color + Send + Sync,
{
    fn extract(&self, path: &Path) -> Color {
        self(path)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ColorThiefExtractor {
    /// Sampling step, 1 (every pixel) to 10
    pub quality: u8,
    /// Palette size requested from the quantizer, at least 2
    pub max_colors: u8,
}

impl Default for ColorThiefExtractor {
    fn default() -> Self {
        Self {
            quality: 1,
            max_colors: 5,
        }
    }
}

impl ColorThiefExtractor {
    pub fn new(quality: u8, max_colors: u8) -> Self {
        // color-thief asserts on out-of-range arguments
        Self {
            quality: quality.clamp(1, 10),
            max_colors: max_colors.max(2),
        }
    }

    /// Most prominent color of an already decoded image
    pub fn extract_from_image(&self, img: &RgbaImage) -> Option<Color> {
        let quality = self.quality.clamp(1, 10);
        if !has_usable_pixels(img, quality) {
            return None;
        }
        let palette = color_thief::get_palette(
            img.as_raw(),
            color_thief::ColorFormat::Rgba,
            quality,
            self.max_colors.max(2),
        )
        .ok()?;
        palette.first().map(|c| Color::new(c.r, c.g, c.b))
    }
}

/// Whether the quantizer would keep any sampled pixel: it ignores pixels
/// that are mostly transparent or near white, and answers white if none remain
fn has_usable_pixels(img: &RgbaImage, quality: u8) -> bool {
    img.as_raw()
        .chunks_exact(4)
        .step_by(usize::from(quality))
        .any(|px| px[3] >= 125 && !(px[0] > 250 && px[1] > 250 && px[2] > 250))
}

impl DominantColorExtractor for ColorThiefExtractor {
    fn extract(&self, path: &Path) -> Color {
        let img = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dominant color unavailable, using gray");
                return Color::NEUTRAL_GRAY;
            }
        };

        match self.extract_from_image(&img) {
            Some(color) => {
                debug!(path = %path.display(), color = %color, "Extracted dominant color");
                color
            }
            None => {
                warn!(path = %path.display(), "Quantizer found no palette, using gray");
                Color::NEUTRAL_GRAY
            }
        }
    }
}
