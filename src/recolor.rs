//! Recolor engine
//!
//! Blends every pixel that lies within `sensitivity * 255` (Euclidean RGB
//! distance) of a reference color toward a target color. The blend factor
//! falls off linearly from `intensity` at the reference color itself to zero
//! at the threshold, so near matches change strongly and borderline matches
//! barely move.
//!
//! Fully transparent pixels are never touched and alpha is always preserved.
//! Rows are independent, so they are processed in parallel with rayon.

use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::color::Color;
use crate::error::{RecolorError, Result};

// ============================================================================
// PARAMETERS
// ============================================================================

/// Validated parameter set shared by every image of an edit or batch run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct RecolorParams {
    /// Color matched pixels are blended toward
    target: Color,
    /// Blend strength at zero distance, 0.0..=1.0
    intensity: f32,
    /// Match radius as a fraction of 255, in (0.0, 1.0]
    sensitivity: f32,
}

#[derive(Deserialize)]
struct RawParams {
    target: Color,
    intensity: f32,
    sensitivity: f32,
}

impl TryFrom<RawParams> for RecolorParams {
    type Error = RecolorError;

    fn try_from(raw: RawParams) -> Result<Self> {
        RecolorParams::new(raw.target, raw.intensity, raw.sensitivity)
    }
}

impl RecolorParams {
    pub fn new(target: Color, intensity: f32, sensitivity: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&intensity) {
            return Err(RecolorError::InvalidParameter(format!(
                "intensity must be within 0..=1, got {}",
                intensity
            )));
        }
        if !(sensitivity > 0.0 && sensitivity <= 1.0) {
            return Err(RecolorError::InvalidParameter(format!(
                "sensitivity must be within (0, 1], got {}",
                sensitivity
            )));
        }
        Ok(Self { target, intensity, sensitivity })
    }

    pub fn target(&self) -> Color {
        self.target
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// RGB distance below which a pixel counts as a match
    pub fn threshold(&self) -> f32 {
        self.sensitivity * 255.0
    }

    /// Blend factor for a pixel at `distance` from the reference, `None` if it
    /// lies outside the match radius
    pub fn blend_factor(&self, distance: f32) -> Option<f32> {
        let threshold = self.threshold();
        if distance < threshold {
            Some((self.intensity * (1.0 - distance / threshold)).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

// ============================================================================
// PER-PIXEL BLEND
// ============================================================================

fn blend_channel(source: u8, target: u8, factor: f32) -> u8 {
    let mixed = source as f32 * (1.0 - factor) + target as f32 * factor;
    mixed.clamp(0.0, 255.0).round() as u8
}

/// Recolor one RGBA pixel in place. Returns whether it matched.
#[inline]
fn recolor_pixel(px: &mut [u8], reference: &Color, params: &RecolorParams) -> bool {
    if px[3] == 0 {
        return false;
    }

    let color = Color::new(px[0], px[1], px[2]);
    let Some(factor) = params.blend_factor(color.distance(reference)) else {
        return false;
    };

    let target = params.target.to_array();
    for (channel, t) in px[..3].iter_mut().zip(target) {
        *channel = blend_channel(*channel, t, factor);
    }
    true
}

fn is_match(px: &[u8], reference: &Color, params: &RecolorParams) -> bool {
    px[3] > 0
        && Color::new(px[0], px[1], px[2]).distance(reference) < params.threshold()
}

// ============================================================================
// IMAGE OPERATIONS
// ============================================================================

/// Recolor an RGBA image, returning a new buffer
pub fn apply_rgba(img: &RgbaImage, reference: Color, params: &RecolorParams) -> RgbaImage {
    let mut out = img.clone();
    let (width, height) = out.dimensions();
    if width == 0 || height == 0 {
        return out;
    }

    let row_len = width as usize * 4;
    let buf: &mut [u8] = &mut out;
    let matched: usize = buf
        .par_chunks_mut(row_len)
        .map(|row| {
            row.chunks_exact_mut(4)
                .map(|px| recolor_pixel(px, &reference, params) as usize)
                .sum::<usize>()
        })
        .sum();

    debug!(
        width,
        height,
        matched,
        reference = %reference,
        target = %params.target,
        "Recolored image"
    );
    out
}

/// Recolor any decoded image. Layouts other than 8-bit RGBA come back unchanged.
pub fn apply(img: &DynamicImage, reference: Color, params: &RecolorParams) -> DynamicImage {
    match img {
        DynamicImage::ImageRgba8(rgba) => {
            DynamicImage::ImageRgba8(apply_rgba(rgba, reference, params))
        }
        other => {
            debug!(color = ?other.color(), "Non-RGBA layout, passing image through");
            other.clone()
        }
    }
}

/// Number of pixels `apply_rgba` would recolor
pub fn count_matches(img: &RgbaImage, reference: Color, params: &RecolorParams) -> usize {
    img.as_raw()
        .par_chunks_exact(4)
        .filter(|px| is_match(px, &reference, params))
        .count()
}

/// Color of the pixel at (x, y), `None` outside the image
pub fn pick_color(img: &RgbaImage, x: u32, y: u32) -> Option<Color> {
    img.get_pixel_checked(x, y).map(Color::from_pixel)
}

// ============================================================================
// TESTS
// ============================================================================
