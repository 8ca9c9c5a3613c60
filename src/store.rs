//! Image store
//!
//! Decoding and encoding of raster files lives behind the `ImageStore` trait
//! so the batch processor and edit sessions can run against the filesystem
//! or against a test double.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;
use tracing::debug;
use crate::error::{RecolorError, Result};

pub trait ImageStore: Send + Sync {
    /// Decode the file at `path` into 8-bit RGBA
    fn load(&self, path: &Path) -> Result<RgbaImage>;

    /// Encode `img` to `path`, creating parent directories as needed
    fn save(&self, img: &RgbaImage, path: &Path, format: ImageFormat) -> Result<()>;
}

/// `ImageStore` backed by the local filesystem and the `image` codecs
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageStore;

impl ImageStore for FsImageStore {
    fn load(&self, path: &Path) -> Result<RgbaImage> {
        let img = image::open(path).map_err(|e| RecolorError::load(path, e))?;
        debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded image");
        Ok(img.to_rgba8())
    }

    fn save(&self, img: &RgbaImage, path: &Path, format: ImageFormat) -> Result<()> {
        // Ensure output directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| RecolorError::save(path, image::ImageError::IoError(e)))?;
        }

        let written = if supports_alpha(format) {
            img.save_with_format(path, format)
        } else {
            DynamicImage::ImageRgba8(img.clone())
                .to_rgb8()
                .save_with_format(path, format)
        };
        written.map_err(|e| RecolorError::save(path, e))?;

        debug!(path = %path.display(), ?format, "Saved image");
        Ok(())
    }
}

fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm | ImageFormat::Farbfeld | ImageFormat::Hdr)
}
