//! Output naming
//!
//! Recolored files go into a sibling folder of the source named after the
//! target color and the day of the export:
//!
//! ```text
//! photos/cat.jpg  --(#1A2B3C, 2024-03-05)-->  photos/1A2B3C - 2024-03-05/cat_colored.png
//! ```
//!
//! Output is always PNG. Repeated exports on the same day with the same color
//! land in the same folder.

use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use crate::color::Color;
use crate::error::Result;
use crate::store::ImageStore;

pub const OUTPUT_SUFFIX: &str = "_colored";

/// Current local date, used when the caller doesn't pin one
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// `"<HEX> - <YYYY-MM-DD>"`
pub fn folder_name(target: Color, date: NaiveDate) -> String {
    format!("{} - {}", target.hex_code(), date.format("%Y-%m-%d"))
}

pub fn output_dir(source: &Path, target: Color, date: NaiveDate) -> PathBuf {
    source
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(folder_name(target, date))
}

pub fn output_path(source: &Path, target: Color, date: NaiveDate) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    output_dir(source, target, date).join(format!("{}{}.png", stem, OUTPUT_SUFFIX))
}

/// Write `img` to the output location derived from `source`; returns the path
pub fn save_output(
    store: &dyn ImageStore,
    img: &RgbaImage,
    source: &Path,
    target: Color,
    date: NaiveDate,
) -> Result<PathBuf> {
    let path = output_path(source, target, date);
    store.save(img, &path, ImageFormat::Png)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(folder_name(Color::new(0x1A, 0x2B, 0x3C), date()), "1A2B3C - 2024-03-05");
        assert_eq!(folder_name(Color::new(0, 0, 0), date()), "000000 - 2024-03-05");
    }

    #[test]
    fn test_output_path() {
        let source = Path::new("photos").join("cat.jpg");
        let path = output_path(&source, Color::new(255, 0, 0), date());
        assert_eq!(
            path,
            Path::new("photos").join("FF0000 - 2024-03-05").join("cat_colored.png")
        );
    }

    #[test]
    fn test_output_path_keeps_inner_dots() {
        let path = output_path(Path::new("a/archive.v2.png"), Color::new(1, 2, 3), date());
        assert_eq!(path.file_name().unwrap(), "archive.v2_colored.png");
    }

    #[test]
    fn test_bare_filename_uses_relative_folder() {
        let path = output_path(Path::new("cat.png"), Color::new(1, 2, 3), date());
        assert_eq!(path, Path::new("010203 - 2024-03-05").join("cat_colored.png"));
    }
}
