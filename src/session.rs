//! Single-image edit session
//!
//! Holds everything an interactive front end needs between user actions:
//! - **original**: the image as loaded, never modified
//! - **current**: what the user sees now (always the history cursor)
//! - **dominant**: the extractor's pick for this image
//! - **source**: an optional color picked by the user, which overrides `dominant`
//!
//! Recoloring always starts from the original, so applying again with new
//! parameters replaces the previous result instead of stacking on it.

use chrono::NaiveDate;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use crate::color::Color;
use crate::dominant::DominantColorExtractor;
use crate::error::{RecolorError, Result};
use crate::history::History;
use crate::output;
use crate::recolor::{self, RecolorParams};
use crate::store::ImageStore;

pub struct EditSession {
    path: PathBuf,
    original: Arc<RgbaImage>,
    dominant: Color,
    source: Option<Color>,
    history: History<RgbaImage>,
}

impl EditSession {
    /// Load `path` and start a fresh history from it
    pub fn open(
        path: &Path,
        store: &dyn ImageStore,
        extractor: &dyn DominantColorExtractor,
        history_limit: Option<usize>,
    ) -> Result<Self> {
        let img = store.load(path)?;
        let dominant = extractor.extract(path);
        Ok(Self::from_image(path, img, dominant, history_limit))
    }

    /// Start a session from an image that is already in memory
    pub fn from_image(
        path: &Path,
        img: RgbaImage,
        dominant: Color,
        history_limit: Option<usize>,
    ) -> Self {
        let original = Arc::new(img);
        let history = History::from_shared(Arc::clone(&original), history_limit);

        info!(
            path = %path.display(),
            width = original.width(),
            height = original.height(),
            dominant = %dominant,
            "Opened image"
        );

        Self {
            path: path.to_path_buf(),
            original,
            dominant,
            source: None,
            history,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn current(&self) -> &RgbaImage {
        self.history.current()
    }

    pub fn history(&self) -> &History<RgbaImage> {
        &self.history
    }

    pub fn dominant(&self) -> Color {
        self.dominant
    }

    pub fn source(&self) -> Option<Color> {
        self.source
    }

    /// Color the next `apply` matches against
    pub fn reference(&self) -> Color {
        self.source.unwrap_or(self.dominant)
    }

    pub fn set_source(&mut self, source: Option<Color>) {
        self.source = source;
    }

    /// Use the color at (x, y) of the current image as the source color
    pub fn pick_source(&mut self, x: u32, y: u32) -> Result<Color> {
        let current = self.current();
        let color = recolor::pick_color(current, x, y).ok_or_else(|| {
            RecolorError::InvalidParameter(format!(
                "({}, {}) is outside the {}x{} image",
                x,
                y,
                current.width(),
                current.height()
            ))
        })?;
        debug!(x, y, color = %color, "Picked source color");
        self.source = Some(color);
        Ok(color)
    }

    /// Recolor the original with `params` and record the result
    pub fn apply(&mut self, params: &RecolorParams) -> &RgbaImage {
        let recolored = recolor::apply_rgba(&self.original, self.reference(), params);
        self.history.push(recolored);
        self.current()
    }

    /// Go back to the unmodified image, as a new history entry
    pub fn reset_to_original(&mut self) {
        self.history.push_shared(Arc::clone(&self.original));
    }

    /// Returns whether anything changed
    pub fn undo(&mut self) -> bool {
        self.history.undo().is_some()
    }

    /// Returns whether anything changed
    pub fn redo(&mut self) -> bool {
        self.history.redo().is_some()
    }

    /// Write the current image to the dated output folder for `target`
    pub fn save(&self, store: &dyn ImageStore, target: Color, date: NaiveDate) -> Result<PathBuf> {
        let path = output::save_output(store, self.current(), &self.path, target, date)?;
        info!(path = %path.display(), "Saved edit");
        Ok(path)
    }
}
