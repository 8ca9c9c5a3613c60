//! Persistent settings
//!
//! Defaults mirror the controls of the desktop tool: red target, half
//! strength, 0.3 match sensitivity. Settings can be stored as JSON and any
//! field missing from the file falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use crate::batch::ReferencePolicy;
use crate::color::Color;
use crate::dominant::ColorThiefExtractor;
use crate::error::Result;
use crate::recolor::RecolorParams;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecolorSettings {
    /// Color matched pixels are blended toward (default: #FF0000)
    pub target: Color,
    /// Blend strength at an exact match (default: 0.5)
    pub intensity: f32,
    /// Match radius as a fraction of 255 (default: 0.3)
    pub sensitivity: f32,
    /// Explicit reference color; `None` uses each image's dominant color
    pub source: Option<Color>,
    /// Batch worker threads, 0 = one per core (default: 0)
    pub workers: usize,
    /// Maximum snapshots kept for undo, `None` = unbounded
    pub history_limit: Option<usize>,
    /// Dominant color sampling step, 1-10 (default: 1)
    pub extractor_quality: u8,
    /// Palette size used for dominant color extraction (default: 5)
    pub extractor_colors: u8,
}

impl Default for RecolorSettings {
    fn default() -> Self {
        Self {
            target: Color::new(255, 0, 0),
            intensity: 0.5,
            sensitivity: 0.3,
            source: None,
            workers: 0,
            history_limit: None,
            extractor_quality: 1,
            extractor_colors: 5,
        }
    }
}

impl RecolorSettings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn params(&self) -> Result<RecolorParams> {
        RecolorParams::new(self.target, self.intensity, self.sensitivity)
    }

    pub fn reference_policy(&self) -> ReferencePolicy {
        match self.source {
            Some(color) => ReferencePolicy::Explicit(color),
            None => ReferencePolicy::PerImageDominant,
        }
    }

    pub fn extractor(&self) -> ColorThiefExtractor {
        ColorThiefExtractor::new(self.extractor_quality, self.extractor_colors)
    }
}
