//! Color-targeted recoloring for raster images
//!
//! Pixels close to a reference color are blended toward a target color,
//! with strength falling off linearly with RGB distance. The crate covers
//! the single-image edit flow (pick, apply, undo/redo, save) and parallel
//! batch runs that write into a dated output folder.

pub mod batch;
pub mod color;
pub mod config;
pub mod dominant;
pub mod error;
pub mod history;
pub mod logging;
pub mod output;
pub mod presets;
pub mod recolor;
pub mod session;
pub mod store;

pub use batch::{BatchFailure, BatchJob, BatchProcessor, BatchResult, CancelToken, ReferencePolicy};
pub use color::Color;
pub use config::RecolorSettings;
pub use dominant::{ColorThiefExtractor, DominantColorExtractor};
pub use error::{ErrorKind, RecolorError, Result};
pub use history::History;
pub use recolor::RecolorParams;
pub use session::EditSession;
pub use store::{FsImageStore, ImageStore};
