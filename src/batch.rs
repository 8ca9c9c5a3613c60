//! Batch recoloring
//!
//! Applies one parameter set to many images. Every image is independent:
//! a file that fails to load or save is recorded in the result and the
//! rest of the batch carries on. Images are spread over a rayon pool.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::color::Color;
use crate::dominant::DominantColorExtractor;
use crate::error::{ErrorKind, RecolorError, Result};
use crate::output;
use crate::recolor::{self, RecolorParams};
use crate::store::ImageStore;

// ============================================================================
// JOB DESCRIPTION
// ============================================================================

/// Where each image's reference color comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// One picked color reused for every image
    Explicit(Color),
    /// Each image's own dominant color
    PerImageDominant,
}

#[derive(Debug, Clone)]
pub struct BatchJob {
    pub images: Vec<PathBuf>,
    pub params: RecolorParams,
    pub reference: ReferencePolicy,
    /// Date stamped into the output folder name
    pub date: NaiveDate,
}

impl BatchJob {
    pub fn new(images: Vec<PathBuf>, params: RecolorParams, reference: ReferencePolicy) -> Self {
        Self {
            images,
            params,
            reference,
            date: output::today(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub succeeded: usize,
    pub failed: usize,
    /// Images never started because the run was cancelled
    pub skipped: usize,
    /// Output files written, in input order
    pub saved: Vec<PathBuf>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

enum Outcome {
    Saved(PathBuf),
    Failed(BatchFailure),
    Skipped,
}

/// Cooperative cancellation flag shared between a batch run and its caller
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// PROCESSOR
// ============================================================================

pub struct BatchProcessor<'a> {
    store: &'a dyn ImageStore,
    extractor: &'a dyn DominantColorExtractor,
    /// Worker threads; 0 uses rayon's global pool
    workers: usize,
    cancel: Option<CancelToken>,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(store: &'a dyn ImageStore, extractor: &'a dyn DominantColorExtractor) -> Self {
        Self {
            store,
            extractor,
            workers: 0,
            cancel: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn run(&self, job: &BatchJob) -> Result<BatchResult> {
        if job.images.is_empty() {
            return Err(RecolorError::EmptyBatch);
        }

        info!(
            images = job.images.len(),
            target = %job.params.target(),
            intensity = job.params.intensity(),
            sensitivity = job.params.sensitivity(),
            reference = ?job.reference,
            "Starting batch"
        );

        let outcomes = self.in_pool(|| {
            job.images
                .par_iter()
                .map(|path| self.process_one(path, job))
                .collect::<Vec<_>>()
        })?;

        let mut result = BatchResult::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Saved(path) => {
                    result.succeeded += 1;
                    result.saved.push(path);
                }
                Outcome::Failed(failure) => {
                    result.failed += 1;
                    result.failures.push(failure);
                }
                Outcome::Skipped => result.skipped += 1,
            }
        }

        info!(
            succeeded = result.succeeded,
            failed = result.failed,
            skipped = result.skipped,
            "Batch finished"
        );
        Ok(result)
    }

    fn in_pool<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        if self.workers == 0 {
            return Ok(op());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| RecolorError::InvalidParameter(format!("worker pool: {}", e)))?;
        Ok(pool.install(op))
    }

    fn process_one(&self, path: &Path, job: &BatchJob) -> Outcome {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            debug!(path = %path.display(), "Cancelled, skipping");
            return Outcome::Skipped;
        }

        let img = match self.store.load(path) {
            Ok(img) => img,
            Err(e) => return failure(path, ErrorKind::ImageLoadError, &e),
        };

        let reference = match job.reference {
            ReferencePolicy::Explicit(color) => color,
            ReferencePolicy::PerImageDominant => self.extractor.extract(path),
        };

        let recolored = recolor::apply_rgba(&img, reference, &job.params);

        match output::save_output(self.store, &recolored, path, job.params.target(), job.date) {
            Ok(saved) => {
                debug!(source = %path.display(), output = %saved.display(), reference = %reference, "Saved");
                Outcome::Saved(saved)
            }
            Err(e) => failure(path, ErrorKind::ImageSaveError, &e),
        }
    }
}

fn failure(path: &Path, kind: ErrorKind, error: &RecolorError) -> Outcome {
    warn!(path = %path.display(), ?kind, error = %error, "Image failed");
    Outcome::Failed(BatchFailure {
        path: path.to_path_buf(),
        kind,
        message: error.to_string(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
