use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecolorError {
    #[error("Invalid color format: {0:?}")]
    InvalidColorFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to load {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Batch job contains no images")]
    EmptyBatch,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RecolorError>;

/// Coarse error category, stable across releases and safe to put in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidColorFormat,
    InvalidParameter,
    ImageLoadError,
    ImageSaveError,
    EmptyBatch,
    Io,
    Json,
}

impl RecolorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecolorError::InvalidColorFormat(_) => ErrorKind::InvalidColorFormat,
            RecolorError::InvalidParameter(_) => ErrorKind::InvalidParameter,
            RecolorError::ImageLoad { .. } => ErrorKind::ImageLoadError,
            RecolorError::ImageSave { .. } => ErrorKind::ImageSaveError,
            RecolorError::EmptyBatch => ErrorKind::EmptyBatch,
            RecolorError::Io(_) => ErrorKind::Io,
            RecolorError::Json(_) => ErrorKind::Json,
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        RecolorError::ImageLoad { path: path.into(), source }
    }

    pub(crate) fn save(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        RecolorError::ImageSave { path: path.into(), source }
    }
}

// Errors cross into JSON reports as their display string
impl Serialize for RecolorError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = RecolorError::load(
            "missing.png",
            image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)),
        );
        assert_eq!(err.kind(), ErrorKind::ImageLoadError);
        assert!(err.to_string().contains("missing.png"));

        assert_eq!(
            RecolorError::InvalidColorFormat("zzz".to_string()).kind(),
            ErrorKind::InvalidColorFormat
        );
    }

    #[test]
    fn test_serialize_as_message() {
        let err = RecolorError::InvalidColorFormat("nope".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid color format: \\\"nope\\\"\"");
    }
}
