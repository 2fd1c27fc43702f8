use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmaasError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("{kind} does not match the expected schema: {source}")]
    Schema {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error on {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl CmaasError {
    pub(crate) fn file_io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::FileIo { path, source }
    }

    pub(crate) fn schema(kind: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Schema { kind, source }
    }
}

pub type Result<T> = std::result::Result<T, CmaasError>;
