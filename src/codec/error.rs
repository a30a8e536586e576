use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not process the EXIF container of {path}: {reason}")]
    Container { path: PathBuf, reason: String },

    #[error("exiftool is not available: {0}")]
    ToolUnavailable(String),

    #[error("exiftool failed on {path} ({status}): {stderr}")]
    ToolExecutionFailed {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl CodecError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
