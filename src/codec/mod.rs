//! Reading and writing GPS positions and capture times in photo metadata.
//!
//! Two kinds of files are supported. JPEGs carry EXIF directly and are edited in-process;
//! Sony ARW raw files are handed to an external `exiftool` executable. Anything else is
//! reported as unsupported so that batch processing can carry on.

pub mod container;
pub mod dms;
pub mod error;
pub mod external_tool;

use crate::track::Coordinate;
use chrono::NaiveDateTime;
use error::CodecError;
use std::path::{Path, PathBuf};

/// File suffixes (lowercase, without the dot) of the supported formats.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "arw"];

/// How a file's metadata is accessed, decided by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    /// EXIF embedded in the file, edited directly.
    Container,
    /// Raw files edited through `exiftool`.
    ExternalTool,
    Unsupported,
}

impl MediaFormat {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Self::Container,
            "arw" => Self::ExternalTool,
            _ => Self::Unsupported,
        }
    }
}

/// Result of a write that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// The file's format is not supported; nothing was written.
    Unsupported,
}

/// Dispatches metadata operations to the right backend for each file.
#[derive(Debug, Clone, Default)]
pub struct GpsCodec {
    exiftool: Option<PathBuf>,
}

impl GpsCodec {
    pub fn new(exiftool: Option<PathBuf>) -> Self {
        Self { exiftool }
    }

    fn exiftool(&self) -> Result<&Path, CodecError> {
        self.exiftool
            .as_deref()
            .ok_or_else(|| CodecError::ToolUnavailable("no exiftool path configured".to_string()))
    }

    /// Whether the file already carries a GPS position. Unsupported files never do.
    pub fn has_gps(&self, path: &Path) -> Result<bool, CodecError> {
        match MediaFormat::from_path(path) {
            MediaFormat::Container => container::has_gps(path),
            MediaFormat::ExternalTool => external_tool::has_gps(self.exiftool()?, path),
            MediaFormat::Unsupported => Ok(false),
        }
    }

    /// The original capture time (`DateTimeOriginal`), if recorded.
    pub fn read_capture_time(&self, path: &Path) -> Result<Option<NaiveDateTime>, CodecError> {
        match MediaFormat::from_path(path) {
            MediaFormat::Container => container::read_capture_time(path),
            MediaFormat::ExternalTool => external_tool::read_capture_time(self.exiftool()?, path),
            MediaFormat::Unsupported => Err(CodecError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The stored GPS position, if any.
    pub fn read_gps(&self, path: &Path) -> Result<Option<Coordinate>, CodecError> {
        match MediaFormat::from_path(path) {
            MediaFormat::Container => container::read_gps(path),
            MediaFormat::ExternalTool => external_tool::read_gps(self.exiftool()?, path),
            MediaFormat::Unsupported => Err(CodecError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Stores `coordinate` in the file, replacing any previous position.
    pub fn write_gps(
        &self,
        path: &Path,
        coordinate: Coordinate,
    ) -> Result<WriteOutcome, CodecError> {
        match MediaFormat::from_path(path) {
            MediaFormat::Container => container::write_gps(path, coordinate)?,
            MediaFormat::ExternalTool => {
                external_tool::write_gps(self.exiftool()?, path, coordinate)?;
            }
            MediaFormat::Unsupported => return Ok(WriteOutcome::Unsupported),
        }
        Ok(WriteOutcome::Written)
    }
}
