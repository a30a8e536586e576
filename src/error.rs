use thiserror::Error;

/// The primary error type for the geotagger crate.
///
/// These are run-level failures: they abort a batch before any file is touched. Problems
/// with individual files are logged and counted in the report instead.
#[derive(Error, Debug)]
pub enum GeotaggerError {
    #[error("Time correction could not be parsed: {0}")]
    InvalidCorrection(#[from] crate::time::error::TimeError),

    #[error("Track log could not be parsed: {0}")]
    Track(#[from] crate::track::error::TrackError),

    #[error("Track log contains no points with a timestamp")]
    EmptyTrack,

    #[error("Could not list candidate files: {0}")]
    Listing(#[from] walkdir::Error),
}
