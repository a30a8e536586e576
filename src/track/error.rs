use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Could not read track log {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Track log is not a valid GPX document")]
    Parse(#[from] gpx::errors::GpxError),
}
