//! # Geotagger
//!
//! Attach GPS coordinates to photos by matching their capture time against a GPX track log.
//!
//! The camera and the GPS logger each keep their own clock. This crate reads the capture
//! time of every photo in a folder, shifts it by a user-supplied correction to compensate for
//! camera clock drift, looks up the matching position in the track and writes it back into
//! the photo's metadata.
//!
//! ## Key Features
//!
//! - **Track indexing**: Parses GPX tracks into a time-ordered list of samples.
//! - **Interpolation**: Linearly interpolates between the two samples bracketing a capture
//!   time, falling back to the nearest sample within an hour.
//! - **GPS codec**: Converts decimal degrees to the EXIF degrees/minutes/seconds rational
//!   layout and writes it into JPEG files directly, or into raw files through `exiftool`.
//! - **Overwrite policy**: Asks a caller-supplied collaborator what to do with photos that
//!   already carry coordinates, and remembers "all" answers for the rest of the run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use geotagger::{Geotagger, OverwriteDecision};
//!
//! fn main() -> Result<(), geotagger::GeotaggerError> {
//!     let geotagger = Geotagger::builder()
//!         .time_correction("-1:30")
//!         .build();
//!
//!     let mut confirm = |_file_name: &str| OverwriteDecision::SkipAll;
//!     let mut progress = |percent: u8| println!("{percent}%");
//!     let report = geotagger.run(
//!         Path::new("photos"),
//!         Path::new("track.gpx"),
//!         &mut confirm,
//!         &mut progress,
//!     )?;
//!
//!     println!("Updated {} of {} photos", report.updated, report.total);
//!     Ok(())
//! }
//! ```

pub mod codec;
mod error;
pub mod geotagger;
pub mod time;
pub mod track;
pub mod utils;

pub use codec::{GpsCodec, MediaFormat, WriteOutcome};
pub use error::GeotaggerError;
pub use geotagger::{
    BatchReport, ConfirmOverwrite, Geotagger, OverwriteDecision, OverwritePolicy, ProgressSink,
    SkipExisting,
};
pub use track::{Coordinate, TrackIndex, TrackSample};
