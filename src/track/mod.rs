//! GPX track logs: parsing, summaries and coordinate lookup by time.
pub mod error;
pub mod interpolation;
mod parsing;
mod structs;
mod summary;

pub use interpolation::{DEFAULT_MAX_GAP, locate, locate_within};
pub use structs::{Bounds, Coordinate, TrackIndex, TrackSample, TrackSummary};
