use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single timestamped position from a track log.
///
/// The timestamp is the track's UTC time with the zone stripped, so it can be compared
/// directly against naive photo capture times once those have been corrected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSample {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}

impl TrackSample {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A position in decimal degrees. Negative values are south / west.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Time-ordered samples of one track log, built once and read-only afterwards.
///
/// Samples are kept in document order. Logs whose segments are not globally time-ordered
/// are not re-sorted, which degrades interpolation for them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackIndex {
    samples: Vec<TrackSample>,
}

impl TrackIndex {
    pub fn new(samples: Vec<TrackSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[TrackSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Overview of a track log, used to help the user pick a time correction.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub track_count: usize,
    pub segment_count: usize,
    pub point_count: usize,
    /// Points carrying a timestamp; only these take part in matching.
    pub timed_point_count: usize,
    /// Earliest UTC time in the track.
    pub start: Option<NaiveDateTime>,
    /// Latest UTC time in the track.
    pub end: Option<NaiveDateTime>,
    pub duration_seconds: Option<i64>,
    /// Wall clock time of the first timed point in the file, in the zone it was recorded in.
    pub start_local: Option<NaiveDateTime>,
    /// IANA name of the zone containing the first timed point.
    pub timezone: Option<String>,
    /// Whether the first and last timed points fall in different time zones.
    pub crosses_timezones: bool,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}
