//! Coordinate lookup by timestamp.

use super::structs::{Coordinate, TrackIndex, TrackSample};
use chrono::{Duration, NaiveDateTime};
use log::{debug, warn};

/// How far the nearest sample may be from the query time when no pair of samples brackets it.
pub const DEFAULT_MAX_GAP: Duration = Duration::seconds(3600);

/// Finds the position at `timestamp`, using [`DEFAULT_MAX_GAP`] for the nearest-sample fallback.
pub fn locate(index: &TrackIndex, timestamp: NaiveDateTime) -> Option<Coordinate> {
    locate_within(index, timestamp, DEFAULT_MAX_GAP)
}

/// Finds the position at `timestamp`.
///
/// The first pair of consecutive samples with `p[i] <= timestamp <= p[i+1]` is linearly
/// interpolated. If no pair brackets the time, the closest sample is used as long as it is
/// strictly less than `max_gap` away. Returns `None` when neither applies.
pub fn locate_within(
    index: &TrackIndex,
    timestamp: NaiveDateTime,
    max_gap: Duration,
) -> Option<Coordinate> {
    let samples = index.samples();

    // --- Bracketing pair: linear interpolation ---
    if let Some(coordinate) = samples
        .windows(2)
        .find(|pair| pair[0].timestamp <= timestamp && timestamp <= pair[1].timestamp)
        .map(|pair| interpolate(&pair[0], &pair[1], timestamp))
    {
        return Some(coordinate);
    }

    // --- Nearest sample, if close enough ---
    let (nearest, gap) = nearest_sample(samples, timestamp)?;
    if gap < max_gap {
        warn!(
            "No track segment spans {timestamp}, using nearest point {}s away",
            gap.num_seconds()
        );
        Some(nearest.coordinate())
    } else {
        debug!(
            "Nearest track point to {timestamp} is {}s away, no match",
            gap.num_seconds()
        );
        None
    }
}

fn interpolate(start: &TrackSample, end: &TrackSample, timestamp: NaiveDateTime) -> Coordinate {
    let span = seconds(end.timestamp - start.timestamp);
    if span == 0.0 {
        return start.coordinate();
    }
    let factor = seconds(timestamp - start.timestamp) / span;
    Coordinate {
        latitude: start.latitude + (end.latitude - start.latitude) * factor,
        longitude: start.longitude + (end.longitude - start.longitude) * factor,
    }
}

/// The sample closest in time, first one wins on ties.
fn nearest_sample(
    samples: &[TrackSample],
    timestamp: NaiveDateTime,
) -> Option<(&TrackSample, Duration)> {
    samples
        .iter()
        .map(|sample| (sample, (sample.timestamp - timestamp).abs()))
        .fold(None, |best, (sample, gap)| match best {
            Some((_, best_gap)) if best_gap <= gap => best,
            _ => Some((sample, gap)),
        })
}

fn seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}
