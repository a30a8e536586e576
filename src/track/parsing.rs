//! Reading GPX track logs into a [`TrackIndex`].

use super::error::TrackError;
use super::structs::{TrackIndex, TrackSample};
use chrono::{DateTime, NaiveDateTime};
use gpx::{Gpx, Waypoint};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens and parses a GPX document from disk.
pub(crate) fn read_gpx(path: &Path) -> Result<Gpx, TrackError> {
    let file = File::open(path).map_err(|source| TrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(gpx::read(BufReader::new(file))?)
}

/// Converts a GPX timestamp to UTC and drops the zone.
pub(crate) fn naive_utc(point: &Waypoint) -> Option<NaiveDateTime> {
    let time: ::time::OffsetDateTime = point.time.clone()?.into();
    DateTime::from_timestamp(time.unix_timestamp(), time.nanosecond()).map(|dt| dt.naive_utc())
}

/// Iterates over every track point in document order: tracks, then segments, then points.
pub(crate) fn track_points(gpx: &Gpx) -> impl Iterator<Item = &Waypoint> {
    gpx.tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
}

impl TrackIndex {
    /// Parses a GPX document. Points without a timestamp are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TrackError::Parse`] if the document is not valid GPX. A document that parses
    /// but has no timestamped points yields an empty index instead of an error.
    pub fn parse<R: Read>(reader: R) -> Result<Self, TrackError> {
        let gpx = gpx::read(reader)?;
        Ok(Self::from_gpx(&gpx))
    }

    /// Reads and parses a GPX file.
    pub fn from_path(path: &Path) -> Result<Self, TrackError> {
        let gpx = read_gpx(path)?;
        Ok(Self::from_gpx(&gpx))
    }

    pub fn from_gpx(gpx: &Gpx) -> Self {
        let samples = track_points(gpx)
            .filter_map(|point| {
                let timestamp = naive_utc(point)?;
                let position = point.point();
                Some(TrackSample {
                    timestamp,
                    latitude: position.y(),
                    longitude: position.x(),
                })
            })
            .collect();
        Self::new(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const THREE_POINTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="52.0" lon="4.0"><time>2024-05-01T10:00:00Z</time></trkpt>
      <trkpt lat="52.5" lon="4.5"></trkpt>
      <trkpt lat="53.0" lon="5.0"><time>2024-05-01T10:10:00Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_points_without_time_are_dropped() {
        let index = TrackIndex::parse(THREE_POINTS.as_bytes()).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.samples()[0],
            TrackSample {
                timestamp: at(10, 0, 0),
                latitude: 52.0,
                longitude: 4.0,
            }
        );
        assert_eq!(index.samples()[1].timestamp, at(10, 10, 0));
        assert_eq!(index.samples()[1].latitude, 53.0);
        assert_eq!(index.samples()[1].longitude, 5.0);
    }

    #[test]
    fn test_offset_timestamps_are_normalized_to_utc() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="1.0" lon="2.0"><time>2024-05-01T12:30:00+02:00</time></trkpt>
  </trkseg></trk>
</gpx>"#;
        let index = TrackIndex::parse(doc.as_bytes()).unwrap();

        assert_eq!(index.samples()[0].timestamp, at(10, 30, 0));
    }

    #[test]
    fn test_segments_and_tracks_are_concatenated_in_document_order() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg><trkpt lat="1.0" lon="1.0"><time>2024-05-01T10:00:00Z</time></trkpt></trkseg>
    <trkseg><trkpt lat="2.0" lon="2.0"><time>2024-05-01T09:00:00Z</time></trkpt></trkseg>
  </trk>
  <trk>
    <trkseg><trkpt lat="3.0" lon="3.0"><time>2024-05-01T11:00:00Z</time></trkpt></trkseg>
  </trk>
</gpx>"#;
        let index = TrackIndex::parse(doc.as_bytes()).unwrap();

        let latitudes: Vec<f64> = index.samples().iter().map(|s| s.latitude).collect();
        assert_eq!(latitudes, vec![1.0, 2.0, 3.0], "no re-sorting by time");
    }

    #[test]
    fn test_document_without_timed_points_is_empty_not_an_error() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg><trkpt lat="1.0" lon="1.0"></trkpt></trkseg></trk>
</gpx>"#;
        let index = TrackIndex::parse(doc.as_bytes()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let result = TrackIndex::parse("this is not xml".as_bytes());
        assert!(matches!(result, Err(TrackError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = TrackIndex::from_path(Path::new("/definitely/not/here.gpx"));
        assert!(matches!(result, Err(TrackError::Io { .. })));
    }
}
