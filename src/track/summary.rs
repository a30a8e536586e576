//! Overview of a track log: counts, time span, extent and local time zone.

use super::error::TrackError;
use super::parsing::{naive_utc, read_gpx, track_points};
use super::structs::{Bounds, TrackSummary};
use chrono::TimeZone;
use chrono_tz::Tz;
use gpx::{Gpx, Waypoint};
use log::{info, warn};
use std::path::Path;
use std::str::FromStr;
use tzf_rs::DefaultFinder;

// --- Global Timezone Finder ---
static FINDER: std::sync::LazyLock<DefaultFinder> = std::sync::LazyLock::new(DefaultFinder::new);

fn timezone_at(point: &Waypoint) -> Option<Tz> {
    let position = point.point();
    Tz::from_str(FINDER.get_tz_name(position.x(), position.y())).ok()
}

impl TrackSummary {
    /// Reads a GPX file and summarizes it.
    pub fn from_path(path: &Path) -> Result<Self, TrackError> {
        let gpx = read_gpx(path)?;
        let summary = Self::from_gpx(&gpx);
        info!(
            "Track {}: {} of {} points timed, {:?} to {:?} UTC",
            path.display(),
            summary.timed_point_count,
            summary.point_count,
            summary.start,
            summary.end
        );
        if summary.crosses_timezones {
            warn!("Track crosses time zones, local times use the zone of the first point");
        }
        Ok(summary)
    }

    pub fn from_gpx(gpx: &Gpx) -> Self {
        let track_count = gpx.tracks.len();
        let segment_count = gpx.tracks.iter().map(|t| t.segments.len()).sum();
        let point_count = track_points(gpx).count();

        let timed: Vec<_> = track_points(gpx)
            .filter_map(|p| naive_utc(p).map(|time| (p, time)))
            .collect();

        // Zones follow document order, the time span does not.
        let first = timed.first();
        let last = timed.last();
        let start = timed.iter().map(|(_, time)| *time).min();
        let end = timed.iter().map(|(_, time)| *time).max();

        let first_zone = first.and_then(|(p, _)| timezone_at(p));
        let last_zone = last.and_then(|(p, _)| timezone_at(p));
        let crosses_timezones = matches!((first_zone, last_zone), (Some(a), Some(b)) if a != b);
        let start_local = first_zone
            .zip(first)
            .map(|(tz, (_, utc))| tz.from_utc_datetime(utc).naive_local());

        let bounds = track_points(gpx)
            .map(Waypoint::point)
            .fold(None, |acc: Option<Bounds>, p| {
                let (lat, lon) = (p.y(), p.x());
                Some(match acc {
                    None => Bounds {
                        min_latitude: lat,
                        max_latitude: lat,
                        min_longitude: lon,
                        max_longitude: lon,
                    },
                    Some(b) => Bounds {
                        min_latitude: b.min_latitude.min(lat),
                        max_latitude: b.max_latitude.max(lat),
                        min_longitude: b.min_longitude.min(lon),
                        max_longitude: b.max_longitude.max(lon),
                    },
                })
            });

        Self {
            track_count,
            segment_count,
            point_count,
            timed_point_count: timed.len(),
            start,
            end,
            duration_seconds: start.zip(end).map(|(s, e)| (e - s).num_seconds()),
            start_local,
            timezone: first_zone.map(|tz| tz.name().to_string()),
            crosses_timezones,
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parse(doc: &str) -> Gpx {
        gpx::read(doc.as_bytes()).unwrap()
    }

    #[test]
    fn test_summary_of_amsterdam_walk() {
        let gpx = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="52.3676" lon="4.9041"><time>2024-07-01T08:00:00Z</time></trkpt>
      <trkpt lat="52.3700" lon="4.8900"></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="52.3731" lon="4.8922"><time>2024-07-01T09:30:15Z</time></trkpt>
    </trkseg>
  </trk>
</gpx>"#,
        );

        let summary = TrackSummary::from_gpx(&gpx);

        assert_eq!(summary.track_count, 1);
        assert_eq!(summary.segment_count, 2);
        assert_eq!(summary.point_count, 3);
        assert_eq!(summary.timed_point_count, 2);
        assert_eq!(summary.duration_seconds, Some(5415));
        assert_eq!(summary.timezone.as_deref(), Some("Europe/Amsterdam"));
        assert!(!summary.crosses_timezones);
        // CEST is UTC+2 in July.
        assert_eq!(
            summary.start_local,
            Some(
                NaiveDate::from_ymd_opt(2024, 7, 1)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap()
            )
        );
        let bounds = summary.bounds.unwrap();
        assert_eq!(bounds.min_latitude, 52.3676);
        assert_eq!(bounds.max_latitude, 52.3731);
        assert_eq!(bounds.min_longitude, 4.89);
        assert_eq!(bounds.max_longitude, 4.9041);
    }

    #[test]
    fn test_track_crossing_time_zones_is_flagged() {
        // Amsterdam to London.
        let gpx = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg>
    <trkpt lat="52.3676" lon="4.9041"><time>2024-07-01T08:00:00Z</time></trkpt>
    <trkpt lat="51.5074" lon="-0.1278"><time>2024-07-01T14:00:00Z</time></trkpt>
  </trkseg></trk>
</gpx>"#,
        );

        let summary = TrackSummary::from_gpx(&gpx);

        assert!(summary.crosses_timezones);
        assert_eq!(summary.timezone.as_deref(), Some("Europe/Amsterdam"));
    }

    #[test]
    fn test_time_span_ignores_document_order() {
        let gpx = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg><trkpt lat="52.3676" lon="4.9041"><time>2024-07-01T09:00:00Z</time></trkpt></trkseg>
    <trkseg><trkpt lat="52.3700" lon="4.8900"><time>2024-07-01T08:00:00Z</time></trkpt></trkseg>
    <trkseg><trkpt lat="52.3731" lon="4.8922"><time>2024-07-01T08:30:00Z</time></trkpt></trkseg>
  </trk>
</gpx>"#,
        );

        let summary = TrackSummary::from_gpx(&gpx);
        let at = |h, m| {
            NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };

        assert_eq!(summary.start, Some(at(8, 0)));
        assert_eq!(summary.end, Some(at(9, 0)));
        assert_eq!(summary.duration_seconds, Some(3600));
        // Local time of the first point in the file.
        assert_eq!(summary.start_local, Some(at(11, 0)));
    }

    #[test]
    fn test_summary_without_timed_points() {
        let gpx = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk><trkseg><trkpt lat="1.0" lon="1.0"></trkpt></trkseg></trk>
</gpx>"#,
        );

        let summary = TrackSummary::from_gpx(&gpx);

        assert_eq!(summary.point_count, 1);
        assert_eq!(summary.timed_point_count, 0);
        assert_eq!(summary.start, None);
        assert_eq!(summary.duration_seconds, None);
        assert_eq!(summary.timezone, None);
        assert!(summary.bounds.is_some());
    }
}
