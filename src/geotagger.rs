use crate::GeotaggerError;
use crate::codec::{GpsCodec, WriteOutcome};
use crate::time::{DEFAULT_CORRECTION, parse_correction};
use crate::track::{Coordinate, DEFAULT_MAX_GAP, TrackIndex, locate_within};
use crate::utils::list_candidate_files;
use bon::bon;
use chrono::{Duration, NaiveDateTime};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Answer of the confirmation collaborator for a photo that already has coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    /// Overwrite this photo only.
    Overwrite,
    /// Leave this photo alone.
    Skip,
    /// Overwrite this and every later photo without asking again.
    OverwriteAll,
    /// Skip this and every later photo that has coordinates, without asking again.
    SkipAll,
    /// Stop the run, keeping what has been written so far.
    Cancel,
}

/// Standing answer for photos that already carry coordinates, scoped to one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverwritePolicy {
    #[default]
    Unset,
    SkipAll,
    OverwriteAll,
}

/// What to do with one photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Write,
    Skip,
    Cancel,
}

/// Decides what to do with a photo and returns the policy for the rest of the run.
///
/// `prompt` is only called when the photo has coordinates and no standing answer exists.
pub fn decide(
    policy: OverwritePolicy,
    has_gps: bool,
    prompt: impl FnOnce() -> OverwriteDecision,
) -> (Action, OverwritePolicy) {
    if !has_gps {
        return (Action::Write, policy);
    }
    match policy {
        OverwritePolicy::SkipAll => (Action::Skip, policy),
        OverwritePolicy::OverwriteAll => (Action::Write, policy),
        OverwritePolicy::Unset => match prompt() {
            OverwriteDecision::Overwrite => (Action::Write, policy),
            OverwriteDecision::Skip => (Action::Skip, policy),
            OverwriteDecision::OverwriteAll => (Action::Write, OverwritePolicy::OverwriteAll),
            OverwriteDecision::SkipAll => (Action::Skip, OverwritePolicy::SkipAll),
            OverwriteDecision::Cancel => (Action::Cancel, policy),
        },
    }
}

/// Asked, synchronously, what to do with a photo that already has coordinates.
///
/// Implemented for any `FnMut(&str) -> OverwriteDecision`. The argument is the file name.
/// Hosts with a user interface block here until the user has answered.
pub trait ConfirmOverwrite {
    fn confirm(&mut self, file_name: &str) -> OverwriteDecision;
}

impl<F> ConfirmOverwrite for F
where
    F: FnMut(&str) -> OverwriteDecision,
{
    fn confirm(&mut self, file_name: &str) -> OverwriteDecision {
        self(file_name)
    }
}

/// Never overwrites existing coordinates. Used when no collaborator is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipExisting;

impl ConfirmOverwrite for SkipExisting {
    fn confirm(&mut self, _file_name: &str) -> OverwriteDecision {
        OverwriteDecision::SkipAll
    }
}

/// Receives the percentage of files processed after each file. Purely observational.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F> ProgressSink for F
where
    F: FnMut(u8),
{
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Photos whose coordinates were written.
    pub updated: usize,
    /// Candidate photos found, whether or not they were processed.
    pub total: usize,
    /// Photos left alone: no capture time, no matching position, or existing coordinates kept.
    pub skipped: usize,
    /// Photos whose metadata could not be read or written.
    pub failed: usize,
    /// Whether the run was stopped early by a `Cancel` answer.
    pub cancelled: bool,
}

/// Everything learned about one photo while processing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRecord {
    pub path: PathBuf,
    pub capture_time: Option<NaiveDateTime>,
    pub corrected_time: Option<NaiveDateTime>,
    pub has_gps: bool,
    pub coordinate: Option<Coordinate>,
}

impl PhotoRecord {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            capture_time: None,
            corrected_time: None,
            has_gps: false,
            coordinate: None,
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or(self.path.as_os_str())
            .to_string_lossy()
            .to_string()
    }
}

enum FileOutcome {
    Updated,
    Skipped,
    Failed,
    Cancelled,
}

/// Writes track positions into a folder of photos.
///
/// A `Geotagger` holds configuration only; every run starts with a fresh overwrite policy.
///
/// ```rust,no_run
/// # use std::path::{Path, PathBuf};
/// # use geotagger::Geotagger;
/// let geotagger = Geotagger::builder()
///     .exiftool_path(PathBuf::from("/usr/bin/exiftool"))
///     .time_correction("+0:30")
///     .build();
/// let report = geotagger.run_unattended(Path::new("photos"), Path::new("track.gpx"))?;
/// assert!(report.updated <= report.total);
/// # Ok::<(), geotagger::GeotaggerError>(())
/// ```
pub struct Geotagger {
    codec: GpsCodec,
    time_correction: String,
    max_time_gap: Duration,
}

#[bon]
impl Geotagger {
    /// Constructs a `Geotagger` via a builder pattern.
    ///
    /// # Builder Arguments
    ///
    /// * `exiftool_path: Option<PathBuf>` - The `exiftool` executable used for raw files. Without it, raw files fail individually and the rest of the batch continues.
    /// * `time_correction: String` - (Default: `"0:00"`) Offset `[±]H:MM` added to every capture time before matching.
    /// * `max_time_gap: Duration` - (Default: one hour) How far the nearest track point may be when no track segment spans the capture time.
    #[builder]
    pub fn new(
        exiftool_path: Option<PathBuf>,
        #[builder(into, default = DEFAULT_CORRECTION.to_string())] time_correction: String,
        #[builder(default = DEFAULT_MAX_GAP)] max_time_gap: Duration,
    ) -> Self {
        Self {
            codec: GpsCodec::new(exiftool_path),
            time_correction,
            max_time_gap,
        }
    }

    pub fn codec(&self) -> &GpsCodec {
        &self.codec
    }

    /// Geotags every supported photo directly inside `folder` using the track at `track_path`.
    ///
    /// # Errors
    ///
    /// The run is aborted before any file is touched if:
    /// * [`GeotaggerError::InvalidCorrection`]: the time correction is malformed.
    /// * [`GeotaggerError::Track`]: the track log cannot be read or is not valid GPX.
    /// * [`GeotaggerError::EmptyTrack`]: the track log has no timestamped points.
    /// * [`GeotaggerError::Listing`]: `folder` cannot be listed.
    ///
    /// Problems with individual photos never abort the run; they are logged and counted in
    /// the returned [`BatchReport`]. A `Cancel` answer is not an error either: the partial
    /// report is returned with `cancelled` set.
    pub fn run(
        &self,
        folder: &Path,
        track_path: &Path,
        confirm: &mut dyn ConfirmOverwrite,
        progress: &mut dyn ProgressSink,
    ) -> Result<BatchReport, GeotaggerError> {
        info!("Geotagging photos in {}", folder.display());
        info!("Using track {}", track_path.display());
        info!("Time correction: {}", self.time_correction);

        let correction = parse_correction(&self.time_correction)?;
        let track = TrackIndex::from_path(track_path)?;
        if track.is_empty() {
            error!("Track {} has no timestamped points", track_path.display());
            return Err(GeotaggerError::EmptyTrack);
        }
        info!("Found {} timestamped track points", track.len());

        let files = list_candidate_files(folder)?;
        info!("Found {} photos to process", files.len());

        Ok(self.tag_files(&files, &track, correction, confirm, progress))
    }

    /// Like [`Geotagger::run`], keeping existing coordinates and reporting no progress.
    pub fn run_unattended(
        &self,
        folder: &Path,
        track_path: &Path,
    ) -> Result<BatchReport, GeotaggerError> {
        self.run(folder, track_path, &mut SkipExisting, &mut |_: u8| {})
    }

    /// Geotags an explicit list of files against an already parsed track.
    ///
    /// Callers that split a large set of photos across workers can give each worker its own
    /// disjoint slice of files.
    pub fn tag_files(
        &self,
        files: &[PathBuf],
        track: &TrackIndex,
        correction: Duration,
        confirm: &mut dyn ConfirmOverwrite,
        progress: &mut dyn ProgressSink,
    ) -> BatchReport {
        let total = files.len();
        let mut report = BatchReport {
            total,
            ..BatchReport::default()
        };
        let mut policy = OverwritePolicy::Unset;

        for (i, path) in files.iter().enumerate() {
            match self.process_file(path, track, correction, &mut policy, confirm) {
                FileOutcome::Updated => report.updated += 1,
                FileOutcome::Skipped => report.skipped += 1,
                FileOutcome::Failed => report.failed += 1,
                FileOutcome::Cancelled => {
                    info!("Cancelled, {} of {} photos updated", report.updated, total);
                    report.cancelled = true;
                    return report;
                }
            }
            progress.report(((i + 1) * 100 / total) as u8);
        }

        info!(
            "Finished: updated {} of {} photos ({} skipped, {} failed)",
            report.updated, report.total, report.skipped, report.failed
        );
        report
    }

    fn process_file(
        &self,
        path: &Path,
        track: &TrackIndex,
        correction: Duration,
        policy: &mut OverwritePolicy,
        confirm: &mut dyn ConfirmOverwrite,
    ) -> FileOutcome {
        let mut record = PhotoRecord::new(path);
        let file_name = record.file_name();

        // --- Capture time ---
        record.capture_time = match self.codec.read_capture_time(path) {
            Ok(time) => time,
            Err(e) => {
                error!("Could not read metadata of {file_name}: {e}");
                return FileOutcome::Failed;
            }
        };
        let Some(taken) = record.capture_time else {
            warn!("No capture time in {file_name}");
            return FileOutcome::Skipped;
        };
        record.corrected_time = taken.checked_add_signed(correction);
        let Some(corrected) = record.corrected_time else {
            warn!("Corrected capture time of {file_name} is out of range");
            return FileOutcome::Skipped;
        };
        info!("Processing {file_name}: taken {taken}, corrected {corrected}");

        // --- Position ---
        record.coordinate = locate_within(track, corrected, self.max_time_gap);
        let Some(coordinate) = record.coordinate else {
            warn!("No track position for {file_name} at {corrected}");
            return FileOutcome::Skipped;
        };
        info!("Found position for {file_name}: {coordinate}");

        // --- Existing coordinates ---
        record.has_gps = match self.codec.has_gps(path) {
            Ok(has_gps) => has_gps,
            Err(e) => {
                error!("Could not check existing GPS data of {file_name}: {e}");
                return FileOutcome::Failed;
            }
        };
        if record.has_gps {
            info!("{file_name} already has GPS data");
        }

        let (action, next_policy) = decide(*policy, record.has_gps, || {
            let decision = confirm.confirm(&file_name);
            info!("Answer for {file_name}: {decision:?}");
            decision
        });
        *policy = next_policy;

        match action {
            Action::Cancel => return FileOutcome::Cancelled,
            Action::Skip => {
                info!("Keeping existing GPS data of {file_name}");
                return FileOutcome::Skipped;
            }
            Action::Write => {}
        }

        // --- Write ---
        match self.codec.write_gps(path, coordinate) {
            Ok(WriteOutcome::Written) => {
                info!("Wrote {coordinate} to {file_name}");
                FileOutcome::Updated
            }
            Ok(WriteOutcome::Unsupported) => {
                warn!("{file_name} has an unsupported format");
                FileOutcome::Skipped
            }
            Err(e) => {
                error!("Could not write coordinates to {file_name}: {e}");
                FileOutcome::Failed
            }
        }
    }
}
