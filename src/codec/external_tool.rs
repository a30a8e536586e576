//! GPS tags in raw files, read and written by invoking an `exiftool` executable.
//!
//! Every call spawns its own process; nothing is shared between invocations.

use super::dms::Hemisphere;
use super::error::CodecError;
use crate::time::parse_naive;
use crate::track::Coordinate;
use chrono::NaiveDateTime;
use log::debug;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

/// Marker `exiftool -f` prints for tags that are absent.
const MISSING: &str = "-";

/// Runs `exiftool` with `args` followed by `path` and returns its stdout lines.
fn run(executable: &Path, args: &[String], path: &Path) -> Result<Vec<String>, CodecError> {
    debug!("{} {} {}", executable.display(), args.join(" "), path.display());

    let output = Command::new(executable)
        .args(args)
        .arg(path)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                CodecError::ToolUnavailable(format!("{} not found", executable.display()))
            }
            _ => CodecError::ToolExecutionFailed {
                path: path.to_path_buf(),
                status: "not started".to_string(),
                stderr: e.to_string(),
            },
        })?;

    if !output.status.success() {
        return Err(CodecError::ToolExecutionFailed {
            path: path.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| line.trim().to_string())
        .collect())
}

/// Reads `tags` as plain values, one line per tag, `None` where a tag is absent.
fn read_tags(
    executable: &Path,
    path: &Path,
    tags: &[&str],
    numeric: bool,
) -> Result<Vec<Option<String>>, CodecError> {
    let mut args = vec!["-f".to_string(), "-s3".to_string()];
    if numeric {
        args.push("-n".to_string());
    }
    args.extend(tags.iter().map(|tag| format!("-{tag}")));

    let mut lines = run(executable, &args, path)?.into_iter();
    Ok(tags
        .iter()
        .map(|_| {
            lines
                .next()
                .filter(|value| !value.is_empty() && value != MISSING)
        })
        .collect())
}

pub fn has_gps(executable: &Path, path: &Path) -> Result<bool, CodecError> {
    let values = read_tags(executable, path, &["GPSLatitude", "GPSLongitude"], true)?;
    Ok(values.iter().any(Option::is_some))
}

pub fn read_capture_time(
    executable: &Path,
    path: &Path,
) -> Result<Option<NaiveDateTime>, CodecError> {
    let values = read_tags(executable, path, &["DateTimeOriginal"], false)?;
    Ok(values
        .into_iter()
        .next()
        .flatten()
        .and_then(|value| parse_naive(&value)))
}

pub fn read_gps(executable: &Path, path: &Path) -> Result<Option<Coordinate>, CodecError> {
    let values = read_tags(
        executable,
        path,
        &[
            "GPSLatitude",
            "GPSLatitudeRef",
            "GPSLongitude",
            "GPSLongitudeRef",
        ],
        true,
    )?;
    let component = |value: &Option<String>, reference: &Option<String>, positive| {
        let magnitude = value.as_deref()?.parse::<f64>().ok()?.abs();
        let hemisphere = reference
            .as_deref()
            .and_then(Hemisphere::from_ref_str)
            .unwrap_or(positive);
        Some(match hemisphere {
            Hemisphere::South | Hemisphere::West => -magnitude,
            Hemisphere::North | Hemisphere::East => magnitude,
        })
    };

    let latitude = component(&values[0], &values[1], Hemisphere::North);
    let longitude = component(&values[2], &values[3], Hemisphere::East);
    Ok(latitude
        .zip(longitude)
        .map(|(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        }))
}

/// Command-line arguments that store `coordinate` and overwrite the file in place.
pub fn write_args(coordinate: Coordinate) -> Vec<String> {
    let lat_ref = if coordinate.latitude >= 0.0 {
        Hemisphere::North
    } else {
        Hemisphere::South
    };
    let lon_ref = if coordinate.longitude >= 0.0 {
        Hemisphere::East
    } else {
        Hemisphere::West
    };
    vec![
        format!("-GPSLatitude={}", coordinate.latitude.abs()),
        format!("-GPSLatitudeRef={}", lat_ref.as_ref_str()),
        format!("-GPSLongitude={}", coordinate.longitude.abs()),
        format!("-GPSLongitudeRef={}", lon_ref.as_ref_str()),
        "-overwrite_original".to_string(),
    ]
}

pub fn write_gps(executable: &Path, path: &Path, coordinate: Coordinate) -> Result<(), CodecError> {
    run(executable, &write_args(coordinate), path).map(|_| ())
}
