//! GPS tags inside JPEG files, read and written directly with `little_exif`.

use super::dms::{DmsRational, GeodeticAngle, Hemisphere};
use super::error::CodecError;
use crate::time::parse_naive;
use crate::track::Coordinate;
use chrono::NaiveDateTime;
use little_exif::exif_tag::ExifTag;
use little_exif::filetype::FileExtension;
use little_exif::ifd::ExifTagGroup;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use std::fs;
use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

/// Runs a `little_exif` operation, turning both errors and panics into [`CodecError::Container`].
fn guarded<T>(path: &Path, op: impl FnOnce() -> std::io::Result<T>) -> Result<T, CodecError> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(CodecError::Container {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        Err(_) => Err(CodecError::Container {
            path: path.to_path_buf(),
            reason: "EXIF parser panicked".to_string(),
        }),
    }
}

fn load(path: &Path) -> Result<(Vec<u8>, Metadata), CodecError> {
    let bytes = fs::read(path).map_err(CodecError::io(path))?;
    let metadata = guarded(path, || Metadata::new_from_vec(&bytes, FileExtension::JPEG))?;
    Ok((bytes, metadata))
}

/// Any tag stored in the GPS IFD.
fn is_gps_tag(tag: &ExifTag) -> bool {
    tag.get_group() == ExifTagGroup::GPS
}

fn to_dms(rationals: &[uR64]) -> Option<DmsRational> {
    match rationals {
        [d, m, s, ..] => Some([
            (d.nominator, d.denominator),
            (m.nominator, m.denominator),
            (s.nominator, s.denominator),
        ]),
        _ => None,
    }
}

fn to_rationals(dms: &DmsRational) -> Vec<uR64> {
    dms.iter()
        .map(|&(nominator, denominator)| uR64 {
            nominator,
            denominator,
        })
        .collect()
}

/// Whether the file has a non-empty GPS tag group.
pub fn has_gps(path: &Path) -> Result<bool, CodecError> {
    let (_, metadata) = load(path)?;
    Ok((&metadata).into_iter().any(is_gps_tag))
}

/// The `DateTimeOriginal` tag, if present and well-formed.
pub fn read_capture_time(path: &Path) -> Result<Option<NaiveDateTime>, CodecError> {
    let (_, metadata) = load(path)?;
    Ok((&metadata).into_iter().find_map(|tag| match tag {
        ExifTag::DateTimeOriginal(value) => parse_naive(value),
        _ => None,
    }))
}

/// The stored coordinate, if both latitude and longitude are present.
pub fn read_gps(path: &Path) -> Result<Option<Coordinate>, CodecError> {
    let (_, metadata) = load(path)?;

    let mut lat_ref = None;
    let mut lat = None;
    let mut lon_ref = None;
    let mut lon = None;
    for tag in &metadata {
        match tag {
            ExifTag::GPSLatitudeRef(s) => lat_ref = Hemisphere::from_ref_str(s),
            ExifTag::GPSLatitude(rats) => lat = to_dms(rats),
            ExifTag::GPSLongitudeRef(s) => lon_ref = Hemisphere::from_ref_str(s),
            ExifTag::GPSLongitude(rats) => lon = to_dms(rats),
            _ => {}
        }
    }

    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Ok(None);
    };
    let latitude = GeodeticAngle {
        dms: lat,
        hemisphere: lat_ref.unwrap_or(Hemisphere::North),
    };
    let longitude = GeodeticAngle {
        dms: lon,
        hemisphere: lon_ref.unwrap_or(Hemisphere::East),
    };
    Ok(Some(Coordinate {
        latitude: latitude.to_decimal(),
        longitude: longitude.to_decimal(),
    }))
}

/// Replaces the whole GPS tag group with the four position tags for `coordinate` and
/// rewrites the file.
///
/// The new file is staged next to the original and renamed over it, so a failure at any
/// point leaves the original untouched.
pub fn write_gps(path: &Path, coordinate: Coordinate) -> Result<(), CodecError> {
    let (mut bytes, mut metadata) = load(path)?;

    let stale: Vec<ExifTag> = (&metadata)
        .into_iter()
        .filter(|tag| is_gps_tag(tag))
        .cloned()
        .collect();
    for tag in stale {
        metadata.remove_tag(tag);
    }

    let latitude = GeodeticAngle::latitude(coordinate.latitude);
    let longitude = GeodeticAngle::longitude(coordinate.longitude);
    metadata.set_tag(ExifTag::GPSLatitudeRef(
        latitude.hemisphere.as_ref_str().to_string(),
    ));
    metadata.set_tag(ExifTag::GPSLatitude(to_rationals(&latitude.dms)));
    metadata.set_tag(ExifTag::GPSLongitudeRef(
        longitude.hemisphere.as_ref_str().to_string(),
    ));
    metadata.set_tag(ExifTag::GPSLongitude(to_rationals(&longitude.dms)));

    guarded(path, || metadata.write_to_vec(&mut bytes, FileExtension::JPEG))?;
    replace_atomically(path, &bytes)
}

fn replace_atomically(path: &Path, contents: &[u8]) -> Result<(), CodecError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let permissions = fs::metadata(path)
        .map_err(CodecError::io(path))?
        .permissions();

    let mut staged = tempfile::Builder::new()
        .prefix(".geotagger-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(CodecError::io(dir))?;
    staged
        .write_all(contents)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(CodecError::io(staged.path()))?;
    fs::set_permissions(staged.path(), permissions).map_err(CodecError::io(staged.path()))?;

    staged
        .persist(path)
        .map_err(|e| CodecError::io(path)(e.error))?;
    Ok(())
}
