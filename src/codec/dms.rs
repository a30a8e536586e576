//! Conversion between decimal degrees and the EXIF degrees/minutes/seconds rational layout.
//!
//! EXIF stores a coordinate as three unsigned rationals plus a hemisphere letter. Degrees and
//! minutes are whole numbers over 1; seconds are quantized to `1 / SECONDS_SCALE`. That
//! rounding is one-way: decoding an encoded value reproduces the input only to within
//! `1 / (3600 * SECONDS_SCALE)` degrees.

/// Denominator for the seconds component.
pub const SECONDS_SCALE: u32 = 10_000;

/// Largest error introduced by [`to_dms_rational`], in degrees.
pub const QUANTIZATION_TOLERANCE: f64 = 1.0 / (3600.0 * SECONDS_SCALE as f64);

/// Three `(numerator, denominator)` pairs: degrees, minutes, seconds.
pub type DmsRational = [(u32, u32); 3];

/// Encodes a non-negative decimal degree value.
pub fn to_dms_rational(value: f64) -> DmsRational {
    let value = value.abs();
    let mut degrees = value.floor();
    let minutes_float = (value - degrees) * 60.0;
    let mut minutes = minutes_float.floor();
    let mut seconds = ((minutes_float - minutes) * 60.0 * SECONDS_SCALE as f64).round();

    // Rounding can push seconds to a full minute.
    if seconds >= 60.0 * SECONDS_SCALE as f64 {
        seconds -= 60.0 * SECONDS_SCALE as f64;
        minutes += 1.0;
    }
    if minutes >= 60.0 {
        minutes -= 60.0;
        degrees += 1.0;
    }

    [
        (degrees as u32, 1),
        (minutes as u32, 1),
        (seconds as u32, SECONDS_SCALE),
    ]
}

/// Decodes a rational triple back to decimal degrees. Zero denominators count as zero.
pub fn from_dms_rational(dms: &DmsRational) -> f64 {
    let part = |(num, den): (u32, u32)| {
        if den == 0 {
            0.0
        } else {
            f64::from(num) / f64::from(den)
        }
    };
    part(dms[0]) + part(dms[1]) / 60.0 + part(dms[2]) / 3600.0
}

/// Which way a coordinate component points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// The single-letter EXIF reference (`N`, `S`, `E` or `W`).
    pub fn as_ref_str(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::South => "S",
            Self::East => "E",
            Self::West => "W",
        }
    }

    pub fn from_ref_str(s: &str) -> Option<Self> {
        match s.trim().trim_end_matches('\0').to_ascii_uppercase().as_str() {
            "N" => Some(Self::North),
            "S" => Some(Self::South),
            "E" => Some(Self::East),
            "W" => Some(Self::West),
            _ => None,
        }
    }

    fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }
}

/// A latitude or longitude as stored in a GPS tag group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeodeticAngle {
    pub dms: DmsRational,
    pub hemisphere: Hemisphere,
}

impl GeodeticAngle {
    pub fn latitude(value: f64) -> Self {
        let hemisphere = if value >= 0.0 {
            Hemisphere::North
        } else {
            Hemisphere::South
        };
        Self {
            dms: to_dms_rational(value.abs()),
            hemisphere,
        }
    }

    pub fn longitude(value: f64) -> Self {
        let hemisphere = if value >= 0.0 {
            Hemisphere::East
        } else {
            Hemisphere::West
        };
        Self {
            dms: to_dms_rational(value.abs()),
            hemisphere,
        }
    }

    /// Signed decimal degrees.
    pub fn to_decimal(&self) -> f64 {
        self.hemisphere.sign() * from_dms_rational(&self.dms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        // 52° 22' 12.3456"
        let value = 52.0 + 22.0 / 60.0 + 12.3456 / 3600.0;
        assert_eq!(
            to_dms_rational(value),
            [(52, 1), (22, 1), (123_456, SECONDS_SCALE)]
        );
    }

    #[test]
    fn test_whole_degrees() {
        assert_eq!(to_dms_rational(180.0), [(180, 1), (0, 1), (0, SECONDS_SCALE)]);
        assert_eq!(to_dms_rational(0.0), [(0, 1), (0, 1), (0, SECONDS_SCALE)]);
    }

    #[test]
    fn test_seconds_rounding_carries_into_minutes() {
        // 59.999999" rounds to 60.0000" and must carry.
        let value = 10.0 + 59.0 / 60.0 + 59.999_999 / 3600.0;
        assert_eq!(to_dms_rational(value), [(11, 1), (0, 1), (0, SECONDS_SCALE)]);
    }

    #[test]
    fn test_decode_within_tolerance_over_full_range() {
        let mut value = -180.0;
        while value <= 180.0 {
            let angle = GeodeticAngle::longitude(value);
            let decoded = angle.to_decimal();
            assert!(
                (decoded - value).abs() <= QUANTIZATION_TOLERANCE,
                "{value} decoded as {decoded}"
            );
            value += 0.123_456_7;
        }
    }

    #[test]
    fn test_hemispheres() {
        assert_eq!(GeodeticAngle::latitude(12.5).hemisphere, Hemisphere::North);
        assert_eq!(GeodeticAngle::latitude(0.0).hemisphere, Hemisphere::North);
        assert_eq!(GeodeticAngle::latitude(-0.1).hemisphere, Hemisphere::South);
        assert_eq!(GeodeticAngle::longitude(0.0).hemisphere, Hemisphere::East);
        assert_eq!(GeodeticAngle::longitude(-73.9).hemisphere, Hemisphere::West);
    }

    #[test]
    fn test_negative_values_encode_magnitude() {
        let angle = GeodeticAngle::latitude(-33.8688);
        assert_eq!(angle.dms, to_dms_rational(33.8688));
        assert!((angle.to_decimal() + 33.8688).abs() <= QUANTIZATION_TOLERANCE);
    }

    #[test]
    fn test_ref_strings() {
        assert_eq!(Hemisphere::from_ref_str("S\0"), Some(Hemisphere::South));
        assert_eq!(Hemisphere::from_ref_str("w"), Some(Hemisphere::West));
        assert_eq!(Hemisphere::from_ref_str("X"), None);
        assert_eq!(Hemisphere::East.as_ref_str(), "E");
    }

    #[test]
    fn test_zero_denominator_decodes_as_zero() {
        assert_eq!(from_dms_rational(&[(10, 1), (30, 0), (0, 0)]), 10.0);
    }
}
