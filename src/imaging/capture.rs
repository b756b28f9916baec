//! EXIF capture information for image cards and dates.
//!
//! Reads the primary IFD with `kamadak-exif`. Any failure (no EXIF block,
//! unsupported container, unreadable file) yields an empty [`CaptureInfo`];
//! missing metadata is never an error.

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

const EXIF_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureInfo {
    /// `DateTimeOriginal`, falling back to `DateTime`.
    pub taken: Option<NaiveDateTime>,
    /// Exposure time as shown to readers, e.g. `1/125`.
    pub exposure: Option<String>,
    /// Focal length in millimetres, e.g. `50`.
    pub focal_length: Option<String>,
    /// Aperture as a decimal, e.g. `2.8`.
    pub f_number: Option<String>,
    pub model: Option<String>,
}

impl CaptureInfo {
    /// True when no field was found.
    pub fn is_empty(&self) -> bool {
        *self == CaptureInfo::default()
    }

    /// `1/125 sec, 50 mm, F2.8`, skipping missing parts.
    pub fn basic_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(exposure) = &self.exposure {
            parts.push(format!("{exposure} sec"));
        }
        if let Some(focal) = &self.focal_length {
            parts.push(format!("{focal} mm"));
        }
        if let Some(f_number) = &self.f_number {
            parts.push(format!("F{f_number}"));
        }
        parts.join(", ")
    }
}

/// Read capture information from an image file.
pub fn read_capture_info(path: &Path) -> CaptureInfo {
    let Ok(file) = File::open(path) else {
        return CaptureInfo::default();
    };
    let mut reader = BufReader::new(file);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
        return CaptureInfo::default();
    };

    let text = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY)
            .map(|f| f.display_value().to_string().trim_matches('"').trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let rational = |tag: Tag| {
        exif.get_field(tag, In::PRIMARY)
            .and_then(|f| match &f.value {
                Value::Rational(v) => v.first().map(|r| (r.num, r.denom)),
                _ => None,
            })
            .filter(|&(_, denom)| denom != 0)
    };

    CaptureInfo {
        taken: text(Tag::DateTimeOriginal)
            .and_then(|s| parse_exif_date(&s))
            .or_else(|| text(Tag::DateTime).and_then(|s| parse_exif_date(&s))),
        exposure: rational(Tag::ExposureTime).map(|(num, denom)| format_exposure(num, denom)),
        focal_length: rational(Tag::FocalLength)
            .map(|(num, denom)| format_decimal(num as f64 / denom as f64)),
        f_number: rational(Tag::FNumber).map(|(num, denom)| format!("{:.1}", num as f64 / denom as f64)),
        model: text(Tag::Model),
    }
}

/// Parse an EXIF timestamp. `display_value` renders dates with dashes,
/// the raw field uses colons; both are accepted.
fn parse_exif_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, EXIF_DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

/// Sub-second exposures as `1/N`, longer ones as decimals.
fn format_exposure(num: u32, denom: u32) -> String {
    if num == 0 {
        return "0".to_string();
    }
    if num < denom {
        format!("1/{}", (denom as f64 / num as f64).round() as u64)
    } else {
        format_decimal(num as f64 / denom as f64)
    }
}

/// Decimal without a trailing `.0`.
fn format_decimal(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}
