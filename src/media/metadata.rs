/// Capture date extraction
///
/// Reads the EXIF `DateTimeOriginal` tag. Every failure here is soft:
/// the caller decides whether to fall back to the modification time
/// or to leave the file out.
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use log::{debug, warn};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// EXIF date layout, e.g. "2021:03:04"
const EXIF_DATE_FORMAT: &str = "%Y:%m:%d";

/// Read the embedded capture date of an image.
///
/// Only the date portion of the tag is used; the returned timestamp is
/// midnight of that day. Returns `None` when the tag is missing, the file
/// has no readable EXIF container, or the date does not parse.
pub fn extract_capture_date(path: &Path) -> Option<NaiveDateTime> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Error extracting date from {}: {}", path.display(), e);
            return None;
        }
    };
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => {
            debug!("No EXIF data in {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Error extracting date from {}: {}", path.display(), e);
            return None;
        }
    };

    let Some(field) = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY) else {
        debug!("No DateTimeOriginal in {}", path.display());
        return None;
    };
    let raw = match field.value {
        exif::Value::Ascii(ref values) => values.first()?,
        _ => {
            warn!("DateTimeOriginal in {} is not text", path.display());
            return None;
        }
    };

    let parsed = std::str::from_utf8(raw)
        .ok()
        .and_then(parse_exif_date);
    if parsed.is_none() {
        warn!(
            "Unparseable capture date {:?} in {}",
            String::from_utf8_lossy(raw),
            path.display()
        );
    }
    parsed
}

/// Parse the date part of an EXIF "YYYY:MM:DD HH:MM:SS" value
fn parse_exif_date(value: &str) -> Option<NaiveDateTime> {
    let date_part = value.trim().split(' ').next()?;
    NaiveDate::parse_from_str(date_part, EXIF_DATE_FORMAT)
        .ok()?
        .and_hms_opt(0, 0, 0)
}

/// Filesystem modification time in local time.
///
/// Falls back to the current time if the platform cannot report one.
pub fn file_modification_date(path: &Path) -> NaiveDateTime {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => DateTime::<Local>::from(modified).naive_local(),
        Err(e) => {
            warn!("No modification time for {}: {}", path.display(), e);
            Local::now().naive_local()
        }
    }
}
