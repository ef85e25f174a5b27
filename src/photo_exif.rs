use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;

use crate::angle::{self, Rational};

/// Capture time of a photo as a unix timestamp. EXIF stores
/// `DateTimeOriginal` without a zone; it is interpreted as local time,
/// which is what cameras write.
pub fn capture_timestamp(path: &Path) -> Result<i64> {
    let metadata = Metadata::new_from_path(path)?;
    let raw = metadata
        .get_tag(&ExifTag::DateTimeOriginal(String::new()))
        .next()
        .and_then(|tag| match tag {
            ExifTag::DateTimeOriginal(value) => Some(value.clone()),
            _ => None,
        })
        .with_context(|| format!("no DateTimeOriginal tag in {}", path.display()))?;

    let naive = NaiveDateTime::parse_from_str(raw.trim_end_matches('\0'), "%Y:%m:%d %H:%M:%S")
        .with_context(|| format!("unparseable DateTimeOriginal {:?} in {}", raw, path.display()))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("capture time {naive} does not exist in the local timezone"))?;
    Ok(local.timestamp())
}

/// Whether the photo already carries a GPS position.
pub fn has_gps(path: &Path) -> Result<bool> {
    let metadata = Metadata::new_from_path(path)?;
    Ok(metadata
        .get_tag(&ExifTag::GPSLatitude(Vec::new()))
        .next()
        .is_some())
}

/// Write the GPS position tags and save the file. Latitude and longitude
/// go through the sexagesimal formatter; the hemisphere reference tags
/// carry the sign.
pub fn write_gps(path: &Path, latitude: f64, longitude: f64, altitude: f64) -> Result<()> {
    let mut metadata = Metadata::new_from_path(path)?;

    metadata.set_tag(ExifTag::GPSLatitudeRef(
        (if latitude < 0.0 { "S" } else { "N" }).to_string(),
    ));
    metadata.set_tag(ExifTag::GPSLatitude(to_exif_rationals(angle::sexagesimal(
        latitude,
    ))));
    metadata.set_tag(ExifTag::GPSLongitudeRef(
        (if longitude < 0.0 { "W" } else { "E" }).to_string(),
    ));
    metadata.set_tag(ExifTag::GPSLongitude(to_exif_rationals(
        angle::sexagesimal(longitude),
    )));
    // 0 = above sea level, 1 = below
    metadata.set_tag(ExifTag::GPSAltitudeRef(vec![u8::from(altitude < 0.0)]));
    let altitude = angle::approximate(altitude.abs());
    metadata.set_tag(ExifTag::GPSAltitude(vec![uR64 {
        nominator: altitude.numerator,
        denominator: altitude.denominator,
    }]));

    metadata.write_to_file(path)?;
    Ok(())
}

fn to_exif_rationals(components: [Rational; 3]) -> Vec<uR64> {
    components
        .iter()
        .map(|r| uR64 {
            nominator: r.numerator,
            denominator: r.denominator,
        })
        .collect()
}
