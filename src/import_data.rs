use std::{ffi::OsStr, fs::File, io::BufReader, path::Path};

use anyhow::Result;
use chrono::DateTime;
use gpx::read;
use kml::{Kml, KmlReader};

use crate::track_data;
use crate::track_history::{Coordinate, TrackHistory, TrackPoint};

/// Load a history from whatever the path points at: a KML or GPX track
/// log by extension, anything else is treated as a snapshot produced by
/// `track_data`.
pub fn load_history(path: &Path) -> Result<TrackHistory> {
    match path
        .extension()
        .and_then(OsStr::to_str)
        .map(|x| x.to_lowercase())
        .as_deref()
    {
        Some("kml") => load_kml(path),
        Some("gpx") => load_gpx(path),
        _ => track_data::read_snapshot_file(path),
    }
}

/// Parse the `gx:Track` sample sequence of a KML document into a history,
/// in document order. Each `when` element is paired with the `coord`
/// element at the same position.
pub fn load_kml(path: &Path) -> Result<TrackHistory> {
    let kml_data = KmlReader::<_, f64>::from_reader(BufReader::new(File::open(path)?)).read()?;
    let mut whens = Vec::new();
    let mut coords = Vec::new();
    flatten_kml(vec![kml_data])
        .into_iter()
        .filter_map(|k| match k {
            Kml::Placemark(p) => Some(p.children),
            _ => None,
        })
        .flat_map(|arr| arr.into_iter().filter(|e| e.name == "Track"))
        .for_each(|e| {
            e.children.into_iter().for_each(|e| {
                if e.name == "when" {
                    whens.push(e.content);
                } else if e.name == "coord" {
                    coords.push(e.content);
                }
            })
        });

    let mut samples = Vec::new();
    for (when, coord) in whens.iter().zip(coords.iter()) {
        let (when, coord) = match (when, coord) {
            (Some(when), Some(coord)) => (when, coord),
            _ => continue,
        };
        let timestamp = DateTime::parse_from_rfc3339(when)?.timestamp();
        samples.push((timestamp, coord.as_str()));
    }
    if samples.is_empty() {
        bail!("no track samples found in {}", path.display());
    }
    Ok(TrackHistory::from_samples(samples)?)
}

/// Load the track points of a GPX document, in document order. Points
/// without a timestamp are useless for bracketing and are skipped.
pub fn load_gpx(path: &Path) -> Result<TrackHistory> {
    let gpx_data = read(BufReader::new(File::open(path)?))?;
    let mut points = Vec::new();
    for track in &gpx_data.tracks {
        for segment in &track.segments {
            for point in &segment.points {
                let time = match &point.time {
                    Some(time) => time,
                    None => {
                        warn!("skipping a GPX point without a timestamp");
                        continue;
                    }
                };
                let timestamp = DateTime::parse_from_rfc3339(&time.format()?)?.timestamp();
                points.push(TrackPoint {
                    timestamp,
                    coordinate: Coordinate {
                        longitude: point.point().x(),
                        latitude: point.point().y(),
                        altitude: point.elevation.unwrap_or(0.0),
                    },
                });
            }
        }
    }
    if points.is_empty() {
        bail!("no track samples found in {}", path.display());
    }
    Ok(TrackHistory::from_points(points))
}

fn flatten_kml(kml: Vec<Kml>) -> Vec<Kml> {
    kml.into_iter()
        .flat_map(|k| match k {
            Kml::KmlDocument(d) => flatten_kml(d.elements),
            Kml::Document { attrs: _, elements } => flatten_kml(elements),
            Kml::Folder { attrs: _, elements } => flatten_kml(elements),
            k => vec![k],
        })
        .collect()
}
