use std::slice;

use thiserror::Error;

/// A recorded position in decimal degrees, altitude in meters. Altitude is
/// zero when the source document does not carry one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Seconds since the unix epoch, UTC.
    pub timestamp: i64,
    pub coordinate: Coordinate,
}

/// Temporal order of the track, judged from its first two entries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history needs at least two track points, got {0}")]
    TooFewEntries(usize),
    #[error("malformed coordinate sample: {0:?}")]
    MalformedSample(String),
}

/// The location history, kept in the exact order the source document listed
/// the samples. We never re-sort: the bracket scan in `locator` works off the
/// stored order and the direction derived from the first two entries.
/// Duplicate timestamps stay as distinct samples.
///
/// Read-only after construction, so it can be shared freely across
/// concurrent queries.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackHistory {
    points: Vec<TrackPoint>,
}

impl TrackHistory {
    /// Build from `(epoch seconds, "<lon> <lat> <alt>")` pairs in the order
    /// the ingestion step discovered them.
    pub fn from_samples<'a, I>(samples: I) -> Result<Self, HistoryError>
    where
        I: IntoIterator<Item = (i64, &'a str)>,
    {
        let mut points = Vec::new();
        for (timestamp, raw) in samples {
            points.push(TrackPoint {
                timestamp,
                coordinate: parse_coordinate(raw)?,
            });
        }
        Ok(TrackHistory { points })
    }

    /// Restore a previously serialized history verbatim.
    pub fn from_points(points: Vec<TrackPoint>) -> Self {
        TrackHistory { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, TrackPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    /// Direction of the whole track. Only the first two entries are
    /// compared; the rest of the sequence is assumed to follow them.
    pub fn direction(&self) -> Result<Direction, HistoryError> {
        if self.points.len() < 2 {
            return Err(HistoryError::TooFewEntries(self.points.len()));
        }
        if self.points[0].timestamp <= self.points[1].timestamp {
            Ok(Direction::Ascending)
        } else {
            Ok(Direction::Descending)
        }
    }
}

/// Parse a `"<lon> <lat> <alt>"` sample, the payload of a KML `gx:coord`
/// element. Anything after the third component is ignored.
fn parse_coordinate(raw: &str) -> Result<Coordinate, HistoryError> {
    let mut parts = raw.split_whitespace();
    let mut component = || -> Result<f64, HistoryError> {
        parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(|| HistoryError::MalformedSample(raw.to_string()))
    };
    Ok(Coordinate {
        longitude: component()?,
        latitude: component()?,
        altitude: component()?,
    })
}
