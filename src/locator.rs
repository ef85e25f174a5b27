use thiserror::Error;

use crate::geo_utils;
use crate::track_history::{Direction, HistoryError, TrackHistory, TrackPoint};

/* The bracket scan is one linear pass in stored order, trusting the
   direction derived from the track's first two entries. `before` and
   `after` are overwritten on every match, and the scan stops early once
   the side that stored order should reach last has been filled (`before`
   for descending tracks, `after` for ascending ones). If the track is not
   globally monotonic in the detected direction, the early stop can settle
   on a non-nearest bracket. Known limitation, kept for compatibility with
   existing track caches and workflows.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    pub before: TrackPoint,
    pub after: TrackPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    /// Great-circle distance between the two bracketing samples, meters.
    /// How far the camera could plausibly have moved inside the bracket.
    pub distance_diff: f64,
    /// Gap to the nearer of the two bracketing samples, seconds.
    pub time_diff: f64,
    /// Position of the query inside the bracket interval, 0 at `before`
    /// and 1 at `after`.
    pub percentage: f64,
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("no bracketing samples around timestamp {0}")]
    NoBracket(i64),
}

/// Find the pair of samples enclosing `timestamp` in the history's stored
/// order. Fails with `TooFewEntries` for histories shorter than two points
/// and with `NoBracket` when the scan cannot fill both sides.
pub fn find_bracket(history: &TrackHistory, timestamp: i64) -> Result<Bracket, LocateError> {
    let direction = history.direction()?;
    let mut before: Option<TrackPoint> = None;
    let mut after: Option<TrackPoint> = None;

    for point in history.iter() {
        if point.timestamp <= timestamp {
            before = Some(*point);
            if direction == Direction::Descending {
                break;
            }
        }
        if point.timestamp >= timestamp {
            after = Some(*point);
            if direction == Direction::Ascending {
                break;
            }
        }
    }

    match (before, after) {
        (Some(before), Some(after)) => Ok(Bracket { before, after }),
        _ => Err(LocateError::NoBracket(timestamp)),
    }
}

/// Linear interpolation between the bracketing samples at `timestamp`.
///
/// `percentage` is not clamped: with a healthy bracket it is in [0, 1] by
/// construction, and an out-of-range value means the monotonicity
/// assumption was violated, which should surface rather than disappear.
pub fn interpolate(bracket: &Bracket, timestamp: i64) -> InterpolationResult {
    let Bracket { before, after } = bracket;

    let span = after.timestamp - before.timestamp;
    let percentage = if span == 0 {
        0.0
    } else {
        (timestamp - before.timestamp) as f64 / span as f64
    };

    let lerp = |begin: f64, end: f64| begin + percentage * (end - begin);

    InterpolationResult {
        latitude: lerp(before.coordinate.latitude, after.coordinate.latitude),
        longitude: lerp(before.coordinate.longitude, after.coordinate.longitude),
        // altitude is not interpolated, only carried for the output shape
        altitude: 0.0,
        distance_diff: geo_utils::great_circle_distance(
            before.coordinate.latitude,
            before.coordinate.longitude,
            after.coordinate.latitude,
            after.coordinate.longitude,
        ),
        time_diff: (timestamp - before.timestamp).min(after.timestamp - timestamp) as f64,
        percentage,
    }
}

/// Bracket search and interpolation in one call.
pub fn locate(
    history: &TrackHistory,
    timestamp: i64,
) -> Result<InterpolationResult, LocateError> {
    let bracket = find_bracket(history, timestamp)?;
    debug!(
        "bracket for {}: before={} ({:.6}, {:.6}), after={} ({:.6}, {:.6})",
        timestamp,
        bracket.before.timestamp,
        bracket.before.coordinate.latitude,
        bracket.before.coordinate.longitude,
        bracket.after.timestamp,
        bracket.after.coordinate.latitude,
        bracket.after.coordinate.longitude,
    );
    let result = interpolate(&bracket, timestamp);
    debug!(
        "distance: {:.0}m, time gap: {:.0}s, route percentage: {:.2}%",
        result.distance_diff,
        result.time_diff,
        result.percentage * 100.0,
    );
    Ok(result)
}
