use assert_float_eq::assert_float_absolute_eq;
use phototag::locator::{self, LocateError};
use phototag::quality::QualityLimits;
use phototag::track_history::{HistoryError, TrackHistory};

fn history(samples: Vec<(i64, &str)>) -> TrackHistory {
    TrackHistory::from_samples(samples).unwrap()
}

#[test]
fn midpoint_between_identical_points() {
    let history = history(vec![(1000, "10.0 50.0 0"), (2000, "10.0 50.0 0")]);
    let result = locator::locate(&history, 1500).unwrap();
    assert_eq!(result.latitude, 50.0);
    assert_eq!(result.longitude, 10.0);
    assert_eq!(result.altitude, 0.0);
    assert_eq!(result.distance_diff, 0.0);
    assert_eq!(result.time_diff, 500.0);
    assert_eq!(result.percentage, 0.5);
}

#[test]
fn query_at_a_sample_timestamp_returns_that_sample() {
    let history = history(vec![(1000, "10.0 50.0 0"), (2000, "11.0 51.0 0")]);

    let result = locator::locate(&history, 1000).unwrap();
    assert_eq!(result.latitude, 50.0);
    assert_eq!(result.longitude, 10.0);
    assert_eq!(result.time_diff, 0.0);
    assert_eq!(result.percentage, 0.0);

    let result = locator::locate(&history, 2000).unwrap();
    assert_eq!(result.latitude, 51.0);
    assert_eq!(result.longitude, 11.0);
    assert_eq!(result.time_diff, 0.0);
    assert_eq!(result.percentage, 0.0);
}

#[test]
fn interpolation_stays_on_the_straight_line() {
    let history = history(vec![(1000, "10.0 50.0 0"), (3000, "12.0 51.0 0")]);
    let result = locator::locate(&history, 1500).unwrap();
    assert_eq!(result.percentage, 0.25);
    assert_float_absolute_eq!(result.longitude, 10.5, 1e-12);
    assert_float_absolute_eq!(result.latitude, 50.25, 1e-12);
    assert_eq!(result.time_diff, 500.0);
}

#[test]
fn percentage_is_bounded_for_monotonic_brackets() {
    let history = history(vec![(1000, "10.0 50.0 0"), (3000, "12.0 51.0 0")]);
    for timestamp in (1000..=3000).step_by(100) {
        let result = locator::locate(&history, timestamp).unwrap();
        assert!(
            (0.0..=1.0).contains(&result.percentage),
            "percentage {} out of range at {}",
            result.percentage,
            timestamp
        );
    }
}

#[test]
fn descending_history_brackets_correctly() {
    let history = history(vec![
        (3000, "12.0 52.0 0"),
        (2000, "11.0 51.0 0"),
        (1000, "10.0 50.0 0"),
    ]);

    let result = locator::locate(&history, 1500).unwrap();
    assert_eq!(result.percentage, 0.5);
    assert_float_absolute_eq!(result.longitude, 10.5, 1e-12);
    assert_float_absolute_eq!(result.latitude, 50.5, 1e-12);

    // the scan pairs the tightest samples around the query even though the
    // iteration order is reversed
    let bracket = locator::find_bracket(&history, 2500).unwrap();
    assert_eq!(bracket.before.timestamp, 2000);
    assert_eq!(bracket.after.timestamp, 3000);
}

#[test]
fn query_outside_the_track_has_no_bracket() {
    let history = history(vec![(1000, "10.0 50.0 0"), (2000, "11.0 51.0 0")]);

    assert!(matches!(
        locator::locate(&history, 500),
        Err(LocateError::NoBracket(500))
    ));
    assert!(matches!(
        locator::locate(&history, 2500),
        Err(LocateError::NoBracket(2500))
    ));
}

#[test]
fn degenerate_histories_are_rejected() {
    let empty = TrackHistory::from_points(Vec::new());
    assert!(matches!(
        locator::locate(&empty, 1000),
        Err(LocateError::History(HistoryError::TooFewEntries(0)))
    ));

    let single = history(vec![(1000, "10.0 50.0 0")]);
    assert!(matches!(
        locator::locate(&single, 1000),
        Err(LocateError::History(HistoryError::TooFewEntries(1)))
    ));
}

#[test]
fn duplicate_timestamps_collapse_to_the_sample() {
    let history = history(vec![(1000, "10.0 50.0 0"), (1000, "10.0 50.0 0")]);
    let result = locator::locate(&history, 1000).unwrap();
    assert_eq!(result.percentage, 0.0);
    assert_eq!(result.latitude, 50.0);
    assert_eq!(result.longitude, 10.0);
}

#[test]
fn one_degree_bracket_warns_on_distance_but_passes() {
    // ~157km between the samples; a 1m distance limit alone must not
    // reject the result
    let history = history(vec![(1000, "0 0 0"), (2000, "1 1 0")]);
    let result = locator::locate(&history, 1500).unwrap();
    assert_float_absolute_eq!(result.distance_diff, 157_000.0, 1_000.0);

    let limits = QualityLimits {
        max_distance: Some(1.0),
        max_time: None,
    };
    let verdict = limits.check(&result);
    assert!(verdict.distance_exceeded);
    assert!(!verdict.time_exceeded);
    assert!(!verdict.rejected());

    let both = QualityLimits {
        max_distance: Some(1.0),
        max_time: Some(100.0),
    };
    assert!(both.check(&result).rejected());
}
