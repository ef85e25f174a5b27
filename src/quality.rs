use crate::locator::InterpolationResult;

/// Caller-configured tolerances for accepting an interpolated position.
/// `None` means no limit in that dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityLimits {
    /// Meters between the two bracketing samples.
    pub max_distance: Option<f64>,
    /// Seconds to the nearer bracketing sample.
    pub max_time: Option<f64>,
}

/// Which configured limits a result blew past. A result is rejected only
/// when both were configured and both were exceeded; a single exceeded
/// limit downgrades to a warning on the caller's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityVerdict {
    pub distance_exceeded: bool,
    pub time_exceeded: bool,
}

impl QualityVerdict {
    pub fn rejected(&self) -> bool {
        self.distance_exceeded && self.time_exceeded
    }
}

impl QualityLimits {
    pub fn check(&self, result: &InterpolationResult) -> QualityVerdict {
        let exceeded = |limit: Option<f64>, value: f64| match limit {
            Some(limit) => value > limit,
            None => false,
        };
        QualityVerdict {
            distance_exceeded: exceeded(self.max_distance, result.distance_diff),
            time_exceeded: exceeded(self.max_time, result.time_diff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(distance_diff: f64, time_diff: f64) -> InterpolationResult {
        InterpolationResult {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            distance_diff,
            time_diff,
            percentage: 0.5,
        }
    }

    #[test]
    fn rejects_only_when_both_limits_are_exceeded() {
        let limits = QualityLimits {
            max_distance: Some(2000.0),
            max_time: Some(3600.0),
        };

        assert!(!limits.check(&result(100.0, 100.0)).rejected());
        assert!(!limits.check(&result(5000.0, 100.0)).rejected());
        assert!(!limits.check(&result(100.0, 7200.0)).rejected());
        assert!(limits.check(&result(5000.0, 7200.0)).rejected());
    }

    #[test]
    fn unset_limits_never_reject() {
        let distance_only = QualityLimits {
            max_distance: Some(1.0),
            max_time: None,
        };
        let verdict = distance_only.check(&result(157_000.0, 500.0));
        assert!(verdict.distance_exceeded);
        assert!(!verdict.time_exceeded);
        assert!(!verdict.rejected());

        let unlimited = QualityLimits::default();
        assert!(!unlimited.check(&result(f64::MAX, f64::MAX)).rejected());
    }

    #[test]
    fn values_on_the_limit_pass() {
        let limits = QualityLimits {
            max_distance: Some(2000.0),
            max_time: Some(3600.0),
        };
        let verdict = limits.check(&result(2000.0, 3600.0));
        assert!(!verdict.distance_exceeded);
        assert!(!verdict.time_exceeded);
    }
}
