//! Maps fused RRF scores onto a 1-10 fit scale.
//!
//! Raw fusion scores are small and tightly clustered (two first places at
//! k=60 sum to about 0.033). Scores are log-compressed against a fixed
//! ceiling, then raised to an exponent above 1 to spread the top end, and
//! finally rounded to the nearest half point. The ceiling is a constant, not
//! a per-query maximum, so fit scores are comparable across queries and runs.

use crate::config::CalibrationConfig;

/// Scale applied before `ln_1p` so typical scores land in its curved region.
const LOG_SCALE: f64 = 100.0;

pub const MIN_FIT: f64 = 1.0;
pub const MAX_FIT: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct Calibrator {
    ceiling: f64,
    exponent: f64,
}

impl Default for Calibrator {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}

impl Calibrator {
    pub fn new(ceiling: f64, exponent: f64) -> Self {
        Self { ceiling, exponent }
    }

    pub fn from_config(config: &CalibrationConfig) -> Self {
        Self::new(config.ceiling, config.exponent)
    }

    /// Returns a fit score in `{1.0, 1.5, ..., 10.0}`, non-decreasing in
    /// `rrf_score`. Non-positive or non-finite scores map to 1.0.
    pub fn calibrate(&self, rrf_score: f64) -> f64 {
        if !rrf_score.is_finite() || rrf_score <= 0.0 || self.ceiling <= 0.0 {
            return MIN_FIT;
        }

        let log_score = (rrf_score * LOG_SCALE).ln_1p() / (self.ceiling * LOG_SCALE).ln_1p();
        let scaled = MIN_FIT + (MAX_FIT - MIN_FIT) * log_score.powf(self.exponent);
        let rounded = (scaled * 2.0).round() / 2.0;

        rounded.clamp(MIN_FIT, MAX_FIT)
    }
}

/// Calibrates with the default ceiling (0.04) and exponent (1.5).
pub fn calibrate(rrf_score: f64) -> f64 {
    Calibrator::default().calibrate(rrf_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::fusion::reciprocal_rank;

    #[test]
    fn test_floor_for_non_positive() {
        assert_eq!(calibrate(0.0), 1.0);
        assert_eq!(calibrate(-0.5), 1.0);
        assert_eq!(calibrate(f64::NAN), 1.0);
    }

    #[test]
    fn test_ceiling_maps_to_ten() {
        assert_eq!(calibrate(0.04), 10.0);
        assert_eq!(calibrate(1.0), 10.0);
    }

    #[test]
    fn test_output_on_half_point_grid() {
        let mut rrf = 0.0001;
        while rrf < 0.1 {
            let fit = calibrate(rrf);
            assert!((1.0..=10.0).contains(&fit));
            assert_eq!((fit * 2.0).fract(), 0.0, "{fit} not on half-point grid");
            rrf *= 1.3;
        }
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let mut previous = calibrate(1e-6);
        let mut rrf = 1e-6;
        while rrf < 0.2 {
            rrf *= 1.05;
            let current = calibrate(rrf);
            assert!(current >= previous, "calibrate({rrf}) = {current} < {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_consensus_scores_spread() {
        let both_first = reciprocal_rank(0, 60) * 2.0;
        let one_first = reciprocal_rank(0, 60);
        let one_tenth = reciprocal_rank(9, 60);
        assert!(calibrate(both_first) > calibrate(one_first));
        assert!(calibrate(one_first) > calibrate(one_tenth));
    }

    #[test]
    fn test_custom_ceiling() {
        let strict = Calibrator::new(0.1, 1.5);
        assert!(strict.calibrate(0.04) < calibrate(0.04));
    }
}
