//! Pure per-tick metric computations.

/// Fraction of recent loudness samples under the silence threshold (twice the
/// configured noise floor). Empty window yields 0. Always in [0, 1].
pub fn pause_ratio(loudness: &[f64], silence_threshold: f64) -> f64 {
    if loudness.is_empty() {
        return 0.0;
    }
    let silent = loudness.iter().filter(|&&v| v < silence_threshold).count();
    silent as f64 / loudness.len() as f64
}

/// Filler words per minute of elapsed session time. The first tick may see
/// zero elapsed time; that yields 0 rather than a division by zero.
pub fn fillers_per_min(total_fillers: u64, elapsed_ms: u64) -> f64 {
    if elapsed_ms == 0 {
        return 0.0;
    }
    total_fillers as f64 / (elapsed_ms as f64 / 60_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_ratio_of_empty_window_is_zero() {
        assert_eq!(pause_ratio(&[], 0.1), 0.0);
    }

    #[test]
    fn pause_ratio_all_silent_is_one() {
        assert_eq!(pause_ratio(&[0.0, 0.01, 0.05], 0.1), 1.0);
    }

    #[test]
    fn pause_ratio_all_loud_is_zero() {
        assert_eq!(pause_ratio(&[0.5, 0.8, 0.3], 0.1), 0.0);
    }

    #[test]
    fn pause_ratio_counts_strictly_below_threshold() {
        // Exactly at the threshold is not a pause.
        assert_eq!(pause_ratio(&[0.1, 0.05], 0.1), 0.5);
    }

    #[test]
    fn filler_rate_guards_first_tick() {
        assert_eq!(fillers_per_min(5, 0), 0.0);
    }

    #[test]
    fn filler_rate_is_per_elapsed_minute() {
        assert!((fillers_per_min(6, 120_000) - 3.0).abs() < 1e-12);
        assert!((fillers_per_min(1, 30_000) - 2.0).abs() < 1e-12);
    }
}
