//! Boundary clamping and prefill values for form inputs.
//!
//! The form never hands out-of-range numbers to the geometry code. Every
//! widget value passes through one of these clamps first, the same way a
//! bounded number input would refuse anything outside its range. NaN
//! collapses to the lower bound.

use crate::model::{MAX_DEPTH_M, MAX_MEASUREMENTS, MAX_SITES, MIN_MEASUREMENTS, MIN_WIDTH_M};

fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

/// Number of sites, 0..=20.
pub fn clamp_site_count(count: usize) -> usize {
    count.min(MAX_SITES)
}

/// Measurements across one site, 2..=20.
pub fn clamp_measurement_count(count: usize) -> usize {
    count.clamp(MIN_MEASUREMENTS, MAX_MEASUREMENTS)
}

/// River width in metres, at least 0.1.
pub fn clamp_width(width: f64) -> f64 {
    clamp_or_min(width, MIN_WIDTH_M, f64::INFINITY)
}

/// Depth in metres, 0..=10.
pub fn clamp_depth(depth: f64) -> f64 {
    clamp_or_min(depth, 0.0, MAX_DEPTH_M)
}

/// Distance from the left bank, 0..=width.
pub fn clamp_distance(distance: f64, width: f64) -> f64 {
    clamp_or_min(distance, 0.0, width)
}

/// `count` evenly spaced values from `start` to `end` inclusive.
///
/// A single value yields `[start]`; zero yields an empty vector.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Distances the form prefills for an empty site: evenly spread bank to bank.
pub fn default_distances(width: f64, count: usize) -> Vec<f64> {
    linspace(0.0, width, count)
}

/// Depths the form prefills for an empty site.
pub fn default_depths(count: usize) -> Vec<f64> {
    vec![0.0; count]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_clamps_hold_form_limits() {
        assert_eq!(clamp_site_count(25), 20);
        assert_eq!(clamp_measurement_count(1), 2);
        assert_eq!(clamp_measurement_count(40), 20);
        assert_eq!(clamp_width(-3.0), 0.1);
        assert_eq!(clamp_depth(12.0), 10.0);
        assert_eq!(clamp_depth(-0.2), 0.0);
        assert_eq!(clamp_distance(5.0, 3.5), 3.5);
    }

    #[test]
    fn test_nan_input_falls_to_lower_bound() {
        assert_eq!(clamp_width(f64::NAN), 0.1);
        assert_eq!(clamp_depth(f64::NAN), 0.0);
        assert_eq!(clamp_distance(f64::NAN, 2.0), 0.0);
    }

    #[test]
    fn test_linspace_hits_both_ends_exactly() {
        let xs = linspace(0.0, 2.0, 30);
        assert_eq!(xs.len(), 30);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[29], 2.0);
        assert!((xs[1] - 2.0 / 29.0).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.5, 1.0, 1), vec![0.5]);
    }

    #[test]
    fn test_default_prefill_spreads_distances_across_width() {
        assert_eq!(default_distances(4.0, 3), vec![0.0, 2.0, 4.0]);
        assert_eq!(default_depths(3), vec![0.0, 0.0, 0.0]);
    }
}
