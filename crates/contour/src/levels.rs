//! Contour level selection.

use tracing::warn;

/// Refuse to generate more levels than this from an interval.
const MAX_GENERATED_LEVELS: f64 = 10_000.0;

/// Generate contour levels at multiples of `interval` within `[min_value, max_value]`.
///
/// Returns an empty set for a non-positive interval or an empty range.
pub fn generate_contour_levels(min_value: f64, max_value: f64, interval: f64) -> Vec<f64> {
    let usable = interval.is_finite()
        && interval > 0.0
        && min_value.is_finite()
        && max_value.is_finite()
        && max_value > min_value;
    if !usable {
        return vec![];
    }

    // First and last multiples of the interval inside the range
    let first = (min_value / interval).ceil();
    let last = (max_value / interval + 1e-9).floor();
    if last - first + 1.0 > MAX_GENERATED_LEVELS {
        warn!(
            min_value,
            max_value,
            interval,
            "Contour interval too small for data range, no levels generated"
        );
        return vec![];
    }

    let (first, last) = (first as i64, last as i64);
    (first..=last).map(|k| k as f64 * interval).collect()
}

/// Roughly `count` levels on a 1-2-5 step covering `[min_value, max_value]`.
pub fn nice_contour_levels(min_value: f64, max_value: f64, count: usize) -> Vec<f64> {
    let range = max_value - min_value;
    if count == 0 || !range.is_finite() || range <= 0.0 {
        return vec![];
    }

    let raw = range / count as f64;
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    generate_contour_levels(min_value, max_value, nice * magnitude)
}

/// Sort ascending, drop non-finite values and duplicates.
pub fn normalize_levels(levels: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = levels.iter().copied().filter(|l| l.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_offset_start() {
        assert_eq!(
            generate_contour_levels(3.0, 27.0, 5.0),
            vec![5.0, 10.0, 15.0, 20.0, 25.0]
        );
    }

    #[test]
    fn test_generate_inclusive_max() {
        let levels = generate_contour_levels(0.0, 0.3, 0.1);
        assert_eq!(levels.len(), 4);
    }

    #[test]
    fn test_generate_too_many_levels() {
        assert!(generate_contour_levels(0.0, 1e9, 1e-3).is_empty());
    }

    #[test]
    fn test_nice_levels() {
        assert_eq!(nice_contour_levels(0.0, 10.0, 4), vec![0.0, 5.0, 10.0]);
        assert_eq!(
            nice_contour_levels(-3.0, 17.0, 10),
            vec![-2.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0]
        );
        assert!(nice_contour_levels(5.0, 5.0, 10).is_empty());
        assert!(nice_contour_levels(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_normalize_levels() {
        assert_eq!(
            normalize_levels(&[20.0, f64::NAN, -5.0, 20.0, 0.0, -0.0]),
            vec![-5.0, -0.0, 20.0]
        );
    }
}
