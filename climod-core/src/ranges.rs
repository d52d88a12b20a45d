//! Evenly spaced coordinate sequences

use crate::timeseries::FloatValue;
use ndarray::Array1;
use tracing::warn;

/// Values `start + i * step` for every `i` below `ceil((stop - start) / step)`
///
/// `stop` is excluded. A zero step, or a step pointing away from `stop`, yields an
/// empty array and a warning instead of a panic in [`Array1::range`].
///
/// # Examples
///
/// ```rust
/// use climod_core::ranges::evenly_spaced;
///
/// assert_eq!(evenly_spaced(0.5, 0.6, 0.05).to_vec(), vec![0.5, 0.55]);
/// assert!(evenly_spaced(0.5, 0.6, -0.05).is_empty());
/// ```
pub fn evenly_spaced(start: FloatValue, stop: FloatValue, step: FloatValue) -> Array1<FloatValue> {
    let steps = ((stop - start) / step).ceil();

    if !steps.is_finite() || steps < 0.0 {
        warn!(start, stop, step, "Step cannot reach stop, sequence is empty");
        return Array1::zeros(0);
    }

    Array1::from_shape_fn(steps as usize, |i| start + step * i as FloatValue)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ndarray_range() {
        let expected = Array1::range(0.5, 1.6, 0.002);
        let values = evenly_spaced(0.5, 1.6, 0.002);

        assert_eq!(values.len(), 550);
        assert_eq!(values, expected);
    }

    #[test]
    fn test_zero_step_is_empty() {
        assert!(evenly_spaced(0.5, 1.6, 0.0).is_empty());
        // 0 / 0 is NaN
        assert!(evenly_spaced(1.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn test_step_away_from_stop_is_empty() {
        assert!(evenly_spaced(0.5, 1.6, -0.1).is_empty());
        assert!(evenly_spaced(1.6, 0.5, 0.1).is_empty());
    }

    #[test]
    fn test_descending_step() {
        assert_eq!(evenly_spaced(1.0, 0.0, -0.5).to_vec(), vec![1.0, 0.5]);
    }

    #[test]
    fn test_start_equals_stop() {
        assert!(evenly_spaced(2.0, 2.0, 0.1).is_empty());
    }
}
