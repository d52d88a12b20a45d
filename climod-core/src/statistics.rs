//! Descriptive statistics for small samples
//!
//! Variance and standard deviation are sample statistics (Bessel-corrected,
//! `n - 1` denominator), so they need at least two values.

use crate::errors::{ClimodError, ClimodResult};
use crate::timeseries::FloatValue;
use ndarray::ArrayView1;
use num::complex::Complex;
use num::{One, ToPrimitive};
use serde::{Deserialize, Serialize};

/// Delta degrees of freedom for Bessel-corrected statistics
const SAMPLE_DDOF: FloatValue = 1.0;

/// Summary statistics of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: FloatValue,
    pub variance: FloatValue,
    pub std_dev: FloatValue,
}

impl Summary {
    /// Summarise a sample of integers or floats
    ///
    /// # Examples
    ///
    /// ```rust
    /// use climod_core::statistics::Summary;
    ///
    /// let summary = Summary::from_samples(&[2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
    /// assert_eq!(summary.mean, 5.0);
    /// assert_eq!(summary.count, 8);
    /// ```
    pub fn from_samples<T: ToPrimitive>(samples: &[T]) -> ClimodResult<Self> {
        let values = to_floats(samples)?;
        let variance = variance(&values)?;
        Ok(Self {
            count: values.len(),
            mean: mean(&values)?,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

fn to_floats<T: ToPrimitive>(samples: &[T]) -> ClimodResult<Vec<FloatValue>> {
    samples
        .iter()
        .enumerate()
        .map(|(index, x)| x.to_f64().ok_or(ClimodError::NonNumericSample { index }))
        .collect()
}

fn require(statistic: &'static str, values: &[FloatValue], required: usize) -> ClimodResult<()> {
    if values.len() < required {
        return Err(ClimodError::InsufficientSamples {
            statistic,
            required,
            found: values.len(),
        });
    }
    Ok(())
}

/// Arithmetic mean
pub fn mean(values: &[FloatValue]) -> ClimodResult<FloatValue> {
    ArrayView1::from(values)
        .mean()
        .ok_or(ClimodError::InsufficientSamples {
            statistic: "mean",
            required: 1,
            found: 0,
        })
}

/// Sample variance
pub fn variance(values: &[FloatValue]) -> ClimodResult<FloatValue> {
    require("variance", values, 2)?;
    Ok(ArrayView1::from(values).var(SAMPLE_DDOF))
}

/// Sample standard deviation
pub fn std_dev(values: &[FloatValue]) -> ClimodResult<FloatValue> {
    require("standard deviation", values, 2)?;
    Ok(ArrayView1::from(values).std(SAMPLE_DDOF))
}

/// Product of a sequence of complex numbers
///
/// The product of an empty sequence is `1 + 0i`.
pub fn complex_product(values: &[Complex<FloatValue>]) -> Complex<FloatValue> {
    values.iter().fold(Complex::one(), |acc, x| acc * x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;

    #[test]
    fn test_summary_of_integers() {
        let summary = Summary::from_samples(&[1_i64, 2, 3, 4, 5]).unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.mean, 3.0);
        assert_eq!(summary.variance, 2.5);
        assert!(is_close!(summary.std_dev, 2.5_f64.sqrt()));
    }

    #[test]
    fn test_summary_of_floats() {
        let summary = Summary::from_samples(&[0.5, 1.5, 2.5]).unwrap();

        assert_relative_eq!(summary.mean, 1.5);
        assert_relative_eq!(summary.variance, 1.0);
        assert_relative_eq!(summary.std_dev, 1.0);
    }

    #[test]
    fn test_mean_of_empty_sample() {
        let result = mean(&[]);
        assert!(matches!(
            result,
            Err(ClimodError::InsufficientSamples {
                statistic: "mean",
                required: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn test_variance_needs_two_samples() {
        assert!(mean(&[4.0]).is_ok());
        assert!(matches!(
            variance(&[4.0]),
            Err(ClimodError::InsufficientSamples { required: 2, .. })
        ));
        assert!(Summary::from_samples(&[4.0]).is_err());
        assert!(matches!(
            std_dev(&[4.0]),
            Err(ClimodError::InsufficientSamples { required: 2, .. })
        ));
    }

    #[test]
    fn test_std_dev_is_root_of_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(std_dev(&values).unwrap(), variance(&values).unwrap().sqrt());
        // Sample (not population) variance: 32 / 7
        assert_relative_eq!(variance(&values).unwrap(), 32.0 / 7.0, epsilon = 1e-12);
    }

    #[test]
    fn test_complex_product() {
        let values = [Complex::new(1.0, 2.0), Complex::new(3.0, -1.0)];
        // (1 + 2i)(3 - i) = 3 - i + 6i + 2 = 5 + 5i
        assert_eq!(complex_product(&values), Complex::new(5.0, 5.0));
    }

    #[test]
    fn test_complex_product_of_nothing() {
        assert_eq!(complex_product(&[]), Complex::new(1.0, 0.0));
    }
}
