//! Percentage deviation from a reference cost.

use crate::error::EvaluationError;

/// Signed percentage deviation of `cost` from `reference`:
/// `(cost - reference) / reference × 100`.
///
/// Positive when `cost` is worse than the reference.
///
/// # Errors
///
/// [`EvaluationError::ZeroReferenceCost`] if `reference` is zero and
/// [`EvaluationError::NonFiniteReferenceCost`] if it is NaN or infinite.
///
/// # Examples
///
/// ```
/// use u_cvrp::evaluation::percent_deviation;
///
/// assert!((percent_deviation(110.0, 100.0).unwrap() - 10.0).abs() < 1e-10);
/// assert!((percent_deviation(95.0, 100.0).unwrap() + 5.0).abs() < 1e-10);
/// assert!(percent_deviation(10.0, 0.0).is_err());
/// ```
pub fn percent_deviation(cost: f64, reference: f64) -> Result<f64, EvaluationError> {
    if !reference.is_finite() {
        return Err(EvaluationError::NonFiniteReferenceCost(reference));
    }
    if reference == 0.0 {
        return Err(EvaluationError::ZeroReferenceCost);
    }
    Ok((cost - reference) / reference * 100.0)
}

/// Absolute percentage deviation, `|cost - reference| / reference × 100`.
///
/// # Errors
///
/// Same as [`percent_deviation`].
pub fn absolute_percent_deviation(cost: f64, reference: f64) -> Result<f64, EvaluationError> {
    percent_deviation(cost, reference).map(f64::abs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed() {
        assert!((percent_deviation(784.0, 784.0).unwrap()).abs() < 1e-12);
        assert!((percent_deviation(862.4, 784.0).unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_absolute() {
        assert!((absolute_percent_deviation(90.0, 100.0).unwrap() - 10.0).abs() < 1e-10);
        assert!((absolute_percent_deviation(110.0, 100.0).unwrap() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_reference_is_error() {
        assert_eq!(
            percent_deviation(6.0, 0.0),
            Err(EvaluationError::ZeroReferenceCost)
        );
        assert_eq!(
            absolute_percent_deviation(6.0, -0.0),
            Err(EvaluationError::ZeroReferenceCost)
        );
    }

    #[test]
    fn test_non_finite_reference_is_error() {
        assert!(matches!(
            percent_deviation(6.0, f64::NAN),
            Err(EvaluationError::NonFiniteReferenceCost(_))
        ));
        assert_eq!(
            percent_deviation(6.0, f64::INFINITY),
            Err(EvaluationError::NonFiniteReferenceCost(f64::INFINITY))
        );
    }
}
