//! Euclidean vector geometry operations.

use compute_kernel::ComputeError;

/// Dot product; fails with [`ComputeError::DimensionMismatch`] on
/// unequal lengths.
pub fn dot_product(a: &[f64], b: &[f64]) -> Result<f64, ComputeError> {
    if a.len() != b.len() {
        return Err(ComputeError::DimensionMismatch(format!(
            "dot product needs equal lengths, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// 3-D cross product; both inputs must have exactly 3 components.
pub fn cross_product(a: &[f64], b: &[f64]) -> Result<Vec<f64>, ComputeError> {
    if a.len() != 3 || b.len() != 3 {
        return Err(ComputeError::DimensionMismatch(format!(
            "cross product is only defined for 3-D vectors, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ])
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Euclidean distance; fails with [`ComputeError::DimensionMismatch`]
/// on unequal lengths.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64, ComputeError> {
    if a.len() != b.len() {
        return Err(ComputeError::DimensionMismatch(format!(
            "distance needs equal lengths, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_product() {
        assert_eq!(
            dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(),
            32.0
        );
    }

    #[test]
    fn test_dot_product_mismatched_lengths() {
        assert!(matches!(
            dot_product(&[1.0, 2.0], &[1.0]),
            Err(ComputeError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_cross_product_basis_vectors() {
        // x cross y = z
        let result = cross_product(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(result, vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cross_product_requires_three_components() {
        assert!(matches!(
            cross_product(&[1.0, 2.0], &[3.0, 4.0]),
            Err(ComputeError::DimensionMismatch(_))
        ));
        assert!(matches!(
            cross_product(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]),
            Err(ComputeError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_norm() {
        assert_relative_eq!(norm(&[3.0, 4.0]), 5.0, max_relative = 1e-12);
        assert_eq!(norm(&[]), 0.0);
    }

    #[test]
    fn test_euclidean_distance() {
        assert_relative_eq!(
            euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]).unwrap(),
            5.0,
            max_relative = 1e-12
        );
        assert!(matches!(
            euclidean_distance(&[1.0], &[1.0, 2.0]),
            Err(ComputeError::DimensionMismatch(_))
        ));
    }
}
