//! Generated datasets with a known ground truth.

use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::dataset::InMemoryDataset;
use crate::error::{Error, Result};

/// Samples `n` examples of `y = X·w_true + b_true + ε` with `X ~ N(0, 1)` and
/// `ε ~ N(0, noise_std²)`.
///
/// # Errors
/// - [`Error::EmptyData`] if `n` is zero or `w_true` is empty.
/// - [`Error::InvalidParameter`] if `noise_std` is negative or not finite.
pub fn linear(
    w_true: &[f32],
    b_true: f32,
    n: usize,
    noise_std: f32,
    seed: u64,
) -> Result<InMemoryDataset> {
    if w_true.is_empty() {
        return Err(Error::EmptyData("true weight vector is empty".into()));
    }
    let noise = Normal::new(0.0f32, noise_std).map_err(|e| {
        Error::InvalidParameter(format!("noise std {}: {}", noise_std, e))
    })?;
    let standard = Normal::new(0.0f32, 1.0).map_err(|e| Error::InvalidParameter(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let d = w_true.len();
    let mut features = Vec::with_capacity(n * d);
    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        let row: Vec<f32> = (0..d).map(|_| standard.sample(&mut rng)).collect();
        let y = row.iter().zip(w_true).map(|(x, w)| x * w).sum::<f32>()
            + b_true
            + noise.sample(&mut rng);
        features.extend_from_slice(&row);
        labels.push(y);
    }
    InMemoryDataset::from_flat(features, d, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn test_noiseless_labels_follow_the_plane() {
        let ds = linear(&[2.0, -3.4], 4.2, 50, 0.0, 1).unwrap();
        assert_eq!(ds.len(), 50);
        assert_eq!(ds.num_features(), 2);
        for i in 0..ds.len() {
            let x = ds.row(i).unwrap();
            let expected = 2.0 * x[0] - 3.4 * x[1] + 4.2;
            assert!((ds.labels()[i] - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = linear(&[1.0], 0.0, 20, 0.01, 5).unwrap();
        let b = linear(&[1.0], 0.0, 20, 0.01, 5).unwrap();
        let c = linear(&[1.0], 0.0, 20, 0.01, 6).unwrap();
        assert_eq!(a.labels(), b.labels());
        assert_ne!(a.labels(), c.labels());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(matches!(
            linear(&[], 0.0, 10, 0.1, 0),
            Err(Error::EmptyData(_))
        ));
        assert!(matches!(
            linear(&[1.0], 0.0, 0, 0.1, 0),
            Err(Error::EmptyData(_))
        ));
        assert!(matches!(
            linear(&[1.0], 0.0, 10, -1.0, 0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
