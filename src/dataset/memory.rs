use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Dataset held in memory as a row-major feature buffer plus one label per row.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    features: Vec<f32>,
    labels: Vec<f32>,
    num_features: usize,
}

impl InMemoryDataset {
    /// Builds a dataset from one feature vector per example.
    ///
    /// # Errors
    /// - [`Error::EmptyData`] if there are no examples.
    /// - [`Error::InvalidShape`] if `x` and `y` differ in length or rows differ in width.
    pub fn new(x: Vec<Vec<f32>>, y: Vec<f32>) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::EmptyData("dataset has no examples".into()));
        }
        let num_features = x[0].len();
        if let Some(bad) = x.iter().position(|row| row.len() != num_features) {
            return Err(Error::InvalidShape {
                expected: format!("{} features per row", num_features),
                got: format!("{} features in row {}", x[bad].len(), bad),
            });
        }
        let features = x.into_iter().flatten().collect();
        Self::from_flat(features, num_features, y)
    }

    /// Builds a dataset from a row-major buffer of `labels.len() * num_features` values.
    ///
    /// # Errors
    /// - [`Error::EmptyData`] if there are no examples.
    /// - [`Error::InvalidShape`] if the buffer size does not match.
    pub fn from_flat(features: Vec<f32>, num_features: usize, labels: Vec<f32>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::EmptyData("dataset has no examples".into()));
        }
        if features.len() != labels.len() * num_features {
            return Err(Error::InvalidShape {
                expected: format!(
                    "{} feature values ({} examples x {})",
                    labels.len() * num_features,
                    labels.len(),
                    num_features
                ),
                got: format!("{} feature values", features.len()),
            });
        }
        Ok(Self {
            features,
            labels,
            num_features,
        })
    }

    pub fn labels(&self) -> &[f32] {
        &self.labels
    }

    /// Feature row `i`.
    pub fn row(&self, i: usize) -> Option<&[f32]> {
        (i < self.labels.len())
            .then(|| &self.features[i * self.num_features..(i + 1) * self.num_features])
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn get_batch<B: Backend>(&self, indices: &[usize]) -> Result<(Tensor2D<B>, Tensor1D<B>)> {
        let mut x = Vec::with_capacity(indices.len() * self.num_features);
        let mut y = Vec::with_capacity(indices.len());
        for &i in indices {
            let row = self.row(i).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "index {} out of bounds for dataset of {} examples",
                    i,
                    self.len()
                ))
            })?;
            x.extend_from_slice(row);
            y.push(self.labels[i]);
        }
        Ok((
            Tensor2D::new(x, indices.len(), self.num_features),
            Tensor1D::new(y),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_new_validates_input() {
        assert!(matches!(
            InMemoryDataset::new(vec![], vec![]),
            Err(Error::EmptyData(_))
        ));
        assert!(matches!(
            InMemoryDataset::new(vec![vec![1.0, 2.0], vec![3.0]], vec![0.0, 1.0]),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            InMemoryDataset::new(vec![vec![1.0], vec![3.0]], vec![0.0]),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_get_batch_gathers_rows_in_order() {
        let ds = InMemoryDataset::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
            vec![10.0, 20.0, 30.0],
        )
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.num_features(), 2);

        let (x, y) = ds.get_batch::<CpuBackend>(&[2, 0]).unwrap();
        assert_eq!(x.shape(), (2, 2));
        assert_eq!(x.to_vec(), vec![5.0, 6.0, 1.0, 2.0]);
        assert_eq!(y.to_vec(), vec![30.0, 10.0]);
    }

    #[test]
    fn test_get_batch_out_of_bounds() {
        let ds = InMemoryDataset::from_flat(vec![1.0, 2.0], 1, vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            ds.get_batch::<CpuBackend>(&[0, 2]),
            Err(Error::InvalidParameter(_))
        ));
    }
}
