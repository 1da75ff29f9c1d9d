//! Dataset abstractions and mini-batch iteration.
//!
//! - **Dataset**: a fixed, indexable source of `(x, y)` pairs. `x` is a feature row of
//!   width `num_features()`, `y` a float label (a regression target or a class index).
//! - **BatchIter**: a restartable iterator over fixed-size batches. Each
//!   [`reset`](BatchIter::reset) starts a new pass, reshuffled when shuffling is enabled.
//!
//! # Example
//!
//! ```rust
//! use scratchnet::backend::CpuBackend;
//! use scratchnet::dataset::{BatchIter, InMemoryDataset, RemainderPolicy, Shuffle};
//!
//! let x = vec![vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![0.0, 1.0, 0.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! let mut iter =
//!     BatchIter::<CpuBackend, _>::new(&dataset, 2, RemainderPolicy::Keep, Shuffle::Off).unwrap();
//! let sizes: Vec<usize> = iter.by_ref().map(|b| b.unwrap().0.rows()).collect();
//! assert_eq!(sizes, vec![2, 1]);
//!
//! // exhausted until reset
//! assert!(iter.next().is_none());
//! iter.reset();
//! assert_eq!(iter.count(), 2);
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::error::{Error, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::marker::PhantomData;

pub mod idx;
pub mod memory;
pub mod synthetic;

pub use self::idx::{load_mnist, read_idx_images, read_idx_labels, IdxImages, Split};
pub use self::memory::InMemoryDataset;

/// A fixed-size, randomly accessible collection of labelled examples.
pub trait Dataset {
    /// Number of examples.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of every feature row.
    fn num_features(&self) -> usize;

    /// Gathers the examples at `indices`, in that order, as a `(len, num_features)` matrix
    /// and a label vector.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if any index is out of bounds.
    fn get_batch<B: Backend>(&self, indices: &[usize]) -> Result<(Tensor2D<B>, Tensor1D<B>)>;

    /// Sequential, non-shuffled batches that keep a smaller final batch. This is the
    /// iteration order used for evaluation passes.
    fn batches<B: Backend>(&self, batch_size: usize) -> Result<BatchIter<'_, B, Self>>
    where
        Self: Sized,
    {
        BatchIter::new(self, batch_size, RemainderPolicy::Keep, Shuffle::Off)
    }
}

/// What to do with the trailing examples when the dataset size is not a multiple of the
/// batch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemainderPolicy {
    /// Yield them as a final, smaller batch.
    #[default]
    Keep,
    /// Skip them for this pass.
    Drop,
}

/// Visiting order of a [`BatchIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shuffle {
    /// Always sequential.
    Off,
    /// Reshuffled at every [`BatchIter::reset`] from a generator seeded once.
    Seeded(u64),
}

impl Default for Shuffle {
    fn default() -> Self {
        Shuffle::Seeded(0)
    }
}

/// Restartable iterator over fixed-size batches of a [`Dataset`].
///
/// A fresh iterator walks the dataset in sequential order. Once a pass is exhausted the
/// iterator keeps returning `None` until [`reset`](Self::reset) is called.
pub struct BatchIter<'a, B: Backend, D: ?Sized> {
    dataset: &'a D,
    batch_size: usize,
    policy: RemainderPolicy,
    order: Vec<usize>,
    position: usize,
    rng: Option<StdRng>,
    _backend: PhantomData<B>,
}

impl<'a, B: Backend, D: Dataset> BatchIter<'a, B, D> {
    /// # Errors
    /// [`Error::InvalidParameter`] if `batch_size` is zero.
    pub fn new(
        dataset: &'a D,
        batch_size: usize,
        policy: RemainderPolicy,
        shuffle: Shuffle,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidParameter(
                "batch_size must be greater than zero".into(),
            ));
        }
        let rng = match shuffle {
            Shuffle::Off => None,
            Shuffle::Seeded(seed) => Some(StdRng::seed_from_u64(seed)),
        };
        Ok(Self {
            dataset,
            batch_size,
            policy,
            order: (0..dataset.len()).collect(),
            position: 0,
            rng,
            _backend: PhantomData,
        })
    }

    /// Starts a new pass: reshuffles the visiting order (if shuffling) and rewinds.
    pub fn reset(&mut self) {
        if let Some(rng) = self.rng.as_mut() {
            self.order.shuffle(rng);
        }
        self.position = 0;
    }

    /// Number of batches a full pass yields.
    pub fn num_batches(&self) -> usize {
        let n = self.order.len();
        match self.policy {
            RemainderPolicy::Keep => n.div_ceil(self.batch_size),
            RemainderPolicy::Drop => n / self.batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<B: Backend, D: Dataset> Iterator for BatchIter<'_, B, D> {
    type Item = Result<(Tensor2D<B>, Tensor1D<B>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len().saturating_sub(self.position);
        if remaining == 0 || (remaining < self.batch_size && self.policy == RemainderPolicy::Drop)
        {
            return None;
        }
        let end = self.position + remaining.min(self.batch_size);
        let indices = &self.order[self.position..end];
        self.position = end;
        Some(self.dataset.get_batch::<B>(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, NdarrayBackend};

    fn dataset(n: usize) -> InMemoryDataset {
        let x = (0..n).map(|i| vec![i as f32, -(i as f32)]).collect();
        let y = (0..n).map(|i| i as f32).collect();
        InMemoryDataset::new(x, y).unwrap()
    }

    fn labels_of(iter: &mut BatchIter<'_, CpuBackend, InMemoryDataset>) -> Vec<Vec<f64>> {
        iter.map(|b| b.unwrap().1.to_vec()).collect()
    }

    #[test]
    fn test_divisible_dataset_yields_n_over_b_batches() {
        let ds = dataset(12);
        let mut iter =
            BatchIter::<CpuBackend, _>::new(&ds, 4, RemainderPolicy::Keep, Shuffle::Seeded(1))
                .unwrap();
        iter.reset();
        assert_eq!(iter.num_batches(), 3);
        assert_eq!(iter.by_ref().count(), 3);
    }

    #[test]
    fn test_second_pass_without_reset_is_empty() {
        let ds = dataset(10);
        let mut iter =
            BatchIter::<CpuBackend, _>::new(&ds, 5, RemainderPolicy::Keep, Shuffle::Off).unwrap();
        assert_eq!(iter.by_ref().count(), 2);
        assert_eq!(iter.by_ref().count(), 0);
        iter.reset();
        assert_eq!(iter.by_ref().count(), 2);
    }

    #[test]
    fn test_remainder_policies() {
        let ds = dataset(10);
        let mut keep =
            BatchIter::<CpuBackend, _>::new(&ds, 4, RemainderPolicy::Keep, Shuffle::Off).unwrap();
        let sizes: Vec<usize> = keep.by_ref().map(|b| b.unwrap().0.rows()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(keep.num_batches(), 3);

        let mut drop =
            BatchIter::<CpuBackend, _>::new(&ds, 4, RemainderPolicy::Drop, Shuffle::Off).unwrap();
        let sizes: Vec<usize> = drop.by_ref().map(|b| b.unwrap().0.rows()).collect();
        assert_eq!(sizes, vec![4, 4]);
        assert_eq!(drop.num_batches(), 2);
    }

    #[test]
    fn test_batch_larger_than_dataset() {
        let ds = dataset(3);
        let mut keep =
            BatchIter::<NdarrayBackend, _>::new(&ds, 8, RemainderPolicy::Keep, Shuffle::Off)
                .unwrap();
        assert_eq!(keep.by_ref().count(), 1);
        let mut drop =
            BatchIter::<NdarrayBackend, _>::new(&ds, 8, RemainderPolicy::Drop, Shuffle::Off)
                .unwrap();
        assert_eq!(drop.by_ref().count(), 0);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        let ds = dataset(3);
        let err = ds.batches::<CpuBackend>(0).err().unwrap();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_fresh_iterator_is_sequential() {
        let ds = dataset(6);
        let mut iter =
            BatchIter::<CpuBackend, _>::new(&ds, 3, RemainderPolicy::Keep, Shuffle::Seeded(9))
                .unwrap();
        assert_eq!(
            labels_of(&mut iter),
            vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]]
        );
    }

    #[test]
    fn test_shuffled_epochs_cover_every_example_once() {
        let ds = dataset(50);
        let mut iter =
            BatchIter::<CpuBackend, _>::new(&ds, 7, RemainderPolicy::Keep, Shuffle::Seeded(42))
                .unwrap();

        let mut passes = Vec::new();
        for _ in 0..3 {
            iter.reset();
            let mut seen: Vec<f64> = labels_of(&mut iter).into_iter().flatten().collect();
            passes.push(seen.clone());
            seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
            assert_eq!(seen, (0..50).map(|i| i as f64).collect::<Vec<_>>());
        }
        assert_ne!(passes[0], passes[1], "order must change between epochs");
    }

    #[test]
    fn test_same_seed_same_order() {
        let ds = dataset(20);
        let run = || {
            let mut iter = BatchIter::<CpuBackend, _>::new(
                &ds,
                5,
                RemainderPolicy::Keep,
                Shuffle::Seeded(3),
            )
            .unwrap();
            iter.reset();
            labels_of(&mut iter)
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_rows_and_labels_stay_paired() {
        let ds = dataset(16);
        let mut iter =
            BatchIter::<NdarrayBackend, _>::new(&ds, 5, RemainderPolicy::Keep, Shuffle::Seeded(5))
                .unwrap();
        iter.reset();
        for batch in iter {
            let (x, y) = batch.unwrap();
            let x = x.to_vec();
            for (i, label) in y.to_vec().iter().enumerate() {
                assert_eq!(x[i * 2], *label);
                assert_eq!(x[i * 2 + 1], -*label);
            }
        }
    }
}
