use super::scalar::Scalar;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D representation (`B::Tensor1D`) and carries the backend as a
/// phantom type, so tensors from different backends cannot be mixed.
///
/// ```compile_fail
/// use scratchnet::backend::{CpuBackend, NdarrayBackend, Tensor1D};
///
/// let cpu: Tensor1D<CpuBackend> = Tensor1D::zeros(3);
/// let nd: Tensor1D<NdarrayBackend> = Tensor1D::zeros(3);
/// let _ = cpu.sub(&nd);
/// ```
///
/// # Precision semantics
/// - Constructors accept `Vec<f32>`, matching the precision of the loaded datasets.
/// - Values are stored and computed in the backend's native precision (`f64`).
/// - [`Tensor1D::to_vec`] returns `Vec<f64>`.
///
/// # Example
/// ```
/// use scratchnet::backend::{CpuBackend, Scalar, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0f32, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
///
/// let y = x.scale(&Scalar::<CpuBackend>::new(2.0));
/// assert_eq!(y.to_vec(), vec![2.0, 4.0, 6.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Creates a new 1D tensor from `f32` values.
    ///
    /// # Example
    /// ```
    /// use scratchnet::backend::{CpuBackend, Tensor1D};
    ///
    /// let t: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0f32, 2.5, 3.75]);
    /// assert_eq!(t.to_vec(), vec![1.0, 2.5, 3.75]);
    /// ```
    pub fn new(data: Vec<f32>) -> Self {
        Self::from_raw(B::from_vec_1d(data))
    }

    /// Creates a 1D tensor filled with zeros.
    pub fn zeros(len: usize) -> Self {
        Self::from_raw(B::zeros_1d(len))
    }

    /// Element-wise addition: `self + other`.
    ///
    /// # Panics
    /// If the tensors have different lengths.
    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_1d(&self.data, &other.data))
    }

    /// Element-wise subtraction: `self - other`.
    ///
    /// # Panics
    /// If the tensors have different lengths.
    ///
    /// # Example
    /// ```
    /// use scratchnet::backend::{CpuBackend, Tensor1D};
    ///
    /// let a = Tensor1D::<CpuBackend>::new(vec![5.0f32, 7.0, 9.0]);
    /// let b = Tensor1D::<CpuBackend>::new(vec![2.0f32, 3.0, 4.0]);
    /// assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0, 5.0]);
    /// ```
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Element-wise (Hadamard) product.
    ///
    /// # Panics
    /// If the tensors have different lengths.
    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_1d(&self.data, &other.data))
    }

    /// Multiplies each element by a scalar.
    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, &a.data))
    }

    /// Adds a scalar to each element.
    ///
    /// # Example
    /// ```
    /// use scratchnet::backend::{CpuBackend, Scalar, Tensor1D};
    ///
    /// let t = Tensor1D::<CpuBackend>::new(vec![1.0f32, 2.0, 3.0]);
    /// let shifted = t.add_scalar(&Scalar::new(10.0));
    /// assert_eq!(shifted.to_vec(), vec![11.0, 12.0, 13.0]);
    /// ```
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::add_scalar_1d(&self.data, &a.data))
    }

    /// Sum of all elements.
    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Arithmetic mean of all elements.
    ///
    /// # Panics
    /// The result is NaN for an empty tensor; callers never reduce empty batches.
    ///
    /// # Example
    /// ```
    /// use scratchnet::backend::{CpuBackend, Tensor1D};
    ///
    /// let t = Tensor1D::<CpuBackend>::new(vec![1.0f32, 2.0, 3.0, 4.0]);
    /// assert!((t.mean().to_f64() - 2.5).abs() < 1e-12);
    /// ```
    pub fn mean(&self) -> Scalar<B> {
        Scalar {
            data: B::mean_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Inner product `Σᵢ aᵢ·bᵢ`.
    ///
    /// # Panics
    /// If the tensors have different lengths.
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        let prod = B::mul_1d(&self.data, &other.data);
        Scalar {
            data: B::sum_all_1d(&prod),
            backend: PhantomData,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Interprets the elements as class indices and expands them into a
    /// `(len, num_classes)` one-hot matrix.
    ///
    /// # Panics
    /// If any element is not an integer in `0..num_classes`.
    ///
    /// # Example
    /// ```
    /// use scratchnet::backend::{CpuBackend, Tensor1D};
    ///
    /// let labels = Tensor1D::<CpuBackend>::new(vec![2.0f32, 0.0]);
    /// let y = labels.one_hot(3);
    /// assert_eq!(y.shape(), (2, 3));
    /// assert_eq!(y.to_vec(), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    /// ```
    pub fn one_hot(&self, num_classes: usize) -> super::Tensor2D<B> {
        super::Tensor2D::from_raw(B::one_hot_from_indices(&self.data, num_classes))
    }

    /// The tensor as a single-row matrix.
    pub fn as_row(&self) -> super::Tensor2D<B> {
        super::Tensor2D::from_raw(B::as_row_2d(&self.data))
    }

    /// Copies the tensor to a host `Vec<f64>`.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }
}
