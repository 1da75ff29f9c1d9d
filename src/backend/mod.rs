//! # Backend Abstraction
//!
//! This module provides a trait-based abstraction over the dense tensor kernels used by
//! the models, so the same training code runs on a pure-Rust implementation or on top of
//! `ndarray`.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations the forward/backward passes need.
//! - **Zero-cost generics**: backend selection happens at compile time via type parameters.
//! - **Typed wrappers**: [`Tensor1D`], [`Tensor2D`] and [`Scalar`] carry the backend as a
//!   phantom type so values from different backends cannot be mixed.
//!
//! ## Available Backends
//!
//! | Backend          | Storage                | Use Case                          |
//! |------------------|------------------------|-----------------------------------|
//! | `CpuBackend`     | `Vec<f64>`, row-major  | Reference pure-Rust implementation|
//! | `NdarrayBackend` | `ndarray::Array{1,2}`  | Faster matmul on larger batches   |
//!
//! ## Example
//!
//! ```rust
//! use scratchnet::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
//! let w: Tensor1D<CpuBackend> = Tensor1D::new(vec![0.5, 0.5]);
//!
//! let y = x.dot(&w);
//! assert_eq!(y.to_vec(), vec![1.5, 3.5]);
//! ```

pub mod cpu;
pub use cpu::{CpuBackend, CpuTensor2D};

mod ndarray_backend;
/// Backend backed by the `ndarray` crate.
pub use ndarray_backend::{NdarrayBackend, NdarrayTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the kernels operating on it.
///
/// # Shape conventions
///
/// - 2D tensors are `(rows, cols)`; a batch of examples is one example per row.
/// - "row broadcast" applies a `(cols,)` vector to every row.
/// - "column broadcast" applies a `(rows,)` vector, entry `i` to every element of row `i`.
///
/// # Panics
///
/// Every binary kernel asserts that its operands have compatible shapes and panics on a
/// mismatch. Callers that accept user data validate shapes before reaching the backend.
pub trait Backend: Clone + Copy + std::fmt::Debug + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync + std::fmt::Debug;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync + std::fmt::Debug;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Element-wise operations (1D) ---

    /// Element-wise addition of two 1D tensors.
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise multiplication of two 1D tensors.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    // --- Element-wise operations (2D) ---

    /// Element-wise addition of two 2D tensors.
    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise subtraction of two 2D tensors.
    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise multiplication of two 2D tensors.
    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise division of two 2D tensors.
    fn div_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Multiplies each element of 2D tensor by a scalar.
    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    /// Element-wise exponential function.
    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise natural logarithm.
    fn log_2d(t: &Self::Tensor2D) -> Self::Tensor2D;

    /// Element-wise `max(t, floor)`.
    fn clamp_min_2d(t: &Self::Tensor2D, floor: &Self::Scalar) -> Self::Tensor2D;

    // --- Reductions ---

    /// Sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Arithmetic mean of all elements in a 1D tensor.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Sum of all elements in a 2D tensor.
    fn sum_all_2d(t: &Self::Tensor2D) -> Self::Scalar;

    /// Sum of each row; returns a `(rows,)` tensor.
    fn row_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Maximum of each row; returns a `(rows,)` tensor.
    fn row_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Sum of each column; returns a `(cols,)` tensor.
    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Index of the maximum of each row (first occurrence on ties).
    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize>;

    // --- Broadcasting ---

    /// `result[i, j] = t[i, j] + v[j]`.
    fn broadcast_add_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `result[i, j] = t[i, j] - v[i]`.
    fn broadcast_sub_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `result[i, j] = t[i, j] / v[i]`.
    fn broadcast_div_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Linear algebra ---

    /// Matrix-vector product `A · x`, `(m × n) · (n,) -> (m,)`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Transposed matrix-vector product `Aᵀ · x`, `(m × n)ᵀ · (m,) -> (n,)`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Matrix product `A · B`, `(m × k) · (k × n) -> (m × n)`.
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    /// Transposed-left matrix product `Aᵀ · B`, `(k × m)ᵀ · (k × n) -> (m × n)`.
    fn matmul_transposed_lhs(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D;

    // --- Data access ---

    /// Returns `(rows, cols)`.
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Copies a 1D tensor to host `f64` values.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Copies a 2D tensor to host `f64` values in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    /// Views a 1D tensor as a `(1, len)` matrix.
    fn as_row_2d(t: &Self::Tensor1D) -> Self::Tensor2D;

    /// Copies row `i` out of a 2D tensor.
    ///
    /// # Panics
    /// If `i >= rows`.
    fn row_2d(t: &Self::Tensor2D, i: usize) -> Self::Tensor1D;

    /// Builds a `(len, num_classes)` one-hot matrix from class indices stored as floats.
    ///
    /// # Panics
    /// If any index is negative, fractional or `>= num_classes`.
    fn one_hot_from_indices(indices: &Self::Tensor1D, num_classes: usize) -> Self::Tensor2D;
}

/// Converts a float-encoded class label into an index, panicking on invalid values.
pub(crate) fn class_index(value: f64, num_classes: usize) -> usize {
    assert!(
        value >= 0.0 && value.fract() == 0.0 && (value as usize) < num_classes,
        "label {} is not a class index in 0..{}",
        value,
        num_classes
    );
    value as usize
}
