//! Stateless forward functions shared by the models.
//!
//! Each function is pure: it reads its inputs and returns a new tensor.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};

/// Linear regression forward pass: `ŷ = X·w + b`.
///
/// # Panics
/// If `x.cols() != w.len()`.
///
/// # Example
/// ```
/// use scratchnet::backend::{CpuBackend, Scalar, Tensor1D, Tensor2D};
/// use scratchnet::functional::linear;
///
/// let x = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
/// let w = Tensor1D::new(vec![2.0, -1.0]);
/// let y = linear(&x, &w, &Scalar::new(0.5));
/// assert_eq!(y.to_vec(), vec![0.5, 2.5]);
/// ```
pub fn linear<B: Backend>(x: &Tensor2D<B>, w: &Tensor1D<B>, b: &Scalar<B>) -> Tensor1D<B> {
    x.dot(w).add_scalar(b)
}

/// Affine map producing per-class scores: `Z = X·W + b`, with `b` added to every row.
///
/// # Panics
/// If `x.cols() != w.rows()` or `b.len() != w.cols()`.
pub fn affine<B: Backend>(x: &Tensor2D<B>, w: &Tensor2D<B>, b: &Tensor1D<B>) -> Tensor2D<B> {
    x.matmul(w).add_row_vector(b)
}

/// Row-wise softmax.
///
/// The row maximum is subtracted before exponentiation, so large scores cannot overflow.
/// Every output row is non-negative and sums to 1, and adding a constant to a row of `z`
/// leaves that row's output unchanged.
///
/// # Example
/// ```
/// use scratchnet::backend::{CpuBackend, Tensor2D};
/// use scratchnet::functional::softmax;
///
/// let z = Tensor2D::<CpuBackend>::new(vec![1000.0, 1000.0, 0.0, 0.0], 2, 2);
/// let p = softmax(&z).to_vec();
/// assert!(p.iter().all(|v| (v - 0.5).abs() < 1e-12));
/// ```
pub fn softmax<B: Backend>(z: &Tensor2D<B>) -> Tensor2D<B> {
    let shifted = z.sub_column_vector(&z.row_max());
    let exp = shifted.exp();
    let partition = exp.row_sum();
    exp.div_column_vector(&partition)
}

/// Full softmax-regression forward pass: `softmax(X·W + b)`.
pub fn softmax_regression<B: Backend>(
    x: &Tensor2D<B>,
    w: &Tensor2D<B>,
    b: &Tensor1D<B>,
) -> Tensor2D<B> {
    softmax(&affine(x, w, b))
}
