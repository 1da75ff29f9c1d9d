use super::scalar::Scalar;
use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 2D tensor, one example per row when holding a batch.
#[derive(Clone, Debug)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Builds a tensor from row-major `f32` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self::from_raw(B::from_vec_2d(data, rows, cols))
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_raw(B::zeros_2d(rows, cols))
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::from_raw(B::add_2d(&self.data, &other.data))
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_2d(&self.data, &other.data))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self::from_raw(B::mul_2d(&self.data, &other.data))
    }

    pub fn div(&self, other: &Self) -> Self {
        Self::from_raw(B::div_2d(&self.data, &other.data))
    }

    pub fn scale(&self, a: &Scalar<B>) -> Self {
        Self::from_raw(B::mul_scalar_2d(&self.data, &a.data))
    }

    pub fn exp(&self) -> Self {
        Self::from_raw(B::exp_2d(&self.data))
    }

    pub fn log(&self) -> Self {
        Self::from_raw(B::log_2d(&self.data))
    }

    /// Element-wise `max(self, floor)`.
    pub fn clamp_min(&self, floor: f64) -> Self {
        Self::from_raw(B::clamp_min_2d(&self.data, &B::scalar_f64(floor)))
    }

    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_2d(&self.data),
            backend: PhantomData,
        }
    }

    pub fn row_sum(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::row_sum_2d(&self.data))
    }

    pub fn row_max(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::row_max_2d(&self.data))
    }

    pub fn col_sum(&self) -> Tensor1D<B> {
        Tensor1D::from_raw(B::col_sum_2d(&self.data))
    }

    /// Column index of the largest entry of each row.
    pub fn argmax_rows(&self) -> Vec<usize> {
        B::argmax_rows_2d(&self.data)
    }

    /// Adds `v` (length `cols`) to every row.
    pub fn add_row_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_add_rows(&self.data, &v.data))
    }

    /// Subtracts `v[i]` from every entry of row `i`.
    pub fn sub_column_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_sub_cols(&self.data, &v.data))
    }

    /// Divides every entry of row `i` by `v[i]`.
    pub fn div_column_vector(&self, v: &Tensor1D<B>) -> Self {
        Self::from_raw(B::broadcast_div_cols(&self.data, &v.data))
    }

    /// `self · x`
    pub fn dot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &other.data))
    }

    /// `selfᵀ · x`
    pub fn tdot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec_transposed(&self.data, &other.data))
    }

    /// `self · other`
    pub fn matmul(&self, other: &Self) -> Self {
        Self::from_raw(B::matmul(&self.data, &other.data))
    }

    /// `selfᵀ · other`
    pub fn tmatmul(&self, other: &Self) -> Self {
        Self::from_raw(B::matmul_transposed_lhs(&self.data, &other.data))
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Tensor1D<B> {
        Tensor1D::from_raw(B::row_2d(&self.data, i))
    }

    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    pub fn rows(&self) -> usize {
        self.shape().0
    }

    pub fn cols(&self) -> usize {
        self.shape().1
    }

    /// Row-major copy of the contents.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CpuBackend, NdarrayBackend};

    fn matvec_ops<B: Backend>() {
        // A = [[1, 2],
        //      [3, 4]]
        let a = Tensor2D::<B>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        let x = Tensor1D::<B>::new(vec![1.0, 0.0]);

        assert_eq!(a.dot(&x).to_vec(), vec![1.0, 3.0]);
        assert_eq!(a.tdot(&x).to_vec(), vec![1.0, 2.0]);
    }

    fn matmul_ops<B: Backend>() {
        // A is 2x3, B is 3x2
        let a = Tensor2D::<B>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
        let b = Tensor2D::<B>::new(vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0], 3, 2);

        let c = a.matmul(&b);
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.to_vec(), vec![58.0, 64.0, 139.0, 154.0]);

        // Aᵀ·A is 3x3
        let ata = a.tmatmul(&a);
        assert_eq!(ata.shape(), (3, 3));
        assert_eq!(
            ata.to_vec(),
            vec![17.0, 22.0, 27.0, 22.0, 29.0, 36.0, 27.0, 36.0, 45.0]
        );
    }

    fn reductions<B: Backend>() {
        let t = Tensor2D::<B>::new(vec![1.0, 5.0, 2.0, 7.0, 0.0, 3.0], 2, 3);

        assert_eq!(t.sum().to_f64(), 18.0);
        assert_eq!(t.row_sum().to_vec(), vec![8.0, 10.0]);
        assert_eq!(t.row_max().to_vec(), vec![5.0, 7.0]);
        assert_eq!(t.col_sum().to_vec(), vec![8.0, 5.0, 5.0]);
        assert_eq!(t.argmax_rows(), vec![1, 0]);
    }

    fn broadcasts<B: Backend>() {
        let t = Tensor2D::<B>::new(vec![2.0, 4.0, 6.0, 8.0], 2, 2);
        let row = Tensor1D::<B>::new(vec![1.0, -1.0]);
        let col = Tensor1D::<B>::new(vec![2.0, 4.0]);

        assert_eq!(t.add_row_vector(&row).to_vec(), vec![3.0, 3.0, 7.0, 7.0]);
        assert_eq!(t.sub_column_vector(&col).to_vec(), vec![0.0, 2.0, 2.0, 4.0]);
        assert_eq!(t.div_column_vector(&col).to_vec(), vec![1.0, 2.0, 1.5, 2.0]);
    }

    fn elementwise<B: Backend>() {
        let a = Tensor2D::<B>::new(vec![0.0, 1.0, -2.0, 4.0], 2, 2);
        let b = Tensor2D::<B>::new(vec![1.0, 2.0, 4.0, 8.0], 2, 2);

        assert_eq!(a.add(&b).to_vec(), vec![1.0, 3.0, 2.0, 12.0]);
        assert_eq!(a.sub(&b).to_vec(), vec![-1.0, -1.0, -6.0, -4.0]);
        assert_eq!(a.mul(&b).to_vec(), vec![0.0, 2.0, -8.0, 32.0]);
        assert_eq!(a.div(&b).to_vec(), vec![0.0, 0.5, -0.5, 0.5]);
        assert_eq!(a.scale(&Scalar::new(2.0)).to_vec(), vec![0.0, 2.0, -4.0, 8.0]);
        assert_eq!(a.clamp_min(0.5).to_vec(), vec![0.5, 1.0, 0.5, 4.0]);

        let e = a.exp().to_vec();
        assert!((e[1] - std::f64::consts::E).abs() < 1e-12);
        let l = b.log().to_vec();
        assert!((l[3] - 8f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_tensor2d_cpu() {
        matvec_ops::<CpuBackend>();
        matmul_ops::<CpuBackend>();
        reductions::<CpuBackend>();
        broadcasts::<CpuBackend>();
        elementwise::<CpuBackend>();
    }

    #[test]
    fn test_tensor2d_ndarray() {
        matvec_ops::<NdarrayBackend>();
        matmul_ops::<NdarrayBackend>();
        reductions::<NdarrayBackend>();
        broadcasts::<NdarrayBackend>();
        elementwise::<NdarrayBackend>();
    }

    #[test]
    fn test_tensor2d_shape() {
        let t = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0], 3, 1);
        assert_eq!(t.shape(), (3, 1));
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 1);

        let v = Tensor1D::<NdarrayBackend>::new(vec![1.0, 2.0]);
        let r = v.as_row();
        assert_eq!(r.shape(), (1, 2));
        assert_eq!(r.row(0).to_vec(), vec![1.0, 2.0]);
        assert_eq!(t.row(2).to_vec(), vec![3.0]);

        let empty = Tensor2D::<NdarrayBackend>::zeros(0, 5);
        assert_eq!(empty.shape(), (0, 5));
    }

    #[test]
    #[should_panic]
    fn test_mismatched_matmul_panics() {
        let a = Tensor2D::<CpuBackend>::zeros(2, 3);
        let b = Tensor2D::<CpuBackend>::zeros(2, 3);
        let _ = a.matmul(&b);
    }
}
