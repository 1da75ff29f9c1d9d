use super::{class_index, Backend};

/// Reference backend on plain `Vec<f64>` buffers.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn row(&self, i: usize) -> &[f64] {
        &self.0[i * self.2..(i + 1) * self.2]
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&x| f(x)).collect(), self.1, self.2)
    }

    fn zip_map(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(
            (self.1, self.2),
            (other.1, other.2),
            "Element-wise op on mismatched shapes"
        );
        Self(
            self.0.iter().zip(&other.0).map(|(&a, &b)| f(a, b)).collect(),
            self.1,
            self.2,
        )
    }

    fn map_rows_with(&self, v: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(v.len(), self.1, "Column broadcast needs one value per row");
        let mut out = Vec::with_capacity(self.0.len());
        for (i, &vi) in v.iter().enumerate() {
            out.extend(self.row(i).iter().map(|&x| f(x, vi)));
        }
        Self(out, self.1, self.2)
    }
}

fn zip_1d(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    assert_eq!(a.len(), b.len(), "Element-wise op on mismatched lengths");
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data.into_iter().map(|x| x as f64).collect()
    }
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data.into_iter().map(|x| x as f64).collect(), rows, cols)
    }
    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Element-wise ops ---
    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        zip_1d(a, b, |x, y| x + y)
    }
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        zip_1d(a, b, |x, y| x - y)
    }
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        zip_1d(a, b, |x, y| x * y)
    }
    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x * s).collect()
    }
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_map(b, |x, y| x + y)
    }
    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_map(b, |x, y| x - y)
    }
    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_map(b, |x, y| x * y)
    }
    fn div_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        a.zip_map(b, |x, y| x / y)
    }
    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        t.map(|x| x * s)
    }
    fn exp_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.map(f64::exp)
    }
    fn log_2d(t: &Self::Tensor2D) -> Self::Tensor2D {
        t.map(f64::ln)
    }
    fn clamp_min_2d(t: &Self::Tensor2D, floor: &Self::Scalar) -> Self::Tensor2D {
        let floor = *floor;
        t.map(|x| if x < floor { floor } else { x })
    }

    // --- Reductions ---
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }
    fn sum_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.0.iter().sum::<f64>()
    }
    fn row_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        (0..t.1).map(|i| t.row(i).iter().sum()).collect()
    }
    fn row_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        (0..t.1)
            .map(|i| t.row(i).iter().copied().fold(f64::NEG_INFINITY, f64::max))
            .collect()
    }
    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut out = vec![0.0; t.2];
        for i in 0..t.1 {
            for (acc, &x) in out.iter_mut().zip(t.row(i)) {
                *acc += x;
            }
        }
        out
    }
    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize> {
        (0..t.1)
            .map(|i| {
                let mut best = 0;
                for (j, &x) in t.row(i).iter().enumerate() {
                    if x > t.row(i)[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    // --- Broadcasting ---
    fn broadcast_add_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(v.len(), t.2, "Row broadcast needs one value per column");
        let mut out = Vec::with_capacity(t.0.len());
        for i in 0..t.1 {
            out.extend(t.row(i).iter().zip(v).map(|(x, b)| x + b));
        }
        CpuTensor2D(out, t.1, t.2)
    }
    fn broadcast_sub_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows_with(v, |x, vi| x - vi)
    }
    fn broadcast_div_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows_with(v, |x, vi| x / vi)
    }

    // --- Linear algebra ---
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.2, x.len(), "matvec: matrix cols must equal vector length");
        (0..a.1)
            .map(|i| a.row(i).iter().zip(x).map(|(w, v)| w * v).sum())
            .collect()
    }
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(
            a.1,
            x.len(),
            "matvec_transposed: matrix rows must equal vector length"
        );
        let mut out = vec![0.0; a.2];
        for (i, &xi) in x.iter().enumerate() {
            for (acc, &w) in out.iter_mut().zip(a.row(i)) {
                *acc += w * xi;
            }
        }
        out
    }
    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(a.2, b.1, "matmul: inner dimensions differ");
        let (m, n) = (a.1, b.2);
        let mut out = vec![0.0; m * n];
        // i-k-j order keeps the inner loop on contiguous rows of `b`.
        for i in 0..m {
            let out_row = &mut out[i * n..(i + 1) * n];
            for (k, &aik) in a.row(i).iter().enumerate() {
                if aik == 0.0 {
                    continue;
                }
                for (o, &bkj) in out_row.iter_mut().zip(b.row(k)) {
                    *o += aik * bkj;
                }
            }
        }
        CpuTensor2D(out, m, n)
    }
    fn matmul_transposed_lhs(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(a.1, b.1, "matmul_transposed_lhs: row counts differ");
        let (m, n) = (a.2, b.2);
        let mut out = vec![0.0; m * n];
        for k in 0..a.1 {
            let b_row = b.row(k);
            for (i, &aki) in a.row(k).iter().enumerate() {
                if aki == 0.0 {
                    continue;
                }
                for (o, &bkj) in out[i * n..(i + 1) * n].iter_mut().zip(b_row) {
                    *o += aki * bkj;
                }
            }
        }
        CpuTensor2D(out, m, n)
    }

    // --- Access ---
    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }
    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.clone()
    }
    fn as_row_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        CpuTensor2D(t.clone(), 1, t.len())
    }
    fn row_2d(t: &Self::Tensor2D, i: usize) -> Self::Tensor1D {
        assert!(i < t.1, "row {} out of bounds for {} rows", i, t.1);
        t.row(i).to_vec()
    }
    fn one_hot_from_indices(indices: &Self::Tensor1D, num_classes: usize) -> Self::Tensor2D {
        let mut out = vec![0.0; indices.len() * num_classes];
        for (i, &label) in indices.iter().enumerate() {
            out[i * num_classes + class_index(label, num_classes)] = 1.0;
        }
        CpuTensor2D(out, indices.len(), num_classes)
    }
}
