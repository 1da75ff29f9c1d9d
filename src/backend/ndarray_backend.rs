use super::{class_index, Backend};
use ndarray::{Array1, Array2, Axis};

#[derive(Clone, Debug, Copy)]
pub struct NdarrayBackend;

#[derive(Debug, Clone)]
pub struct NdarrayTensor2D(pub Array2<f64>);

fn assert_same_dim(a: &NdarrayTensor2D, b: &NdarrayTensor2D) {
    assert_eq!(
        a.0.dim(),
        b.0.dim(),
        "Element-wise op on mismatched shapes"
    );
}

fn assert_same_len(a: &Array1<f64>, b: &Array1<f64>) {
    assert_eq!(a.len(), b.len(), "Element-wise op on mismatched lengths");
}

impl Backend for NdarrayBackend {
    type Scalar = f64;
    type Tensor1D = Array1<f64>;
    type Tensor2D = NdarrayTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        NdarrayTensor2D(Array2::zeros((rows, cols)))
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        Array1::from_iter(data.into_iter().map(|x| x as f64))
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        NdarrayTensor2D(Array2::from_shape_fn((rows, cols), |(i, j)| {
            data[i * cols + j] as f64
        }))
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Element-wise binary ops (1D) ---

    fn add_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_same_len(a, b);
        a + b
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_same_len(a, b);
        a - b
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_same_len(a, b);
        a * b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.mapv(|x| x * *s)
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.mapv(|x| x + *s)
    }

    // --- 2D ops ---

    fn add_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_same_dim(a, b);
        NdarrayTensor2D(&a.0 + &b.0)
    }

    fn sub_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_same_dim(a, b);
        NdarrayTensor2D(&a.0 - &b.0)
    }

    fn mul_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_same_dim(a, b);
        NdarrayTensor2D(&a.0 * &b.0)
    }

    fn div_2d(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_same_dim(a, b);
        NdarrayTensor2D(&a.0 / &b.0)
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        NdarrayTensor2D(&t.0 * *s)
    }

    fn exp_2d(x: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(x.0.mapv(f64::exp))
    }

    fn log_2d(x: &Self::Tensor2D) -> Self::Tensor2D {
        NdarrayTensor2D(x.0.mapv(f64::ln))
    }

    fn clamp_min_2d(t: &Self::Tensor2D, floor: &Self::Scalar) -> Self::Tensor2D {
        let floor = *floor;
        NdarrayTensor2D(t.0.mapv(|x| if x < floor { floor } else { x }))
    }

    // --- Reductions ---

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum()
    }

    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.sum() / t.len() as f64
    }

    fn sum_all_2d(t: &Self::Tensor2D) -> Self::Scalar {
        t.0.sum()
    }

    fn row_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.sum_axis(Axis(1))
    }

    fn row_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.map_axis(Axis(1), |row| {
            row.fold(f64::NEG_INFINITY, |acc, &x| acc.max(x))
        })
    }

    fn col_sum_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.0.sum_axis(Axis(0))
    }

    fn argmax_rows_2d(t: &Self::Tensor2D) -> Vec<usize> {
        t.0.outer_iter()
            .map(|row| {
                let mut best = 0;
                for (j, &x) in row.iter().enumerate() {
                    if x > row[best] {
                        best = j;
                    }
                }
                best
            })
            .collect()
    }

    // --- Broadcasting ---

    fn broadcast_add_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(
            v.len(),
            t.0.ncols(),
            "Row broadcast needs one value per column"
        );
        NdarrayTensor2D(&t.0 + v)
    }

    fn broadcast_sub_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(v.len(), t.0.nrows(), "Column broadcast needs one value per row");
        NdarrayTensor2D(&t.0 - &v.view().insert_axis(Axis(1)))
    }

    fn broadcast_div_cols(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        assert_eq!(v.len(), t.0.nrows(), "Column broadcast needs one value per row");
        NdarrayTensor2D(&t.0 / &v.view().insert_axis(Axis(1)))
    }

    // --- Linear algebra ---

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(
            a.0.ncols(),
            x.len(),
            "matvec: matrix cols must equal vector length"
        );
        a.0.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(
            a.0.nrows(),
            x.len(),
            "matvec_transposed: matrix rows must equal vector length"
        );
        a.0.t().dot(x)
    }

    fn matmul(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(a.0.ncols(), b.0.nrows(), "matmul: inner dimensions differ");
        NdarrayTensor2D(a.0.dot(&b.0))
    }

    fn matmul_transposed_lhs(a: &Self::Tensor2D, b: &Self::Tensor2D) -> Self::Tensor2D {
        assert_eq!(
            a.0.nrows(),
            b.0.nrows(),
            "matmul_transposed_lhs: row counts differ"
        );
        NdarrayTensor2D(a.0.t().dot(&b.0))
    }

    // --- Access ---

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.0.dim()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.0.iter().copied().collect()
    }

    fn as_row_2d(t: &Self::Tensor1D) -> Self::Tensor2D {
        NdarrayTensor2D(t.view().insert_axis(Axis(0)).to_owned())
    }

    fn row_2d(t: &Self::Tensor2D, i: usize) -> Self::Tensor1D {
        assert!(i < t.0.nrows(), "row {} out of bounds for {} rows", i, t.0.nrows());
        t.0.row(i).to_owned()
    }

    fn one_hot_from_indices(indices: &Self::Tensor1D, num_classes: usize) -> Self::Tensor2D {
        let mut out = Array2::zeros((indices.len(), num_classes));
        for (i, &label) in indices.iter().enumerate() {
            out[[i, class_index(label, num_classes)]] = 1.0;
        }
        NdarrayTensor2D(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_to_vec_2d_is_row_major_after_transpose() {
        // a.t().dot() produces a standard-layout result, but a transposed view copied
        // into a new tensor must still flatten row by row.
        let a = NdarrayTensor2D(Array2::from_shape_fn((2, 3), |(i, j)| (i * 3 + j) as f64));
        let t = NdarrayTensor2D(a.0.t().to_owned());
        assert_eq!(NdarrayBackend::to_vec_2d(&t), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_matches_cpu_backend_on_matmul() {
        let data: Vec<f32> = (0..12).map(|x| x as f32 * 0.5 - 2.0).collect();
        let a_nd = NdarrayBackend::from_vec_2d(data.clone(), 3, 4);
        let b_nd = NdarrayBackend::from_vec_2d(data.clone(), 4, 3);
        let a_cpu = CpuBackend::from_vec_2d(data.clone(), 3, 4);
        let b_cpu = CpuBackend::from_vec_2d(data, 4, 3);

        let nd = NdarrayBackend::to_vec_2d(&NdarrayBackend::matmul(&a_nd, &b_nd));
        let cpu = CpuBackend::to_vec_2d(&CpuBackend::matmul(&a_cpu, &b_cpu));
        for (x, y) in nd.iter().zip(&cpu) {
            assert!((x - y).abs() < 1e-12);
        }

        let nd_t = NdarrayBackend::to_vec_2d(&NdarrayBackend::matmul_transposed_lhs(&a_nd, &a_nd));
        let cpu_t = CpuBackend::to_vec_2d(&CpuBackend::matmul_transposed_lhs(&a_cpu, &a_cpu));
        assert_eq!(nd_t.len(), 16);
        for (x, y) in nd_t.iter().zip(&cpu_t) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "mismatched lengths")]
    fn test_length_one_vectors_do_not_broadcast() {
        let a = Array1::from(vec![1.0]);
        let b = Array1::from(vec![1.0, 2.0, 3.0]);
        let _ = NdarrayBackend::add_1d(&a, &b);
    }
}
