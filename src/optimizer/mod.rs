use crate::backend::{Backend, Scalar};
use crate::model::ParamOps;

/// Trait for gradient-based optimizers.
///
/// Training logic (`Trainer`) is decoupled from the update rule: any model whose parameter
/// structure implements [`ParamOps`] can be paired with any optimizer.
///
/// # Example
/// ```rust
/// use scratchnet::backend::{CpuBackend, Scalar, Tensor1D};
/// use scratchnet::model::LinearParams;
/// use scratchnet::optimizer::{Optimizer, SGD};
///
/// let params = LinearParams {
///     weights: Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]),
///     bias: Scalar::new(0.5),
/// };
/// let grads = LinearParams {
///     weights: Tensor1D::new(vec![10.0, -10.0]),
///     bias: Scalar::new(1.0),
/// };
/// let updated = SGD::<CpuBackend>::new(0.1).step(&params, &grads);
/// assert_eq!(updated.weights.to_vec(), vec![0.0, 3.0]);
/// assert!((updated.bias.to_f64() - 0.4).abs() < 1e-12);
/// ```
pub trait Optimizer<B: Backend, P> {
    /// Returns updated parameters. Neither input is mutated.
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain stochastic gradient descent: `θ ← θ − η·∇θ`.
///
/// No momentum, no adaptive scaling, no weight decay.
#[derive(Clone, Debug)]
pub struct SGD<B: Backend> {
    lr: Scalar<B>,
}

impl<B: Backend> SGD<B> {
    pub fn new(lr: f64) -> Self {
        Self { lr: Scalar::new(lr) }
    }

    pub fn learning_rate(&self) -> f64 {
        self.lr.to_f64()
    }
}

impl<B: Backend, P: ParamOps<B>> Optimizer<B, P> for SGD<B> {
    fn step(&self, params: &P, grads: &P) -> P {
        let neg_lr = Scalar::<B>::new(0.0) - self.lr;
        params.add(&grads.scale(&neg_lr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{NdarrayBackend, Tensor1D, Tensor2D};
    use crate::model::SoftmaxParams;

    #[test]
    fn test_sgd_on_softmax_params() {
        let params = SoftmaxParams {
            weights: Tensor2D::<NdarrayBackend>::new(vec![1.0, 1.0, 1.0, 1.0], 2, 2),
            bias: Tensor1D::new(vec![0.0, 0.0]),
        };
        let grads = SoftmaxParams {
            weights: Tensor2D::new(vec![1.0, -1.0, 2.0, 0.0], 2, 2),
            bias: Tensor1D::new(vec![4.0, -4.0]),
        };

        let sgd = SGD::<NdarrayBackend>::new(0.5);
        let updated = sgd.step(&params, &grads);
        assert_eq!(updated.weights.to_vec(), vec![0.5, 1.5, 0.0, 1.0]);
        assert_eq!(updated.bias.to_vec(), vec![-2.0, 2.0]);
        // inputs untouched
        assert_eq!(params.weights.to_vec(), vec![1.0; 4]);
    }

    #[test]
    fn test_zero_learning_rate_is_identity() {
        let params = SoftmaxParams {
            weights: Tensor2D::<NdarrayBackend>::new(vec![0.3, -0.7], 1, 2),
            bias: Tensor1D::new(vec![0.1, 0.2]),
        };
        let updated = SGD::<NdarrayBackend>::new(0.0).step(&params, &params);
        assert_eq!(updated.weights.to_vec(), params.weights.to_vec());
        assert_eq!(updated.bias.to_vec(), params.bias.to_vec());
        assert_eq!(SGD::<NdarrayBackend>::new(0.03).learning_rate(), 0.03);
    }
}
