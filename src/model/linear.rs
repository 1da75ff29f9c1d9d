use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::Result;
use crate::functional;
use crate::model::{Fitted, Init, InferenceModel, ParamOps, TrainableModel, Unfitted};
use std::marker::PhantomData;

/// Parameters of `ŷ = X·w + b`.
#[derive(Clone, Debug)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

impl<B: Backend> ParamOps<B> for LinearParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: &Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(scalar),
            bias: self.bias * *scalar,
        }
    }
}

/// Linear regression model with a single output.
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearRegression<B> {
    /// Zero-initialised model over `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        Self::from_params(LinearParams {
            weights: Tensor1D::zeros(n_features),
            bias: Scalar::new(0.),
        })
    }

    /// Model whose weights are drawn from `init`; the bias starts at zero.
    pub fn with_init(n_features: usize, init: Init) -> Result<Self> {
        Ok(Self::from_params(LinearParams {
            weights: Tensor1D::new(init.sample(n_features)?),
            bias: Scalar::new(0.),
        }))
    }

    pub fn from_params(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &LinearParams<B> {
        &self.params
    }

    pub fn weights(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn bias(&self) -> f64 {
        self.params.bias.to_f64()
    }
}

impl<B: Backend> TrainableModel<B> for LinearModel<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor1D<B>;
    type Params = LinearParams<B>;
    type Gradients = LinearParams<B>;
    type Output = LinearModel<B, Fitted>;

    fn input_dim(&self) -> usize {
        self.params.weights.len()
    }

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        functional::linear(x, &self.params.weights, &self.params.bias)
    }

    // ∂L/∂w = Xᵀ·g, ∂L/∂b = Σ g
    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.tdot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, new_params: Self::Params) {
        self.params = new_params;
    }

    fn into_fitted(self) -> Self::Output {
        LinearModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = Scalar<B>;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor1D<B>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        functional::linear(input, &self.params.weights, &self.params.bias)
    }
}
