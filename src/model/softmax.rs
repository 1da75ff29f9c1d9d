//! Softmax (multinomial logistic) regression.
//!
//! The model outputs class probabilities `P = softmax(X·W + b)`. Its backward pass takes
//! `∂L/∂P` and pushes it through the softmax Jacobian, so any loss defined on probabilities
//! can drive it:
//!
//! ```text
//! ∂L/∂Z = P ⊙ (G − rowsum(G ⊙ P))      G = ∂L/∂P
//! ∂L/∂W = Xᵀ · ∂L/∂Z
//! ∂L/∂b = colsum(∂L/∂Z)
//! ```

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::Result;
use crate::functional;
use crate::model::{Fitted, Init, InferenceModel, ParamOps, TrainableModel, Unfitted};
use std::marker::PhantomData;

/// Weight matrix `(num_features × num_classes)` and bias `(num_classes,)`.
#[derive(Clone, Debug)]
pub struct SoftmaxParams<B: Backend> {
    pub weights: Tensor2D<B>,
    pub bias: Tensor1D<B>,
}

impl<B: Backend> ParamOps<B> for SoftmaxParams<B> {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: self.weights.add(&other.weights),
            bias: self.bias.add(&other.bias),
        }
    }

    fn scale(&self, scalar: &Scalar<B>) -> Self {
        Self {
            weights: self.weights.scale(scalar),
            bias: self.bias.scale(scalar),
        }
    }
}

pub struct SoftmaxModel<B: Backend, S> {
    params: SoftmaxParams<B>,
    _state: PhantomData<S>,
}

pub type SoftmaxRegression<B> = SoftmaxModel<B, Unfitted>;

impl<B: Backend> SoftmaxRegression<B> {
    /// Zero-initialised classifier.
    pub fn new(num_features: usize, num_classes: usize) -> Self {
        Self::from_params(SoftmaxParams {
            weights: Tensor2D::zeros(num_features, num_classes),
            bias: Tensor1D::zeros(num_classes),
        })
    }

    /// Classifier whose weights are drawn from `init`; the bias starts at zero.
    pub fn with_init(num_features: usize, num_classes: usize, init: Init) -> Result<Self> {
        Ok(Self::from_params(SoftmaxParams {
            weights: Tensor2D::new(
                init.sample(num_features * num_classes)?,
                num_features,
                num_classes,
            ),
            bias: Tensor1D::zeros(num_classes),
        }))
    }

    pub fn from_params(params: SoftmaxParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}

impl<B: Backend, S> SoftmaxModel<B, S> {
    pub fn num_classes(&self) -> usize {
        self.params.weights.cols()
    }
}

impl<B: Backend> SoftmaxModel<B, Fitted> {
    pub fn new(params: SoftmaxParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn params(&self) -> &SoftmaxParams<B> {
        &self.params
    }

    /// Most probable class of each row.
    pub fn predict_classes(&self, x: &Tensor2D<B>) -> Vec<usize> {
        self.predict_batch(x).argmax_rows()
    }
}

impl<B: Backend> TrainableModel<B> for SoftmaxModel<B, Unfitted> {
    type Input = Tensor2D<B>;
    type Prediction = Tensor2D<B>;
    type Params = SoftmaxParams<B>;
    type Gradients = SoftmaxParams<B>;
    type Output = SoftmaxModel<B, Fitted>;

    fn input_dim(&self) -> usize {
        self.params.weights.rows()
    }

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        functional::softmax_regression(x, &self.params.weights, &self.params.bias)
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        let probs = self.forward(x);
        let inner = grad_output.mul(&probs).row_sum();
        let grad_scores = probs.mul(&grad_output.sub_column_vector(&inner));
        SoftmaxParams {
            weights: x.tmatmul(&grad_scores),
            bias: grad_scores.col_sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, new_params: Self::Params) {
        self.params = new_params;
    }

    fn into_fitted(self) -> Self::Output {
        SoftmaxModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> InferenceModel<B> for SoftmaxModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type OutputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputBatch = Tensor2D<B>;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.predict_batch(&input.as_row()).row(0)
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch {
        functional::softmax_regression(input, &self.params.weights, &self.params.bias)
    }
}
