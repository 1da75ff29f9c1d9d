//! Models and the traits the trainer drives them through.
//!
//! A model starts life as `Model<B, Unfitted>` implementing [`TrainableModel`]: it exposes a
//! forward pass, an explicit backward pass returning a gradient structure, and the means to
//! swap in new parameters. `into_fitted` converts it into `Model<B, Fitted>`, which only
//! implements [`InferenceModel`].

pub mod init;
pub mod linear;
pub mod softmax;
pub mod state;

pub use init::Init;
pub use linear::{LinearModel, LinearParams, LinearRegression};
pub use softmax::{SoftmaxModel, SoftmaxParams, SoftmaxRegression};
pub use state::{Fitted, Unfitted};

use crate::backend::{Backend, Scalar};

/// A model that can be trained by gradient descent.
///
/// `Gradients` mirrors `Params` so the optimizer can combine them element by element.
pub trait TrainableModel<B: Backend> {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    /// Number of features each input row must have.
    fn input_dim(&self) -> usize;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;

    /// Gradients of the loss w.r.t. the parameters, given `∂L/∂prediction`.
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;

    fn params(&self) -> &Self::Params;

    /// Replaces the current parameters wholesale.
    fn update_params(&mut self, new_params: Self::Params);

    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic over a parameter structure, applied to every tensor it contains.
pub trait ParamOps<B: Backend>: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: &Scalar<B>) -> Self;
}

/// Prediction with a trained model.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;
    fn predict_batch(&self, input: &Self::InputBatch) -> Self::OutputBatch;
}
