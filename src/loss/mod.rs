use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::error::{Error, Result};

/// Floor applied to probabilities before taking their logarithm.
pub const PROBABILITY_FLOOR: f64 = 1e-12;

/// Floor applied to probabilities before dividing by them in the gradient.
///
/// Every normal `f64` probability passes through unchanged, so `P ⊙ ∂L/∂P` stays exactly
/// `−Y/n` and the softmax backward recovers `(P − Y)/n` even for confident mistakes.
pub const GRADIENT_FLOOR: f64 = f64::MIN_POSITIVE;

/// A differentiable loss function.
///
/// Implementors define:
/// - how raw dataset labels become the loss's target representation,
/// - the scalar loss value, averaged over the batch,
/// - the gradient of that average w.r.t. the model's predictions.
///
/// The gradient is what gets passed to the model's `backward()`.
pub trait Loss<B: Backend> {
    type Prediction;
    type Target;

    /// Converts a batch of labels, as stored in a dataset, into targets.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if a label cannot be represented as a target.
    fn encode_targets(&self, labels: &Tensor1D<B>) -> Result<Self::Target>;

    /// Mean loss over the batch.
    fn loss(&self, prediction: &Self::Prediction, target: &Self::Target) -> Scalar<B>;

    /// `∂L/∂prediction` of the mean loss.
    fn grad_wrt_prediction(
        &self,
        prediction: &Self::Prediction,
        target: &Self::Target,
    ) -> Self::Prediction;
}

/// Mean squared error: `L = (1/n) · Σ(ŷᵢ − yᵢ)²`.
///
/// Gradient w.r.t. prediction: `∂L/∂ŷ = 2(ŷ − y) / n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MSELoss;

impl<B: Backend> Loss<B> for MSELoss {
    type Prediction = Tensor1D<B>;
    type Target = Tensor1D<B>;

    fn encode_targets(&self, labels: &Tensor1D<B>) -> Result<Self::Target> {
        Ok(labels.clone())
    }

    fn loss(&self, pred: &Self::Prediction, target: &Self::Target) -> Scalar<B> {
        let diff = pred.sub(target);
        diff.dot(&diff) / Scalar::new(diff.len() as f64)
    }

    fn grad_wrt_prediction(&self, pred: &Self::Prediction, target: &Self::Target) -> Tensor1D<B> {
        let scale = Scalar::new(2.0 / pred.len() as f64);
        pred.sub(target).scale(&scale)
    }
}

/// Cross-entropy between predicted class probabilities and one-hot targets.
///
/// For probabilities `P` (rows sum to 1) and one-hot `Y`:
///
/// ```text
/// ℓᵢ = −Σ_c Yᵢc · log max(Pᵢc, 1e-12)
/// L  = (1/n) · Σᵢ ℓᵢ
/// ∂L/∂P = −Y / P / n
/// ```
///
/// The `1e-12` floor keeps the loss finite when the true class probability underflows to
/// zero. The gradient is taken of the unfloored loss, only guarded against dividing by an
/// exact zero with [`GRADIENT_FLOOR`].
#[derive(Debug, Clone, Copy)]
pub struct CrossEntropyLoss {
    num_classes: usize,
}

impl CrossEntropyLoss {
    pub fn new(num_classes: usize) -> Self {
        Self { num_classes }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Unreduced loss, one entry per example.
    pub fn per_example<B: Backend>(
        &self,
        probs: &Tensor2D<B>,
        targets: &Tensor2D<B>,
    ) -> Tensor1D<B> {
        let log_probs = probs.clamp_min(PROBABILITY_FLOOR).log();
        targets
            .mul(&log_probs)
            .row_sum()
            .scale(&Scalar::new(-1.0))
    }
}

impl<B: Backend> Loss<B> for CrossEntropyLoss {
    type Prediction = Tensor2D<B>;
    type Target = Tensor2D<B>;

    fn encode_targets(&self, labels: &Tensor1D<B>) -> Result<Self::Target> {
        let classes = self.num_classes as f64;
        if let Some(bad) = labels
            .to_vec()
            .into_iter()
            .find(|&l| !(l >= 0.0 && l < classes && l.fract() == 0.0))
        {
            return Err(Error::InvalidParameter(format!(
                "label {} is not a class index in 0..{}",
                bad, self.num_classes
            )));
        }
        Ok(labels.one_hot(self.num_classes))
    }

    fn loss(&self, probs: &Self::Prediction, targets: &Self::Target) -> Scalar<B> {
        self.per_example(probs, targets).mean()
    }

    fn grad_wrt_prediction(&self, probs: &Self::Prediction, targets: &Self::Target) -> Tensor2D<B> {
        let n = probs.rows() as f64;
        targets
            .div(&probs.clamp_min(GRADIENT_FLOOR))
            .scale(&Scalar::new(-1.0 / n))
    }
}
