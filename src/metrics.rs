//! Evaluation metrics.
//!
//! Metrics never take part in backpropagation. They are accumulated batch by batch as a
//! running `(total, count)` pair, so a whole pass over a dataset is reduced without keeping
//! its predictions around.

use crate::backend::{Backend, Tensor1D, Tensor2D};

/// A metric computed from model predictions and raw dataset labels.
pub trait Metric<B: Backend> {
    type Prediction;

    /// Short name used in reports, e.g. `"accuracy"`.
    fn name(&self) -> &'static str;

    /// Sum of the per-example metric over the batch, and the number of examples.
    fn batch_totals(&self, prediction: &Self::Prediction, labels: &Tensor1D<B>) -> (f64, usize);
}

/// Fraction of rows whose argmax equals the label.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accuracy;

impl<B: Backend> Metric<B> for Accuracy {
    type Prediction = Tensor2D<B>;

    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn batch_totals(&self, probs: &Tensor2D<B>, labels: &Tensor1D<B>) -> (f64, usize) {
        let predicted = probs.argmax_rows();
        let labels = labels.to_vec();
        assert_eq!(predicted.len(), labels.len(), "one label per prediction row");
        let correct = predicted
            .iter()
            .zip(&labels)
            .filter(|&(&p, &y)| p as f64 == y)
            .count();
        (correct as f64, labels.len())
    }
}

/// Mean squared error of a regression output.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl<B: Backend> Metric<B> for MeanSquaredError {
    type Prediction = Tensor1D<B>;

    fn name(&self) -> &'static str {
        "mse"
    }

    fn batch_totals(&self, pred: &Tensor1D<B>, labels: &Tensor1D<B>) -> (f64, usize) {
        let diff = pred.sub(labels);
        (diff.dot(&diff).to_f64(), diff.len())
    }
}

/// Running total of a metric over several batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricAccumulator {
    total: f64,
    count: usize,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, (total, count): (f64, usize)) {
        self.total += total;
        self.count += count;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean over everything accumulated, `None` before the first example.
    pub fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}
