//! Mini-batch training loop.

pub mod history;
pub mod smoothing;

pub use history::{EpochReport, History};
pub use smoothing::LossSmoother;

use crate::{
    backend::{Backend, Tensor2D},
    dataset::{BatchIter, Dataset, RemainderPolicy, Shuffle},
    error::{Error, Result},
    loss::Loss,
    metrics::{Metric, MetricAccumulator},
    model::{ParamOps, TrainableModel},
    optimizer::Optimizer,
};
use log::{debug, info, trace};
use std::marker::PhantomData;

/// Orchestrates the training loop for a `TrainableModel`.
///
/// Combines a loss function and an optimizer to fit a model on a dataset. Once built via
/// `TrainerBuilder` it is immutable and can be reused across several models of the same
/// type.
///
/// Every epoch:
/// 1. the batch iterator is reset (and reshuffled),
/// 2. each batch goes through forward, loss, backward and one optimizer step,
/// 3. the batch loss is folded into a moving average carried across epochs,
/// 4. the held-out dataset is evaluated with a forward-only pass.
pub struct Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub(crate) batch_size: usize,
    pub(crate) max_epochs: usize,
    pub(crate) smoothing: f64,
    pub(crate) shuffle: Shuffle,
    pub(crate) remainder: RemainderPolicy,
    pub(crate) verbose: bool,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

/// Fluent builder for constructing a `Trainer` with custom hyperparameters.
///
/// Defaults:
/// - `batch_size`: 32
/// - `max_epochs`: 10
/// - `smoothing`: 0.1
/// - `shuffle`: `Shuffle::Seeded(0)`
/// - `remainder`: `RemainderPolicy::Keep`
/// - `verbose`: true
pub struct TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    batch_size: usize,
    max_epochs: usize,
    smoothing: f64,
    shuffle: Shuffle,
    remainder: RemainderPolicy,
    verbose: bool,
    loss_fn: L,
    optimizer: O,
    _phantom_backend: PhantomData<B>,
    _phantom_model: PhantomData<M>,
}

impl<B, L, O, M, P> TrainerBuilder<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            batch_size: 32,
            max_epochs: 10,
            smoothing: 0.1,
            shuffle: Shuffle::default(),
            remainder: RemainderPolicy::default(),
            verbose: true,
            loss_fn,
            optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Weight of the newest batch loss in the moving average.
    pub fn smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn shuffle(mut self, shuffle: Shuffle) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn remainder(mut self, policy: RemainderPolicy) -> Self {
        self.remainder = policy;
        self
    }

    /// When `false`, suppresses the per-epoch report line.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Trainer<B, L, O, M, P> {
        Trainer {
            batch_size: self.batch_size,
            max_epochs: self.max_epochs,
            smoothing: self.smoothing,
            shuffle: self.shuffle,
            remainder: self.remainder,
            verbose: self.verbose,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
            _phantom_backend: PhantomData,
            _phantom_model: PhantomData,
        }
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<
        B,
        Input = Tensor2D<B>,
        Prediction = L::Prediction,
        Params = P,
        Gradients = P,
    >,
    O: Optimizer<B, P>,
    P: ParamOps<B>,
{
    /// Trains `model` on `train` for `max_epochs`, evaluating `metric` on `eval` after each
    /// epoch.
    ///
    /// # Returns
    /// The fitted model and one [`EpochReport`] per epoch.
    ///
    /// # Errors
    /// - [`Error::EmptyData`] if either dataset is empty.
    /// - [`Error::InvalidShape`] if a dataset's width differs from the model's input width.
    /// - [`Error::InvalidParameter`] for a zero batch size, a smoothing factor outside
    ///   `(0, 1]`, a `Drop` policy that would leave no training batch, or a label the loss
    ///   cannot encode (e.g. not a class index).
    /// - [`Error::NumericalError`] if a batch loss is NaN or infinite.
    pub fn fit<D, E, Mt>(
        &self,
        mut model: M,
        train: &D,
        eval: &E,
        metric: &Mt,
    ) -> Result<(M::Output, History)>
    where
        D: Dataset,
        E: Dataset,
        Mt: Metric<B, Prediction = L::Prediction>,
    {
        self.check_dataset("training", train, model.input_dim())?;
        self.check_dataset("evaluation", eval, model.input_dim())?;
        let mut smoother = LossSmoother::new(self.smoothing)?;
        let mut batches =
            BatchIter::<B, D>::new(train, self.batch_size, self.remainder, self.shuffle)?;
        if batches.num_batches() == 0 {
            return Err(Error::InvalidParameter(format!(
                "batch_size {} drops every one of the {} training examples",
                self.batch_size,
                train.len()
            )));
        }

        info!(
            "training for {} epochs on {} examples ({} batches of up to {})",
            self.max_epochs,
            train.len(),
            batches.num_batches(),
            self.batch_size
        );

        let mut history = History::new();
        for epoch in 1..=self.max_epochs {
            batches.reset();
            let mut train_metric = MetricAccumulator::new();

            for (step, batch) in batches.by_ref().enumerate() {
                let (x, labels) = batch?;
                let targets = self.loss_fn.encode_targets(&labels)?;

                let preds = model.forward(&x);
                let loss = self.loss_fn.loss(&preds, &targets);
                if !loss.is_finite() {
                    return Err(Error::NumericalError(format!(
                        "loss became {} at epoch {}, batch {}",
                        loss.to_f64(),
                        epoch,
                        step
                    )));
                }
                train_metric.add(metric.batch_totals(&preds, &labels));

                let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &targets);
                let grads = model.backward(&x, &grad_preds);
                let new_params = self.optimizer.step(model.params(), &grads);
                model.update_params(new_params);

                let avg = smoother.update(loss.to_f64());
                trace!(
                    "epoch {} batch {}: loss {:.6}, smoothed {:.6}",
                    epoch,
                    step,
                    loss.to_f64(),
                    avg
                );
            }

            let report = EpochReport {
                epoch,
                smoothed_loss: smoother.value().unwrap_or(f64::NAN),
                metric: metric.name(),
                train_metric: train_metric.value().unwrap_or(f64::NAN),
                eval_metric: self.evaluate(&model, eval, metric)?,
            };
            debug!("{:?}", report);
            if self.verbose {
                println!("{}", report);
            }
            history.push(report);
        }

        if let Some(last) = history.last() {
            info!("finished training: {}", last);
        }
        Ok((model.into_fitted(), history))
    }

    /// Forward-only pass over `dataset`, in order.
    pub fn evaluate<D, Mt>(&self, model: &M, dataset: &D, metric: &Mt) -> Result<f64>
    where
        D: Dataset,
        Mt: Metric<B, Prediction = L::Prediction>,
    {
        let mut acc = MetricAccumulator::new();
        for batch in dataset.batches::<B>(self.batch_size)? {
            let (x, labels) = batch?;
            acc.add(metric.batch_totals(&model.forward(&x), &labels));
        }
        acc.value()
            .ok_or_else(|| Error::EmptyData("evaluation dataset is empty".into()))
    }

    fn check_dataset<D: Dataset>(&self, role: &str, dataset: &D, input_dim: usize) -> Result<()> {
        if dataset.is_empty() {
            return Err(Error::EmptyData(format!("{} dataset is empty", role)));
        }
        if dataset.num_features() != input_dim {
            return Err(Error::InvalidShape {
                expected: format!("{} features", input_dim),
                got: format!("{} features in the {} dataset", dataset.num_features(), role),
            });
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidParameter(
                "batch_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl<B, L, O, M, P> Trainer<B, L, O, M, P>
where
    B: Backend,
    L: Loss<B>,
    M: TrainableModel<B, Params = P, Gradients = P>,
    O: Optimizer<B, P>,
{
    /// Convenience constructor that starts the builder pattern.
    ///
    /// Equivalent to `TrainerBuilder::new(...)`.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<B, L, O, M, P> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }
}
