/// Marker for a model that is still being trained.
///
/// Only `Model<B, Unfitted>` implements [`TrainableModel`](super::TrainableModel), so an
/// untrained model cannot be handed to code expecting predictions.
#[derive(Debug, Clone, Copy)]
pub struct Unfitted;

/// Marker for a trained model.
///
/// `Model<B, Fitted>` holds only its parameters and implements
/// [`InferenceModel`](super::InferenceModel).
#[derive(Debug, Clone, Copy)]
pub struct Fitted;
