//! # scratchnet
//!
//! Linear regression and softmax regression trained from scratch: hand-written forward and
//! backward passes, mini-batch SGD and a small training loop, over pluggable tensor
//! backends.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: Models carry their training state in the type system
//!   (`Unfitted` vs `Fitted`). Only unfitted models can be trained, only fitted ones predict.
//! - **Explicit Gradients**: `backward` returns a gradient structure mirroring the
//!   parameters. The optimizer turns `(params, grads)` into new params, and nothing is
//!   mutated behind the caller's back.
//! - **Backend Agnosticism**: the `Backend` trait hides the tensor storage. `CpuBackend` is
//!   plain `Vec<f64>`, `NdarrayBackend` is built on `ndarray`.
//!
//! ## Quick Start
//!
//! ```rust
//! use scratchnet::backend::CpuBackend;
//! use scratchnet::dataset::synthetic;
//! use scratchnet::loss::MSELoss;
//! use scratchnet::metrics::MeanSquaredError;
//! use scratchnet::model::LinearRegression;
//! use scratchnet::optimizer::SGD;
//! use scratchnet::trainer::Trainer;
//!
//! let data = synthetic::linear(&[2.0, -3.4], 4.2, 1000, 0.01, 0).unwrap();
//! let trainer = Trainer::builder(MSELoss, SGD::new(0.03))
//!     .batch_size(10)
//!     .max_epochs(3)
//!     .verbose(false)
//!     .build();
//!
//! let (fitted, history) = trainer
//!     .fit(LinearRegression::<CpuBackend>::new(2), &data, &data, &MeanSquaredError)
//!     .unwrap();
//! assert!((fitted.bias() - 4.2).abs() < 0.05);
//! assert_eq!(history.len(), 3);
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions and computation primitives (`Tensor1D`, `Tensor2D`)
//! - `functional`: pure forward functions (`linear`, `affine`, `softmax`)
//! - `model`: linear and softmax regression with stateful type parameters
//! - `loss`: squared loss and cross-entropy
//! - `optimizer`: SGD
//! - `metrics`: accuracy and mean squared error
//! - `dataset`: datasets, batch iteration, IDX decoding and synthetic data
//! - `trainer`: training loop orchestration
//! - `config`: JSON-loadable hyperparameters

pub mod backend;

/// Crate-wide error type.
pub mod error;

/// Stateless forward functions.
pub mod functional;

/// Data loading utilities and dataset abstractions.
pub mod dataset;

/// Differentiable loss functions for model training.
pub mod loss;

/// Evaluation metrics.
pub mod metrics;

/// Machine learning models with compile-time state safety.
pub mod model;

/// Optimization algorithms for parameter updates.
pub mod optimizer;

/// Training loop.
pub mod trainer;

pub mod config;

pub use backend::{Backend, CpuBackend, NdarrayBackend, Scalar, Tensor1D, Tensor2D};
pub use error::{Error, Result};
