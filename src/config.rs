//! Serializable training hyperparameters.
//!
//! ```rust
//! use scratchnet::config::TrainingConfig;
//!
//! let config = TrainingConfig::from_json_str(r#"{ "batch_size": 256, "learning_rate": 0.1 }"#)
//!     .unwrap();
//! assert_eq!(config.batch_size, 256);
//! assert_eq!(config.epochs, 10); // default
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::Backend;
use crate::dataset::{RemainderPolicy, Shuffle};
use crate::error::{Error, Result};
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::SGD;
use crate::trainer::TrainerBuilder;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub batch_size: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    /// Weight of the newest batch loss in the moving average.
    pub smoothing: f64,
    /// Shuffle seed. `None` keeps the dataset order.
    pub seed: Option<u64>,
    pub drop_remainder: bool,
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            learning_rate: 0.1,
            epochs: 10,
            smoothing: 0.1,
            seed: Some(0),
            drop_remainder: false,
            verbose: true,
        }
    }
}

impl TrainingConfig {
    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidParameter(
                "batch_size must be greater than zero".into(),
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(Error::InvalidParameter(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "smoothing must be in (0, 1], got {}",
                self.smoothing
            )));
        }
        Ok(())
    }

    pub fn shuffle(&self) -> Shuffle {
        self.seed.map_or(Shuffle::Off, Shuffle::Seeded)
    }

    pub fn remainder(&self) -> RemainderPolicy {
        if self.drop_remainder {
            RemainderPolicy::Drop
        } else {
            RemainderPolicy::Keep
        }
    }

    /// A trainer builder using `loss_fn` and plain SGD, with every setting taken from
    /// this config.
    pub fn builder<B, L, M, P>(&self, loss_fn: L) -> Result<TrainerBuilder<B, L, SGD<B>, M, P>>
    where
        B: Backend,
        L: Loss<B>,
        M: TrainableModel<B, Params = P, Gradients = P>,
        P: ParamOps<B>,
    {
        self.validate()?;
        Ok(TrainerBuilder::new(loss_fn, SGD::new(self.learning_rate))
            .batch_size(self.batch_size)
            .max_epochs(self.epochs)
            .smoothing(self.smoothing)
            .shuffle(self.shuffle())
            .remainder(self.remainder())
            .verbose(self.verbose))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::loss::CrossEntropyLoss;
    use crate::model::{SoftmaxParams, SoftmaxRegression};

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = TrainingConfig::from_json_str("{}").unwrap();
        assert_eq!(config, TrainingConfig::default());
        assert_eq!(config.shuffle(), Shuffle::Seeded(0));
        assert_eq!(config.remainder(), RemainderPolicy::Keep);
    }

    #[test]
    fn test_full_document() {
        let json = r#"{
            "batch_size": 10,
            "learning_rate": 0.03,
            "epochs": 3,
            "smoothing": 0.2,
            "seed": null,
            "drop_remainder": true,
            "verbose": false
        }"#;
        let config = TrainingConfig::from_json_str(json).unwrap();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.learning_rate, 0.03);
        assert_eq!(config.epochs, 3);
        assert_eq!(config.shuffle(), Shuffle::Off);
        assert_eq!(config.remainder(), RemainderPolicy::Drop);
        assert!(!config.verbose);
    }

    #[test]
    fn test_validation_errors() {
        for json in [
            r#"{ "batch_size": 0 }"#,
            r#"{ "smoothing": 0.0 }"#,
            r#"{ "smoothing": 1.5 }"#,
        ] {
            assert!(matches!(
                TrainingConfig::from_json_str(json),
                Err(Error::InvalidParameter(_))
            ));
        }
        let nan = TrainingConfig {
            learning_rate: f64::NAN,
            ..TrainingConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        assert!(matches!(
            TrainingConfig::from_json_str("{ batch_size: 1 }"),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            TrainingConfig::from_json_str(r#"{ "epoch": 3 }"#),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_file_round_trip() {
        let config = TrainingConfig {
            batch_size: 256,
            epochs: 4,
            ..TrainingConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.json");
        fs::write(&path, config.to_json_string().unwrap()).unwrap();
        assert_eq!(TrainingConfig::from_json_file(&path).unwrap(), config);

        assert!(matches!(
            TrainingConfig::from_json_file(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_builder_carries_settings() {
        let config = TrainingConfig {
            batch_size: 256,
            learning_rate: 0.1,
            epochs: 2,
            verbose: false,
            ..TrainingConfig::default()
        };
        let trainer = config
            .builder::<CpuBackend, _, SoftmaxRegression<CpuBackend>, SoftmaxParams<CpuBackend>>(
                CrossEntropyLoss::new(10),
            )
            .unwrap()
            .build();
        assert_eq!(trainer.batch_size(), 256);
        assert_eq!(trainer.max_epochs(), 2);
    }
}
