use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::error::{Error, Result};

/// Weight initialisation scheme. Biases always start at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// All weights zero.
    Zeros,
    /// Weights drawn from `N(0, std²)` with a seeded generator.
    Normal { std: f32, seed: u64 },
}

impl Default for Init {
    fn default() -> Self {
        Init::Normal {
            std: 0.01,
            seed: 0,
        }
    }
}

impl Init {
    /// Draws `len` weight values.
    ///
    /// # Returns
    /// An error if `std` is negative or not finite.
    pub fn sample(&self, len: usize) -> Result<Vec<f32>> {
        match *self {
            Init::Zeros => Ok(vec![0.0; len]),
            Init::Normal { std, seed } => {
                let normal = Normal::new(0.0f32, std).map_err(|e| {
                    Error::InvalidParameter(format!("normal init with std {}: {}", std, e))
                })?;
                let mut rng = StdRng::seed_from_u64(seed);
                Ok((0..len).map(|_| normal.sample(&mut rng)).collect())
            }
        }
    }
}
