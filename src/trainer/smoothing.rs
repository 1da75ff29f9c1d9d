use crate::error::{Error, Result};

/// Exponentially weighted moving average of the per-batch loss.
///
/// `avg ← s·loss + (1 − s)·avg`, seeded with the first observed loss.
#[derive(Debug, Clone, Copy)]
pub struct LossSmoother {
    smoothing: f64,
    value: Option<f64>,
}

impl LossSmoother {
    /// # Errors
    /// [`Error::InvalidParameter`] unless `0 < smoothing ≤ 1`.
    pub fn new(smoothing: f64) -> Result<Self> {
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "smoothing must be in (0, 1], got {}",
                smoothing
            )));
        }
        Ok(Self {
            smoothing,
            value: None,
        })
    }

    /// Folds in one observation and returns the new average.
    pub fn update(&mut self, loss: f64) -> f64 {
        let next = match self.value {
            None => loss,
            Some(avg) => self.smoothing * loss + (1.0 - self.smoothing) * avg,
        };
        self.value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_loss_seeds_the_average() {
        let mut s = LossSmoother::new(0.1).unwrap();
        assert_eq!(s.value(), None);
        assert_eq!(s.update(2.0), 2.0);
        assert!((s.update(1.0) - 1.9).abs() < 1e-12);
        assert!((s.value().unwrap() - 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_smoothing_one_tracks_last_loss() {
        let mut s = LossSmoother::new(1.0).unwrap();
        s.update(5.0);
        assert_eq!(s.update(3.0), 3.0);
    }

    #[test]
    fn test_constant_stream_stays_constant() {
        let mut s = LossSmoother::new(0.3).unwrap();
        for _ in 0..20 {
            assert!((s.update(0.7) - 0.7).abs() < 1e-12);
        }
    }

    #[test]
    fn test_out_of_range_smoothing() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                LossSmoother::new(bad),
                Err(Error::InvalidParameter(_))
            ));
        }
    }
}
