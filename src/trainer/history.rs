use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Summary of one training epoch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochReport {
    /// 1-based epoch index.
    pub epoch: usize,
    /// Moving average of the batch loss at the end of the epoch.
    pub smoothed_loss: f64,
    pub metric: &'static str,
    /// Metric over the epoch's training batches, computed before each update.
    pub train_metric: f64,
    /// Metric over the held-out dataset after the epoch.
    pub eval_metric: f64,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "epoch {}, loss {:.4}, train {} {:.4}, test {} {:.4}",
            self.epoch, self.smoothed_loss, self.metric, self.train_metric, self.metric,
            self.eval_metric
        )
    }
}

/// Per-epoch reports of a `fit` call, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    reports: Vec<EpochReport>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: EpochReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[EpochReport] {
        &self.reports
    }

    pub fn last(&self) -> Option<&EpochReport> {
        self.reports.last()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Writes one CSV row per epoch, with a header.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for report in &self.reports {
            writer.serialize(report)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(epoch: usize) -> EpochReport {
        EpochReport {
            epoch,
            smoothed_loss: 0.5 / epoch as f64,
            metric: "accuracy",
            train_metric: 0.8,
            eval_metric: 0.75,
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            report(2).to_string(),
            "epoch 2, loss 0.2500, train accuracy 0.8000, test accuracy 0.7500"
        );
    }

    #[test]
    fn test_history_accessors() {
        let mut h = History::new();
        assert!(h.is_empty());
        assert_eq!(h.last(), None);
        h.push(report(1));
        h.push(report(2));
        assert_eq!(h.len(), 2);
        assert_eq!(h.last().unwrap().epoch, 2);
        assert_eq!(h.reports()[0].epoch, 1);
    }

    #[test]
    fn test_write_csv() {
        let mut h = History::new();
        h.push(report(1));
        h.push(report(2));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        h.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "epoch,smoothed_loss,metric,train_metric,eval_metric"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,0.5,accuracy,"));
    }
}
