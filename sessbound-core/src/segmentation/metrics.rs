//! Boundary agreement between a gold and a candidate segmentation

use super::Segmentation;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Position-wise agreement counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    /// Boundary in both
    pub true_positives: usize,
    /// Boundary only in the candidate
    pub false_positives: usize,
    /// Boundary in neither
    pub true_negatives: usize,
    /// Boundary only in the gold segmentation
    pub false_negatives: usize,
}

impl ContingencyTable {
    /// Compare the positions both segmentations share
    pub fn compare(gold: &Segmentation, candidate: &Segmentation) -> Self {
        let shared = gold.len().min(candidate.len());
        let mut table = Self::default();
        for position in 0..shared {
            match (gold.is_boundary(position), candidate.is_boundary(position)) {
                (true, true) => table.true_positives += 1,
                (false, true) => table.false_positives += 1,
                (false, false) => table.true_negatives += 1,
                (true, false) => table.false_negatives += 1,
            }
        }
        table
    }

    /// Number of positions compared
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Accuracy, precision, recall and F1 of a candidate segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryMetrics {
    /// Raw counts
    pub table: ContingencyTable,
    /// (TP + TN) / total
    pub accuracy: f64,
    /// TP / (TP + FP)
    pub precision: f64,
    /// TP / (TP + FN)
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1_score: f64,
}

fn ratio(numerator: usize, denominator: usize, metric: &'static str) -> Result<f64> {
    if denominator == 0 {
        return Err(Error::DivideByZero { metric });
    }
    Ok(numerator as f64 / denominator as f64)
}

impl BoundaryMetrics {
    /// Derive the metrics from raw counts
    ///
    /// # Errors
    /// [`Error::DivideByZero`] when a denominator is zero.
    pub fn from_table(table: ContingencyTable) -> Result<Self> {
        let accuracy = ratio(
            table.true_positives + table.true_negatives,
            table.total(),
            "accuracy",
        )?;
        let precision = ratio(
            table.true_positives,
            table.true_positives + table.false_positives,
            "precision",
        )?;
        let recall = ratio(
            table.true_positives,
            table.true_positives + table.false_negatives,
            "recall",
        )?;
        let f1_score = if precision + recall > 0.0 {
            2.0 * (precision * recall) / (precision + recall)
        } else {
            0.0
        };

        Ok(Self {
            table,
            accuracy,
            precision,
            recall,
            f1_score,
        })
    }
}

/// Score `candidate` against `gold` over their shared positions
pub fn evaluate(gold: &Segmentation, candidate: &Segmentation) -> Result<BoundaryMetrics> {
    if gold.len() != candidate.len() {
        log::warn!(
            "comparing streams of different length ({} vs {}), using the shared prefix",
            gold.len(),
            candidate.len()
        );
    }
    BoundaryMetrics::from_table(ContingencyTable::compare(gold, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_segmentations_score_perfectly() {
        let seg = Segmentation::from_sessions(&[vec![1, 2], vec![3]]);
        let metrics = evaluate(&seg, &seg).unwrap();
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1_score, 1.0);
    }

    #[test]
    fn test_counts() {
        // gold boundaries {1, 3}, candidate {0, 3}
        let gold = Segmentation::from_sessions(&[vec![1, 2], vec![3, 4]]);
        let candidate = Segmentation::from_sessions(&[vec![1], vec![2, 3, 4]]);
        let metrics = evaluate(&gold, &candidate).unwrap();

        assert_eq!(
            metrics.table,
            ContingencyTable {
                true_positives: 1,
                false_positives: 1,
                true_negatives: 1,
                false_negatives: 1,
            }
        );
        assert_eq!(metrics.accuracy, 0.5);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 0.5);
        assert_eq!(metrics.f1_score, 0.5);
    }

    #[test]
    fn test_shared_prefix_only() {
        let gold = Segmentation::from_sessions(&[vec![1, 2, 3]]);
        let candidate = Segmentation::from_sessions(&[vec![1, 2]]);
        let table = ContingencyTable::compare(&gold, &candidate);
        assert_eq!(table.total(), 2);
        assert_eq!(table.false_positives, 1);
    }

    #[test]
    fn test_empty_comparison_is_undefined() {
        let empty = Segmentation::default();
        assert!(matches!(
            evaluate(&empty, &empty),
            Err(Error::DivideByZero { metric: "accuracy" })
        ));
    }

    #[test]
    fn test_zero_true_positives_gives_zero_f1() {
        let table = ContingencyTable {
            true_positives: 0,
            false_positives: 2,
            true_negatives: 1,
            false_negatives: 1,
        };
        let metrics = BoundaryMetrics::from_table(table).unwrap();
        assert_eq!(metrics.f1_score, 0.0);
    }
}
