//! Binary classification metrics over scored samples.
//!
//! Semantics follow the usual label-ranking definitions: curve points are
//! emitted once per distinct score, from the highest down, so tied scores move
//! together.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("no samples to evaluate")]
    Empty,

    #[error("labels and scores differ in length ({labels} vs {scores})")]
    LengthMismatch { labels: usize, scores: usize },

    #[error("ground truth needs both classes, found only {0}")]
    SingleClass(&'static str),

    #[error("score is not a finite number: {0}")]
    NonFinite(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RocPoint {
    pub fpr: f64,
    pub tpr: f64,
    /// `None` for the (0, 0) starting point
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrPoint {
    pub recall: f64,
    pub precision: f64,
    /// `None` for the (recall 0, precision 1) starting point
    pub threshold: Option<f64>,
}

/// Cumulative counts at one distinct threshold
struct Step {
    threshold: f64,
    tp: usize,
    fp: usize,
}

fn validate(labels: &[bool], scores: &[f64]) -> Result<(), MetricsError> {
    if labels.len() != scores.len() {
        return Err(MetricsError::LengthMismatch {
            labels: labels.len(),
            scores: scores.len(),
        });
    }
    if labels.is_empty() {
        return Err(MetricsError::Empty);
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(MetricsError::NonFinite(*bad));
    }
    Ok(())
}

/// Walk samples from the highest score down, one step per distinct score
fn ranked_steps(labels: &[bool], scores: &[f64]) -> Vec<Step> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut steps = Vec::new();
    let (mut tp, mut fp) = (0, 0);
    for (i, &idx) in order.iter().enumerate() {
        if labels[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_tie = order
            .get(i + 1)
            .is_none_or(|&next| scores[next] != scores[idx]);
        if last_of_tie {
            steps.push(Step {
                threshold: scores[idx],
                tp,
                fp,
            });
        }
    }
    steps
}

/// ROC curve, starting at (0, 0) and ending at (1, 1)
pub fn roc_curve(labels: &[bool], scores: &[f64]) -> Result<Vec<RocPoint>, MetricsError> {
    validate(labels, scores)?;
    let positives = labels.iter().filter(|&&l| l).count();
    let negatives = labels.len() - positives;
    if positives == 0 {
        return Err(MetricsError::SingleClass("negatives"));
    }
    if negatives == 0 {
        return Err(MetricsError::SingleClass("positives"));
    }

    let mut points = vec![RocPoint {
        fpr: 0.0,
        tpr: 0.0,
        threshold: None,
    }];
    points.extend(ranked_steps(labels, scores).into_iter().map(|step| RocPoint {
        fpr: step.fp as f64 / negatives as f64,
        tpr: step.tp as f64 / positives as f64,
        threshold: Some(step.threshold),
    }));
    Ok(points)
}

/// Area under a ROC curve by the trapezoidal rule
pub fn auc(points: &[RocPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].fpr - pair[0].fpr) * (pair[1].tpr + pair[0].tpr) / 2.0)
        .sum()
}

/// Precision-recall curve, from (recall 0, precision 1) up to full recall
pub fn precision_recall_curve(
    labels: &[bool],
    scores: &[f64],
) -> Result<Vec<PrPoint>, MetricsError> {
    validate(labels, scores)?;
    let positives = labels.iter().filter(|&&l| l).count();
    if positives == 0 {
        return Err(MetricsError::SingleClass("negatives"));
    }

    let mut points = vec![PrPoint {
        recall: 0.0,
        precision: 1.0,
        threshold: None,
    }];
    for step in ranked_steps(labels, scores) {
        points.push(PrPoint {
            recall: step.tp as f64 / positives as f64,
            precision: step.tp as f64 / (step.tp + step.fp) as f64,
            threshold: Some(step.threshold),
        });
        // Lower thresholds cannot add recall
        if step.tp == positives {
            break;
        }
    }
    Ok(points)
}

/// Average precision: Σ (Rₙ − Rₙ₋₁) · Pₙ along a precision-recall curve
pub fn average_precision(points: &[PrPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| (pair[1].recall - pair[0].recall) * pair[1].precision)
        .sum()
}

/// Counts of (truth, prediction) pairs over a fixed label set.
///
/// Rows are ground truth, columns are predictions, both in `labels` order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<u64>>,
}

impl ConfusionMatrix {
    /// Build from label pairs; the label set is the sorted union of both sides
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
        let labels: BTreeSet<&str> = pairs.iter().flat_map(|&(t, p)| [t, p]).collect();
        let labels: Vec<String> = labels.into_iter().map(str::to_string).collect();
        Self::with_labels(labels, pairs)
    }

    /// Build over numeric labels, ordered numerically
    pub fn from_numeric(truth: &[f64], predicted: &[f64]) -> Self {
        let mut values: Vec<f64> = truth.iter().chain(predicted).copied().collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

        let labels: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let truth: Vec<String> = truth.iter().map(|v| v.to_string()).collect();
        let predicted: Vec<String> = predicted.iter().map(|v| v.to_string()).collect();
        Self::with_labels(
            labels,
            truth.iter().map(String::as_str).zip(predicted.iter().map(String::as_str)),
        )
    }

    fn with_labels<'a>(labels: Vec<String>, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut counts = vec![vec![0u64; labels.len()]; labels.len()];
        let index = |label: &str| labels.iter().position(|l| l == label);
        for (truth, predicted) in pairs {
            if let (Some(row), Some(col)) = (index(truth), index(predicted)) {
                counts[row][col] += 1;
            }
        }
        Self { labels, counts }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Share of samples on the diagonal
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let correct: u64 = (0..self.labels.len()).map(|i| self.counts[i][i]).sum();
        correct as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABELS: [bool; 4] = [false, false, true, true];
    const SCORES: [f64; 4] = [0.1, 0.4, 0.35, 0.8];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_roc_reference_values() {
        let points = roc_curve(&LABELS, &SCORES).unwrap();
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.fpr, p.tpr)).collect();
        assert_eq!(
            coords,
            vec![(0.0, 0.0), (0.0, 0.5), (0.5, 0.5), (0.5, 1.0), (1.0, 1.0)]
        );
        assert!(close(auc(&points), 0.75));
    }

    #[test]
    fn test_auc_extremes() {
        let labels = [true, true, false, false];
        let perfect = roc_curve(&labels, &[0.9, 0.8, 0.2, 0.1]).unwrap();
        assert!(close(auc(&perfect), 1.0));
        let reversed = roc_curve(&labels, &[0.1, 0.2, 0.8, 0.9]).unwrap();
        assert!(close(auc(&reversed), 0.0));
    }

    #[test]
    fn test_ties_move_together() {
        let points = roc_curve(&[true, false], &[0.5, 0.5]).unwrap();
        assert_eq!(points.len(), 2);
        assert!(close(auc(&points), 0.5));
    }

    #[test]
    fn test_average_precision_reference() {
        let points = precision_recall_curve(&LABELS, &SCORES).unwrap();
        assert!(close(average_precision(&points), 0.5 + 0.5 * (2.0 / 3.0)));
        // Stops once recall reaches 1
        assert_eq!(points.last().unwrap().threshold, Some(0.35));
    }

    #[test]
    fn test_perfect_average_precision() {
        let points =
            precision_recall_curve(&[true, false, true], &[0.9, 0.1, 0.7]).unwrap();
        assert!(close(average_precision(&points), 1.0));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(roc_curve(&[], &[]), Err(MetricsError::Empty));
        assert_eq!(
            roc_curve(&[true, true], &[0.1, 0.2]),
            Err(MetricsError::SingleClass("positives"))
        );
        assert_eq!(
            precision_recall_curve(&[false], &[0.1]),
            Err(MetricsError::SingleClass("negatives"))
        );
        assert!(matches!(
            roc_curve(&[true, false], &[0.1, f64::NAN]),
            Err(MetricsError::NonFinite(_))
        ));
        assert_eq!(
            roc_curve(&[true], &[0.1, 0.2]),
            Err(MetricsError::LengthMismatch {
                labels: 1,
                scores: 2
            })
        );
    }

    #[test]
    fn test_numeric_confusion_matrix() {
        let cm = ConfusionMatrix::from_numeric(&[0.0, 0.0, 1.0, 1.0, 1.0], &[0.0, 1.0, 1.0, 1.0, 0.0]);
        assert_eq!(cm.labels, vec!["0", "1"]);
        assert_eq!(cm.counts, vec![vec![1, 1], vec![1, 2]]);
        assert_eq!(cm.total(), 5);
        assert!(close(cm.accuracy(), 0.6));
    }

    #[test]
    fn test_label_confusion_matrix_uses_union() {
        let cm = ConfusionMatrix::from_pairs([
            ("sdxl", "sdxl"),
            ("midjourney", "sdxl"),
            ("real", "dalle"),
        ]);
        assert_eq!(cm.labels, vec!["dalle", "midjourney", "real", "sdxl"]);
        assert_eq!(cm.counts[1][3], 1);
        assert_eq!(cm.counts[2][0], 1);
        assert_eq!(cm.counts[3][3], 1);
        assert_eq!(cm.total(), 3);
    }
}
