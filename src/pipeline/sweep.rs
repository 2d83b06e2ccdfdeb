use crate::model::closure::{GroundTruthSet, PredictedClosure, select_above};
use crate::model::metrics::ThresholdResult;

/// One row per threshold, in the order given.
pub fn sweep(
    ground_truth: &GroundTruthSet,
    predictions: &[PredictedClosure],
    thresholds: &[f64],
) -> Vec<ThresholdResult> {
    thresholds
        .iter()
        .map(|&t| evaluate_threshold(ground_truth, predictions, t))
        .collect()
}

pub fn evaluate_threshold(
    ground_truth: &GroundTruthSet,
    predictions: &[PredictedClosure],
    threshold: f64,
) -> ThresholdResult {
    let selected = select_above(predictions, threshold);
    let tp = selected.iter().filter(|p| ground_truth.contains(p)).count();
    let fp = selected.len() - tp;
    let fn_ = ground_truth.len() - tp;
    ThresholdResult::from_counts(threshold, tp, fp, fn_)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/sweep.rs"]
mod tests;
