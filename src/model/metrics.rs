use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdResult {
    pub threshold: f64,
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    #[serde(serialize_with = "nan_as_null")]
    pub precision: f64,
    #[serde(serialize_with = "nan_as_null")]
    pub recall: f64,
    #[serde(serialize_with = "nan_as_null")]
    pub f1: f64,
}

impl ThresholdResult {
    pub fn from_counts(threshold: f64, tp: usize, fp: usize, fn_: usize) -> Self {
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        Self {
            threshold,
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }

    pub fn selected(&self) -> usize {
        self.true_positives + self.false_positives
    }
}

/// NaN when the denominator is zero.
pub fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        f64::NAN
    } else {
        num as f64 / denom as f64
    }
}

pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision.is_nan() || recall.is_nan() {
        return f64::NAN;
    }
    let denom = precision + recall;
    if denom > 0.0 {
        2.0 * precision * recall / denom
    } else {
        f64::NAN
    }
}

/// Row with the highest numeric F1; ties keep the lowest threshold.
pub fn best_f1(rows: &[ThresholdResult]) -> Option<&ThresholdResult> {
    let mut best: Option<&ThresholdResult> = None;
    for row in rows.iter().filter(|r| !r.f1.is_nan()) {
        match best {
            Some(b) if b.f1 >= row.f1 => {}
            _ => best = Some(row),
        }
    }
    best
}

fn nan_as_null<S: serde::Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if v.is_nan() {
        s.serialize_none()
    } else {
        s.serialize_f64(*v)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/metrics.rs"]
mod tests;
