use std::path::Path;

use serde::Serialize;

use crate::model::metrics::{ThresholdResult, best_f1};
use crate::model::thresholds::EvalProfile;
use crate::report::{ReportError, write_text};

#[derive(Debug, Clone, Serialize)]
pub struct GroundTruthSummary {
    pub records: usize,
    pub closures: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub overlap_cutoff: f64,
    pub sweep_start: f64,
    pub sweep_stop: f64,
    pub sweep_step: f64,
}

impl From<&EvalProfile> for ProfileSummary {
    fn from(p: &EvalProfile) -> Self {
        Self {
            overlap_cutoff: p.overlap_cutoff,
            sweep_start: p.sweep_start,
            sweep_stop: p.sweep_stop,
            sweep_step: p.sweep_step,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub dataset: &'a str,
    pub ground_truth: GroundTruthSummary,
    pub predictions: usize,
    pub profile: ProfileSummary,
    pub rows: &'a [ThresholdResult],
    pub best_f1: Option<&'a ThresholdResult>,
}

impl<'a> MetricsSummary<'a> {
    pub fn new(
        dataset: &'a str,
        ground_truth: GroundTruthSummary,
        predictions: usize,
        profile: &EvalProfile,
        rows: &'a [ThresholdResult],
    ) -> Self {
        Self {
            tool: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            dataset,
            ground_truth,
            predictions,
            profile: profile.into(),
            rows,
            best_f1: best_f1(rows),
        }
    }
}

pub fn render_summary_json(
    summary: &MetricsSummary<'_>,
    path: &Path,
) -> Result<String, ReportError> {
    serde_json::to_string_pretty(summary).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_summary_json(summary: &MetricsSummary<'_>, path: &Path) -> Result<(), ReportError> {
    let mut json = render_summary_json(summary, path)?;
    json.push('\n');
    write_text(path, &json)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
