use std::path::Path;

use tracing::{info, warn};

use crate::input::table::{
    expect_columns, parse_f64, parse_index, read_text_table, truncate_index,
};
use crate::input::{EvalPaths, InputError};
use crate::model::closure::{GroundTruthSet, PredictedClosure};

pub fn load_ground_truth(
    closures_path: &Path,
    overlaps_path: &Path,
    cutoff: f64,
) -> Result<GroundTruthSet, InputError> {
    let pairs_table = read_text_table(closures_path)?;
    expect_columns(&pairs_table, 2, closures_path)?;
    let overlaps_table = read_text_table(overlaps_path)?;
    expect_columns(&overlaps_table, 1, overlaps_path)?;

    if pairs_table.len() != overlaps_table.len() {
        return Err(InputError::malformed(
            overlaps_path,
            format!(
                "{} overlap scores for {} closure pairs in {}",
                overlaps_table.len(),
                pairs_table.len(),
                closures_path.display()
            ),
        ));
    }

    let mut records = Vec::with_capacity(pairs_table.len());
    for (row, (pair, overlap)) in pairs_table
        .rows
        .iter()
        .zip(overlaps_table.rows.iter())
        .enumerate()
    {
        let a = parse_index(&pair[0], closures_path, row)?;
        let b = parse_index(&pair[1], closures_path, row)?;
        let overlap = parse_f64(&overlap[0], overlaps_path, row)?;
        records.push(((a, b), overlap));
    }

    let gt = GroundTruthSet::from_records(records, cutoff);
    info!(
        records = gt.records_read(),
        closures = gt.len(),
        cutoff,
        "loaded ground-truth closures from {}",
        closures_path.display()
    );
    if gt.is_empty() {
        warn!("no ground-truth closure has overlap above {cutoff}; recall is undefined");
    }
    Ok(gt)
}

pub fn load_predictions(path: &Path) -> Result<Vec<PredictedClosure>, InputError> {
    let table = read_text_table(path)?;
    expect_columns(&table, 3, path)?;

    let mut out = Vec::with_capacity(table.len());
    for (row, cols) in table.rows.iter().enumerate() {
        let a = truncate_index(parse_f64(&cols[0], path, row)?, path, row)?;
        let b = truncate_index(parse_f64(&cols[1], path, row)?, path, row)?;
        let score = parse_f64(&cols[2], path, row)?;
        out.push(PredictedClosure { a, b, score });
    }

    info!(
        predictions = out.len(),
        "loaded predicted closures from {}",
        path.display()
    );
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct EvalInputs {
    pub ground_truth: GroundTruthSet,
    pub predictions: Vec<PredictedClosure>,
}

/// Loads everything a dataset evaluation needs, failing on the first bad file.
pub fn load_eval_inputs(datadir: &Path, cutoff: f64) -> Result<EvalInputs, InputError> {
    if !datadir.is_dir() {
        return Err(InputError::MissingFile {
            path: datadir.to_path_buf(),
        });
    }
    let paths = EvalPaths::for_dataset(datadir).resolve()?;
    let ground_truth = load_ground_truth(&paths.gt_closures, &paths.gt_overlaps, cutoff)?;
    let predictions = load_predictions(&paths.predicted)?;
    Ok(EvalInputs {
        ground_truth,
        predictions,
    })
}
