use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::input::InputError;
use crate::scans::ScanSource;
use crate::scans::kitti::{KITTI_EXTENSION, write_kitti_bin};

pub const KITTI_DIR_SUFFIX: &str = "_kitti";
const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertSummary {
    pub scans: usize,
    pub points: usize,
}

/// `<parent>/<name>_kitti` next to the dataset directory.
pub fn kitti_output_dir(datadir: &Path) -> PathBuf {
    let name = datadir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = datadir.parent().unwrap_or_else(|| Path::new("."));
    parent.join(format!("{}{}", name, KITTI_DIR_SUFFIX))
}

/// File name up to its first `.`, so `000001.ply` and `000001.tar.ply` both map to `000001.bin`.
pub fn output_file_name(scan_path: &Path) -> String {
    let name = scan_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.split('.').next().unwrap_or_default();
    format!("{}.{}", stem, KITTI_EXTENSION)
}

pub fn convert(source: &dyn ScanSource, out_dir: &Path) -> Result<ConvertSummary, InputError> {
    fs::create_dir_all(out_dir).map_err(|e| InputError::io(out_dir, e))?;

    let total = source.len();
    info!(scans = total, "writing KITTI scans to {}", out_dir.display());

    let mut summary = ConvertSummary::default();
    for scan in source.scans() {
        let scan = scan?;
        let out_path = out_dir.join(output_file_name(&scan.path));
        write_kitti_bin(&out_path, &scan.cloud).map_err(|e| InputError::io(&out_path, e))?;
        debug!(
            points = scan.cloud.len(),
            "{} -> {}",
            scan.path.display(),
            out_path.display()
        );

        summary.scans += 1;
        summary.points += scan.cloud.len();
        if summary.scans % PROGRESS_EVERY == 0 {
            info!("converted {}/{} scans", summary.scans, total);
        }
    }

    info!(
        scans = summary.scans,
        points = summary.points,
        "conversion finished"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/convert.rs"]
mod tests;
