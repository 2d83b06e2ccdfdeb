use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod json;
pub mod table;

pub const METRICS_TXT: &str = "metrics.txt";
pub const METRICS_JSON: &str = "metrics.json";
pub const FILE_WIDTH: usize = 100;
pub const NAN_MARKER: &str = "nan";

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn format_f64_4(v: f64) -> String {
    if v.is_nan() {
        NAN_MARKER.to_string()
    } else {
        format!("{:.4}", v)
    }
}

/// Truncates and rewrites `path`.
pub fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    let wrap = |source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    let mut w = BufWriter::new(File::create(path).map_err(wrap)?);
    w.write_all(contents.as_bytes()).map_err(wrap)?;
    w.flush().map_err(wrap)?;
    Ok(())
}

/// Basename of the dataset directory, used as the table title.
pub fn dataset_name(datadir: &Path) -> String {
    datadir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| datadir.display().to_string())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
