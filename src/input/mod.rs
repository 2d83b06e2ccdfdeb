use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

pub mod closures;
pub mod table;

pub const LOOP_CLOSURE_DIR: &str = "loop_closure";
pub const GT_CLOSURES_FILE: &str = "gt_closures.txt";
pub const GT_OVERLAPS_FILE: &str = "gt_overlaps.txt";
pub const PREDICTED_CLOSURES_FILE: &str = "predicted_closures.txt";

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("missing input: {} does not exist", path.display())]
    MissingFile { path: PathBuf },
    #[error("malformed input in {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        InputError::MalformedInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Input file locations for one dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalPaths {
    pub gt_closures: PathBuf,
    pub gt_overlaps: PathBuf,
    pub predicted: PathBuf,
}

impl EvalPaths {
    pub fn for_dataset(datadir: &Path) -> Self {
        let lc = datadir.join(LOOP_CLOSURE_DIR);
        Self {
            gt_closures: lc.join(GT_CLOSURES_FILE),
            gt_overlaps: lc.join(GT_OVERLAPS_FILE),
            predicted: datadir.join(PREDICTED_CLOSURES_FILE),
        }
    }

    /// Resolves every file, so a missing one is reported before anything is parsed.
    pub fn resolve(&self) -> Result<Self, InputError> {
        Ok(Self {
            gt_closures: resolve_input(&self.gt_closures)?,
            gt_overlaps: resolve_input(&self.gt_overlaps)?,
            predicted: resolve_input(&self.predicted)?,
        })
    }
}

/// Returns `path`, or `path.gz` when only the compressed variant exists.
pub fn resolve_input(path: &Path) -> Result<PathBuf, InputError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    let mut gz = path.as_os_str().to_owned();
    gz.push(".gz");
    let gz = PathBuf::from(gz);
    if gz.is_file() {
        return Ok(gz);
    }
    Err(InputError::MissingFile {
        path: path.to_path_buf(),
    })
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => InputError::io(path, e),
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
