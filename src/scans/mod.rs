use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::InputError;

pub mod kitti;
pub mod pcd;
pub mod ply;
pub mod xyz;

pub type PointCloud = Vec<[f32; 3]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub path: PathBuf,
    pub cloud: PointCloud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
    KittiBin,
    Pcd,
    Ply,
    Xyz,
}

impl ScanFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "bin" => Some(ScanFormat::KittiBin),
            "pcd" => Some(ScanFormat::Pcd),
            "ply" => Some(ScanFormat::Ply),
            "xyz" | "txt" => Some(ScanFormat::Xyz),
            _ => None,
        }
    }

    pub fn read(self, path: &Path) -> Result<PointCloud, InputError> {
        match self {
            ScanFormat::KittiBin => kitti::read_kitti_bin(path),
            ScanFormat::Pcd => pcd::read_pcd(path),
            ScanFormat::Ply => ply::read_ply(path),
            ScanFormat::Xyz => xyz::read_xyz(path),
        }
    }
}

/// Ordered point clouds of one dataset directory.
pub trait ScanSource {
    fn len(&self) -> usize;

    fn scans(&self) -> Box<dyn Iterator<Item = Result<Scan, InputError>> + '_>;
}

#[derive(Debug, Clone)]
pub struct ScanDirectory {
    pub dir: PathBuf,
    pub format: ScanFormat,
    pub files: Vec<PathBuf>,
}

impl ScanDirectory {
    /// Picks the format of the first supported file in natural order and keeps only
    /// files of that format.
    pub fn open(dir: &Path) -> Result<Self, InputError> {
        if !dir.is_dir() {
            return Err(InputError::MissingFile {
                path: dir.to_path_buf(),
            });
        }
        let entries = fs::read_dir(dir).map_err(|e| InputError::io(dir, e))?;
        let mut candidates = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| InputError::io(dir, e))?.path();
            if path.is_file() && ScanFormat::from_path(&path).is_some() {
                candidates.push(path);
            }
        }
        candidates.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));

        let format = candidates
            .first()
            .and_then(|p| ScanFormat::from_path(p))
            .ok_or_else(|| InputError::malformed(dir, "no supported scan files found"))?;
        let files = candidates
            .into_iter()
            .filter(|p| ScanFormat::from_path(p) == Some(format))
            .collect();

        Ok(Self {
            dir: dir.to_path_buf(),
            format,
            files,
        })
    }
}

impl ScanSource for ScanDirectory {
    fn len(&self) -> usize {
        self.files.len()
    }

    fn scans(&self) -> Box<dyn Iterator<Item = Result<Scan, InputError>> + '_> {
        Box::new(self.files.iter().map(move |path| {
            let cloud = self.format.read(path)?;
            Ok(Scan {
                path: path.clone(),
                cloud,
            })
        }))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Orders digit runs numerically, so "2.bin" sorts before "10.bin".
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (x, y) {
            (Chunk::Digits(dx), Chunk::Digits(dy)) => {
                let tx = dx.trim_start_matches('0');
                let ty = dy.trim_start_matches('0');
                tx.len()
                    .cmp(&ty.len())
                    .then_with(|| tx.cmp(ty))
                    .then_with(|| dx.len().cmp(&dy.len()))
            }
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
            (Chunk::Text(tx), Chunk::Text(ty)) => tx.cmp(ty),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len())
}

#[derive(Debug)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut in_digits: Option<bool> = None;
    for (idx, ch) in s.char_indices() {
        let digit = ch.is_ascii_digit();
        match in_digits {
            Some(d) if d != digit => {
                out.push(make_chunk(&s[start..idx], d));
                start = idx;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(d) = in_digits {
        out.push(make_chunk(&s[start..], d));
    }
    out
}

fn make_chunk(s: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Digits(s)
    } else {
        Chunk::Text(s)
    }
}

pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>, InputError> {
    fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => InputError::io(path, e),
    })
}

/// Splits an ASCII header from the body at the line that satisfies `is_last`.
pub(crate) fn split_header<'a>(
    raw: &'a [u8],
    path: &Path,
    is_last: impl Fn(&str) -> bool,
) -> Result<(Vec<String>, &'a [u8]), InputError> {
    let mut lines = Vec::new();
    let mut pos = 0usize;
    while pos < raw.len() {
        let end = raw[pos..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|o| pos + o + 1)
            .unwrap_or(raw.len());
        let line = std::str::from_utf8(&raw[pos..end])
            .map_err(|_| InputError::malformed(path, "header is not valid UTF-8"))?
            .trim()
            .to_string();
        pos = end;
        let last = is_last(&line);
        lines.push(line);
        if last {
            return Ok((lines, &raw[pos..]));
        }
    }
    Err(InputError::malformed(path, "unterminated header"))
}

#[cfg(test)]
#[path = "../../tests/src_inline/scans/tests.rs"]
mod tests;
