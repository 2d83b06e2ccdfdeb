use std::path::Path;

use crate::input::InputError;
use crate::scans::{PointCloud, read_bytes, split_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Ascii,
    Binary,
}

#[derive(Debug, Clone, PartialEq)]
struct Field {
    name: String,
    size: usize,
    kind: char,
    count: usize,
}

#[derive(Debug, Clone)]
struct PcdHeader {
    fields: Vec<Field>,
    points: usize,
    /// Bytes per point; checked against overflow when the header is parsed.
    stride: usize,
    data: DataFormat,
}

impl PcdHeader {
    /// Byte offset and column index of the named field.
    fn locate(&self, name: &str) -> Option<(usize, usize, &Field)> {
        let mut offset = 0usize;
        let mut column = 0usize;
        for f in &self.fields {
            if f.name == name {
                return Some((offset, column, f));
            }
            offset += f.size * f.count;
            column += f.count;
        }
        None
    }
}

pub fn read_pcd(path: &Path) -> Result<PointCloud, InputError> {
    let raw = read_bytes(path)?;
    let (lines, body) = split_header(&raw, path, |l| l.starts_with("DATA"))?;
    let header = parse_header(&lines, path)?;

    let mut xyz = Vec::with_capacity(3);
    for axis in ["x", "y", "z"] {
        let located = header
            .locate(axis)
            .ok_or_else(|| InputError::malformed(path, format!("missing field '{}'", axis)))?;
        let (_, _, field) = located;
        if field.count == 0 {
            return Err(InputError::malformed(
                path,
                format!("field '{}' has COUNT 0", axis),
            ));
        }
        if field.kind != 'F' || !(field.size == 4 || field.size == 8) {
            return Err(InputError::malformed(
                path,
                format!("field '{}' must be F4 or F8", axis),
            ));
        }
        xyz.push(located);
    }

    match header.data {
        DataFormat::Ascii => read_ascii_body(body, &header, &xyz, path),
        DataFormat::Binary => read_binary_body(body, &header, &xyz, path),
    }
}

fn parse_header(lines: &[String], path: &Path) -> Result<PcdHeader, InputError> {
    let mut names: Vec<String> = Vec::new();
    let mut sizes: Vec<usize> = Vec::new();
    let mut kinds: Vec<char> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut points: Option<usize> = None;
    let mut width: Option<usize> = None;
    let mut height = 1usize;
    let mut data = None;

    for line in lines {
        let mut parts = line.split_whitespace();
        let Some(key) = parts.next() else { continue };
        let values: Vec<&str> = parts.collect();
        match key {
            "FIELDS" => names = values.iter().map(|s| s.to_string()).collect(),
            "SIZE" => sizes = parse_usizes(&values, "SIZE", path)?,
            "TYPE" => kinds = values.iter().filter_map(|s| s.chars().next()).collect(),
            "COUNT" => counts = parse_usizes(&values, "COUNT", path)?,
            "WIDTH" => width = parse_usizes(&values, "WIDTH", path)?.first().copied(),
            "HEIGHT" => {
                height = parse_usizes(&values, "HEIGHT", path)?
                    .first()
                    .copied()
                    .unwrap_or(1)
            }
            "POINTS" => points = parse_usizes(&values, "POINTS", path)?.first().copied(),
            "DATA" => {
                data = Some(match values.first().copied() {
                    Some("ascii") => DataFormat::Ascii,
                    Some("binary") => DataFormat::Binary,
                    other => {
                        return Err(InputError::malformed(
                            path,
                            format!("unsupported DATA format: {}", other.unwrap_or("")),
                        ));
                    }
                })
            }
            _ => {}
        }
    }

    if names.is_empty() {
        return Err(InputError::malformed(path, "missing FIELDS line"));
    }
    if counts.is_empty() {
        counts = vec![1; names.len()];
    }
    if sizes.len() != names.len() || kinds.len() != names.len() || counts.len() != names.len() {
        return Err(InputError::malformed(
            path,
            "FIELDS, SIZE, TYPE and COUNT lengths differ",
        ));
    }
    let points = match (points, width) {
        (Some(points), _) => points,
        (None, Some(width)) => width
            .checked_mul(height)
            .ok_or_else(|| InputError::malformed(path, "WIDTH * HEIGHT overflows"))?,
        (None, None) => return Err(InputError::malformed(path, "missing POINTS/WIDTH header")),
    };
    let data = data.ok_or_else(|| InputError::malformed(path, "missing DATA line"))?;

    let fields = names
        .into_iter()
        .zip(sizes)
        .zip(kinds)
        .zip(counts)
        .map(|(((name, size), kind), count)| Field {
            name,
            size,
            kind,
            count,
        })
        .collect::<Vec<_>>();

    let stride = fields
        .iter()
        .try_fold(0usize, |acc, f| f.size.checked_mul(f.count)?.checked_add(acc))
        .ok_or_else(|| InputError::malformed(path, "point size overflows"))?;
    if stride == 0 {
        return Err(InputError::malformed(path, "point size is zero"));
    }

    Ok(PcdHeader {
        fields,
        points,
        stride,
        data,
    })
}

fn parse_usizes(values: &[&str], key: &str, path: &Path) -> Result<Vec<usize>, InputError> {
    values
        .iter()
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| InputError::malformed(path, format!("invalid {} value '{}'", key, v)))
        })
        .collect()
}

fn read_ascii_body(
    body: &[u8],
    header: &PcdHeader,
    xyz: &[(usize, usize, &Field)],
    path: &Path,
) -> Result<PointCloud, InputError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| InputError::malformed(path, "ascii body is not valid UTF-8"))?;
    let n_cols: usize = header.fields.iter().map(|f| f.count).sum();
    // Every point needs at least one byte of text.
    let mut cloud = Vec::with_capacity(header.points.min(body.len()));
    for (row, line) in text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
    {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() != n_cols {
            return Err(InputError::malformed(
                path,
                format!("point {} has {} values, expected {}", row, cols.len(), n_cols),
            ));
        }
        let mut p = [0.0f32; 3];
        for (axis, &(_, column, _)) in xyz.iter().enumerate() {
            p[axis] = cols[column].parse::<f32>().map_err(|_| {
                InputError::malformed(
                    path,
                    format!("point {}: invalid value '{}'", row, cols[column]),
                )
            })?;
        }
        cloud.push(p);
    }
    if cloud.len() != header.points {
        return Err(InputError::malformed(
            path,
            format!("expected {} points, found {}", header.points, cloud.len()),
        ));
    }
    Ok(cloud)
}

fn read_binary_body(
    body: &[u8],
    header: &PcdHeader,
    xyz: &[(usize, usize, &Field)],
    path: &Path,
) -> Result<PointCloud, InputError> {
    let stride = header.stride;
    let expected = stride.checked_mul(header.points).ok_or_else(|| {
        InputError::malformed(path, format!("POINTS {} overflows the data size", header.points))
    })?;
    if body.len() < expected {
        return Err(InputError::malformed(
            path,
            format!(
                "binary data too short: have {} bytes, expected {}",
                body.len(),
                expected
            ),
        ));
    }
    let mut cloud = Vec::with_capacity(header.points);
    for point in body[..expected].chunks_exact(stride) {
        let mut p = [0.0f32; 3];
        for (axis, &(offset, _, field)) in xyz.iter().enumerate() {
            p[axis] = read_float(point, offset, field.size);
        }
        cloud.push(p);
    }
    Ok(cloud)
}

fn read_float(bytes: &[u8], offset: usize, size: usize) -> f32 {
    if size == 8 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes[offset..offset + 8]);
        f64::from_le_bytes(buf) as f32
    } else {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&bytes[offset..offset + 4]);
        f32::from_le_bytes(buf)
    }
}
