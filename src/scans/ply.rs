use std::path::Path;

use crate::input::InputError;
use crate::scans::{PointCloud, read_bytes, split_header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl PropType {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "char" | "int8" => PropType::I8,
            "uchar" | "uint8" => PropType::U8,
            "short" | "int16" => PropType::I16,
            "ushort" | "uint16" => PropType::U16,
            "int" | "int32" => PropType::I32,
            "uint" | "uint32" => PropType::U32,
            "float" | "float32" => PropType::F32,
            "double" | "float64" => PropType::F64,
            _ => return None,
        })
    }

    fn byte_size(self) -> usize {
        match self {
            PropType::I8 | PropType::U8 => 1,
            PropType::I16 | PropType::U16 => 2,
            PropType::I32 | PropType::U32 | PropType::F32 => 4,
            PropType::F64 => 8,
        }
    }

    fn read_le(self, b: &[u8]) -> f32 {
        match self {
            PropType::I8 => b[0] as i8 as f32,
            PropType::U8 => b[0] as f32,
            PropType::I16 => i16::from_le_bytes([b[0], b[1]]) as f32,
            PropType::U16 => u16::from_le_bytes([b[0], b[1]]) as f32,
            PropType::I32 => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
            PropType::U32 => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
            PropType::F32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            PropType::F64 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&b[..8]);
                f64::from_le_bytes(buf) as f32
            }
        }
    }
}

#[derive(Debug, Clone)]
struct PlyHeader {
    format: PlyFormat,
    vertex_count: usize,
    properties: Vec<(String, PropType)>,
}

/// Reads the vertex positions of a PLY file. The vertex element must come first.
pub fn read_ply(path: &Path) -> Result<PointCloud, InputError> {
    let raw = read_bytes(path)?;
    let (lines, body) = split_header(&raw, path, |l| l == "end_header")?;
    let header = parse_header(&lines, path)?;

    let mut xyz = [0usize; 3];
    for (axis, name) in ["x", "y", "z"].iter().enumerate() {
        xyz[axis] = header
            .properties
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| {
                InputError::malformed(path, format!("missing vertex property '{}'", name))
            })?;
    }

    match header.format {
        PlyFormat::Ascii => read_ascii_body(body, &header, xyz, path),
        PlyFormat::BinaryLittleEndian => read_binary_body(body, &header, xyz, path),
    }
}

fn parse_header(lines: &[String], path: &Path) -> Result<PlyHeader, InputError> {
    if lines.first().map(String::as_str) != Some("ply") {
        return Err(InputError::malformed(path, "file does not start with 'ply'"));
    }

    let mut format = None;
    let mut vertex_count = None;
    let mut properties = Vec::new();
    let mut in_vertex = false;
    let mut seen_element = false;

    for line in &lines[1..] {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            ["format", "ascii", ..] => format = Some(PlyFormat::Ascii),
            ["format", "binary_little_endian", ..] => format = Some(PlyFormat::BinaryLittleEndian),
            ["format", other, ..] => {
                return Err(InputError::malformed(
                    path,
                    format!("unsupported PLY format: {}", other),
                ));
            }
            ["element", "vertex", count] => {
                if seen_element {
                    return Err(InputError::malformed(
                        path,
                        "vertex element must be the first element",
                    ));
                }
                seen_element = true;
                in_vertex = true;
                vertex_count = Some(count.parse::<usize>().map_err(|_| {
                    InputError::malformed(path, format!("invalid vertex count '{}'", count))
                })?);
            }
            ["element", ..] => {
                seen_element = true;
                in_vertex = false;
            }
            ["property", "list", ..] if in_vertex => {
                return Err(InputError::malformed(
                    path,
                    "list properties on vertices are not supported",
                ));
            }
            ["property", ty, name] if in_vertex => {
                let ty = PropType::parse(ty).ok_or_else(|| {
                    InputError::malformed(path, format!("unsupported property type '{}'", ty))
                })?;
                properties.push((name.to_string(), ty));
            }
            _ => {}
        }
    }

    Ok(PlyHeader {
        format: format.ok_or_else(|| InputError::malformed(path, "missing format line"))?,
        vertex_count: vertex_count
            .ok_or_else(|| InputError::malformed(path, "missing vertex element"))?,
        properties,
    })
}

fn read_ascii_body(
    body: &[u8],
    header: &PlyHeader,
    xyz: [usize; 3],
    path: &Path,
) -> Result<PointCloud, InputError> {
    let text = std::str::from_utf8(body)
        .map_err(|_| InputError::malformed(path, "ascii body is not valid UTF-8"))?;
    let mut cloud = Vec::with_capacity(header.vertex_count.min(body.len()));
    let mut rows = text.lines().map(str::trim).filter(|l| !l.is_empty());
    for row in 0..header.vertex_count {
        let line = rows.next().ok_or_else(|| {
            InputError::malformed(
                path,
                format!("expected {} vertices, found {}", header.vertex_count, row),
            )
        })?;
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() != header.properties.len() {
            return Err(InputError::malformed(
                path,
                format!(
                    "vertex {} has {} values, expected {}",
                    row,
                    cols.len(),
                    header.properties.len()
                ),
            ));
        }
        let mut p = [0.0f32; 3];
        for axis in 0..3 {
            let token = cols[xyz[axis]];
            p[axis] = token.parse::<f32>().map_err(|_| {
                InputError::malformed(path, format!("vertex {}: invalid value '{}'", row, token))
            })?;
        }
        cloud.push(p);
    }
    Ok(cloud)
}

fn read_binary_body(
    body: &[u8],
    header: &PlyHeader,
    xyz: [usize; 3],
    path: &Path,
) -> Result<PointCloud, InputError> {
    let mut offsets = Vec::with_capacity(header.properties.len());
    let mut stride = 0usize;
    for (_, ty) in &header.properties {
        offsets.push(stride);
        stride += ty.byte_size();
    }
    let expected = stride.checked_mul(header.vertex_count).ok_or_else(|| {
        InputError::malformed(
            path,
            format!("vertex count {} overflows the data size", header.vertex_count),
        )
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
    let mut cloud = Vec::with_capacity(header.vertex_count);
    for vertex in body[..expected].chunks_exact(stride) {
        let mut p = [0.0f32; 3];
        for axis in 0..3 {
            let idx = xyz[axis];
            p[axis] = header.properties[idx].1.read_le(&vertex[offsets[idx]..]);
        }
        cloud.push(p);
    }
    Ok(cloud)
}
