use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;

use crate::input::InputError;
use crate::scans::PointCloud;

/// Bytes per KITTI point: x, y, z and a fourth channel, all `f32`.
pub const KITTI_POINT_BYTES: usize = 16;
pub const KITTI_EXTENSION: &str = "bin";

/// Reads a KITTI velodyne scan, dropping the fourth channel.
pub fn read_kitti_bin(path: &Path) -> Result<PointCloud, InputError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => InputError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => InputError::io(path, e),
    })?;
    let len = file.metadata().map_err(|e| InputError::io(path, e))?.len();
    if len == 0 {
        return Ok(PointCloud::new());
    }
    let mmap = unsafe { Mmap::map(&file).map_err(|e| InputError::io(path, e))? };
    decode_kitti(&mmap[..], path)
}

pub fn decode_kitti(bytes: &[u8], path: &Path) -> Result<PointCloud, InputError> {
    if bytes.len() % KITTI_POINT_BYTES != 0 {
        return Err(InputError::malformed(
            path,
            format!(
                "{} bytes is not a multiple of the {}-byte point size",
                bytes.len(),
                KITTI_POINT_BYTES
            ),
        ));
    }
    let mut cloud = Vec::with_capacity(bytes.len() / KITTI_POINT_BYTES);
    for point in bytes.chunks_exact(KITTI_POINT_BYTES) {
        cloud.push([
            read_f32(point, 0),
            read_f32(point, 4),
            read_f32(point, 8),
        ]);
    }
    Ok(cloud)
}

/// Rows of `x y z 1.0`, little-endian `f32`.
pub fn encode_kitti(cloud: &[[f32; 3]]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(cloud.len() * KITTI_POINT_BYTES);
    for p in cloud {
        buf.extend_from_slice(&p[0].to_le_bytes());
        buf.extend_from_slice(&p[1].to_le_bytes());
        buf.extend_from_slice(&p[2].to_le_bytes());
        buf.extend_from_slice(&1.0f32.to_le_bytes());
    }
    buf
}

pub fn write_kitti_bin(path: &Path, cloud: &[[f32; 3]]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(&encode_kitti(cloud))?;
    w.flush()
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(buf)
}
