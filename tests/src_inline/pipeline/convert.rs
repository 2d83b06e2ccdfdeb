use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::scans::kitti::read_kitti_bin;
use crate::scans::{PointCloud, Scan};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_closureqc_convert_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

struct MemorySource {
    scans: Vec<(PathBuf, PointCloud)>,
}

impl ScanSource for MemorySource {
    fn len(&self) -> usize {
        self.scans.len()
    }

    fn scans(&self) -> Box<dyn Iterator<Item = Result<Scan, InputError>> + '_> {
        Box::new(self.scans.iter().map(|(path, cloud)| {
            Ok(Scan {
                path: path.clone(),
                cloud: cloud.clone(),
            })
        }))
    }
}

struct FailingSource;

impl ScanSource for FailingSource {
    fn len(&self) -> usize {
        1
    }

    fn scans(&self) -> Box<dyn Iterator<Item = Result<Scan, InputError>> + '_> {
        Box::new(std::iter::once(Err(InputError::malformed(
            Path::new("broken.pcd"),
            "truncated",
        ))))
    }
}

#[test]
fn test_kitti_output_dir_is_sibling() {
    assert_eq!(
        kitti_output_dir(Path::new("/data/ouster/seq01")),
        PathBuf::from("/data/ouster/seq01_kitti")
    );
}

#[test]
fn test_output_file_name_uses_first_dot() {
    assert_eq!(output_file_name(Path::new("/a/000012.ply")), "000012.bin");
    assert_eq!(output_file_name(Path::new("/a/scan.1.pcd")), "scan.bin");
    assert_eq!(output_file_name(Path::new("/a/noext")), "noext.bin");
}

#[test]
fn test_convert_writes_homogeneous_rows() {
    let out = make_temp_dir().join("seq_kitti");
    let source = MemorySource {
        scans: vec![
            (
                PathBuf::from("/in/000000.pcd"),
                vec![[1.0, 2.0, 3.0], [-4.5, 0.25, 9.0]],
            ),
            (PathBuf::from("/in/000001.pcd"), Vec::new()),
        ],
    };

    let summary = convert(&source, &out).unwrap();
    assert_eq!(summary, ConvertSummary { scans: 2, points: 2 });

    let bytes = fs::read(out.join("000000.bin")).unwrap();
    assert_eq!(bytes.len(), 2 * 16);
    let floats: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(floats, vec![1.0, 2.0, 3.0, 1.0, -4.5, 0.25, 9.0, 1.0]);

    assert_eq!(fs::read(out.join("000001.bin")).unwrap().len(), 0);
    assert_eq!(
        read_kitti_bin(&out.join("000000.bin")).unwrap(),
        vec![[1.0, 2.0, 3.0], [-4.5, 0.25, 9.0]]
    );
}

#[test]
fn test_convert_propagates_reader_errors() {
    let out = make_temp_dir().join("out");
    let err = convert(&FailingSource, &out).unwrap_err();
    assert!(err.to_string().contains("broken.pcd"));
}
