use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::input::EvalPaths;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_closureqc_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_dataset(dir: &Path) {
    let paths = EvalPaths::for_dataset(dir);
    fs::create_dir_all(paths.gt_closures.parent().unwrap()).unwrap();
    fs::write(&paths.gt_closures, "1 2\n4 3\n7 8\n").unwrap();
    fs::write(&paths.gt_overlaps, "0.9\n0.7\n0.5\n").unwrap();
    fs::write(&paths.predicted, "1 2 0.9\n3 4 0.6\n5 6 0.95\n").unwrap();
}

#[test]
fn test_parse_eval_defaults() {
    let cli = Cli::try_parse_from(["kira-closureqc", "eval", "data/seq00"]).unwrap();
    let Command::Eval(args) = cli.command else {
        panic!("expected eval command");
    };
    assert_eq!(args.datadir, PathBuf::from("data/seq00"));
    assert_eq!(args.profile(), EvalProfile::default_v1());
    assert!(!args.json);
}

#[test]
fn test_parse_eval_overrides() {
    let cli = Cli::try_parse_from([
        "kira-closureqc",
        "eval",
        "d",
        "--overlap-cutoff",
        "0.3",
        "--sweep-step",
        "0.05",
        "--json",
    ])
    .unwrap();
    let Command::Eval(args) = cli.command else {
        panic!("expected eval command");
    };
    let profile = args.profile();
    assert_eq!(profile.overlap_cutoff, 0.3);
    assert_eq!(profile.sweep_step, 0.05);
    assert!(args.json);
}

#[test]
fn test_parse_requires_datadir() {
    assert!(Cli::try_parse_from(["kira-closureqc", "eval"]).is_err());
    assert!(Cli::try_parse_from(["kira-closureqc"]).is_err());
}

#[test]
fn test_parse_convert() {
    let cli =
        Cli::try_parse_from(["kira-closureqc", "convert", "scans", "--out", "/tmp/k"]).unwrap();
    let Command::Convert(args) = cli.command else {
        panic!("expected convert command");
    };
    assert_eq!(args.datadir, PathBuf::from("scans"));
    assert_eq!(args.out, Some(PathBuf::from("/tmp/k")));
}

#[test]
fn test_evaluate_writes_console_and_file() {
    let dir = make_temp_dir().join("seq00");
    write_dataset(&dir);

    let mut console = Vec::new();
    let rows = evaluate(&dir, &EvalProfile::default_v1(), true, &mut console).unwrap();
    assert_eq!(rows.len(), 50);
    assert_eq!(rows[0].true_positives, 2);
    assert_eq!(rows[0].false_positives, 1);
    assert_eq!(rows[0].false_negatives, 0);

    let console = String::from_utf8(console).unwrap();
    assert!(console.lines().next().unwrap().trim() == "seq00");
    assert!(console.contains("| 0.6667    |"));

    let file = fs::read_to_string(dir.join(METRICS_TXT)).unwrap();
    assert!(file.lines().all(|l| l.chars().count() <= FILE_WIDTH));
    assert!(file.contains("0.9900"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join(METRICS_JSON)).unwrap()).unwrap();
    assert_eq!(json["ground_truth"]["closures"], 2);
    assert_eq!(json["rows"].as_array().unwrap().len(), 50);
}

#[test]
fn test_evaluate_fails_before_any_output() {
    let dir = make_temp_dir().join("broken");
    write_dataset(&dir);
    let paths = EvalPaths::for_dataset(&dir);
    fs::write(&paths.gt_overlaps, "0.9\n").unwrap();

    let mut console = Vec::new();
    let err = evaluate(&dir, &EvalProfile::default_v1(), false, &mut console).unwrap_err();
    assert!(matches!(err, RunError::Input(InputError::MalformedInput { .. })));
    assert!(err.to_string().contains("gt_overlaps.txt"));
    assert!(console.is_empty());
    assert!(!dir.join(METRICS_TXT).exists());
}

#[test]
fn test_evaluate_rejects_invalid_profile() {
    let dir = make_temp_dir().join("seq");
    write_dataset(&dir);
    let profile = EvalProfile {
        sweep_step: -0.01,
        ..EvalProfile::default_v1()
    };
    let err = evaluate(&dir, &profile, false, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, RunError::Profile(_)));
}

#[test]
fn test_run_convert_end_to_end() {
    let root = make_temp_dir();
    let scans = root.join("drive");
    fs::create_dir_all(&scans).unwrap();
    fs::write(scans.join("000001.xyz"), "1 2 3\n").unwrap();
    fs::write(scans.join("000000.xyz"), "4 5 6\n7 8 9\n").unwrap();

    let out = kitti_output_dir(&scans);
    let summary = run_convert(&scans, &out).unwrap();
    assert_eq!(summary.scans, 2);
    assert_eq!(summary.points, 3);
    assert_eq!(out, root.join("drive_kitti"));
    assert_eq!(fs::read(out.join("000000.bin")).unwrap().len(), 32);
    assert_eq!(fs::read(out.join("000001.bin")).unwrap().len(), 16);
}
