use super::*;

fn scenario_a_row() -> ThresholdResult {
    ThresholdResult::from_counts(0.5, 2, 1, 0)
}

#[test]
fn test_natural_width_layout() {
    let out = render_metrics_table("seq00", &[scenario_a_row()], None);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], format!("{}seq00", " ".repeat(49)));
    assert_eq!(
        lines[2],
        "| Score Threshold | True Positives | False Positives | False Negatives | Precision | Recall | F1 score |"
    );
    assert_eq!(
        lines[3],
        "+=================+================+=================+=================+===========+========+==========+"
    );
    assert_eq!(
        lines[4],
        "|     0.5000      |       2        |        1        |        0        | 0.6667    | 1.0000 | 0.8000   |"
    );
    assert_eq!(lines[1], lines[5]);
    assert!(lines[1].starts_with("+-----------------+"));
    assert!(out.ends_with("+\n"));
}

#[test]
fn test_nan_cells_render_marker() {
    let row = ThresholdResult::from_counts(0.5, 0, 0, 1);
    let cells = metrics_cells(&row);
    assert_eq!(cells, vec!["0.5000", "0", "0", "1", "nan", "0.0000", "nan"]);
}

#[test]
fn test_fixed_width_wraps_headers() {
    let rows: Vec<ThresholdResult> = (0..50)
        .map(|k| ThresholdResult::from_counts(0.5 + k as f64 * 0.01, 120, 3400, 17))
        .collect();
    let out = render_metrics_table("kitti_00", &rows, Some(100));
    for line in out.lines() {
        assert!(line.chars().count() <= 100, "line too wide: {line}");
    }
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[2].contains("Score"));
    assert!(!lines[2].contains("Threshold"));
    assert!(lines[3].contains("Threshold"));
    assert!(lines[4].starts_with("+="));
    assert_eq!(lines.len(), 1 + 1 + 2 + 1 + 50 + 1);
}

#[test]
fn test_width_limit_never_cuts_below_longest_word() {
    let columns = [
        Column {
            header: "Extraordinarily",
            justify: Justify::Left,
        },
        Column {
            header: "B",
            justify: Justify::Center,
        },
    ];
    let out = render_ascii_table("", &columns, &[vec!["x".to_string(), "y".to_string()]], Some(5));
    let first = out.lines().next().unwrap();
    assert_eq!(first, "+-----------------+---+");
}

#[test]
fn test_render_is_deterministic() {
    let rows = vec![scenario_a_row(), ThresholdResult::from_counts(0.6, 1, 0, 1)];
    assert_eq!(
        render_metrics_table("t", &rows, Some(100)),
        render_metrics_table("t", &rows, Some(100))
    );
}
