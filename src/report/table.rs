use crate::model::metrics::ThresholdResult;
use crate::report::format_f64_4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub justify: Justify,
}

pub const METRICS_COLUMNS: [Column; 7] = [
    Column {
        header: "Score Threshold",
        justify: Justify::Center,
    },
    Column {
        header: "True Positives",
        justify: Justify::Center,
    },
    Column {
        header: "False Positives",
        justify: Justify::Center,
    },
    Column {
        header: "False Negatives",
        justify: Justify::Center,
    },
    Column {
        header: "Precision",
        justify: Justify::Left,
    },
    Column {
        header: "Recall",
        justify: Justify::Left,
    },
    Column {
        header: "F1 score",
        justify: Justify::Left,
    },
];

pub fn metrics_cells(row: &ThresholdResult) -> Vec<String> {
    vec![
        format_f64_4(row.threshold),
        row.true_positives.to_string(),
        row.false_positives.to_string(),
        row.false_negatives.to_string(),
        format_f64_4(row.precision),
        format_f64_4(row.recall),
        format_f64_4(row.f1),
    ]
}

pub fn render_metrics_table(
    title: &str,
    results: &[ThresholdResult],
    max_width: Option<usize>,
) -> String {
    let rows: Vec<Vec<String>> = results.iter().map(metrics_cells).collect();
    render_ascii_table(title, &METRICS_COLUMNS, &rows, max_width)
}

/// ASCII box with a `=` rule under the header. Headers wrap when `max_width` forces
/// columns below their natural width; cells never wrap.
pub fn render_ascii_table(
    title: &str,
    columns: &[Column],
    rows: &[Vec<String>],
    max_width: Option<usize>,
) -> String {
    let widths = fit_widths(columns, rows, max_width);
    let table_width = total_width(&widths);
    let mut out = String::new();

    if !title.is_empty() {
        out.push_str(align(title, table_width, Justify::Center).trim_end());
        out.push('\n');
    }

    out.push_str(&rule(&widths, '-'));

    let header_lines: Vec<Vec<String>> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| wrap_words(c.header, w))
        .collect();
    let height = header_lines.iter().map(Vec::len).max().unwrap_or(0);
    for line in 0..height {
        let cells: Vec<(&str, Justify)> = header_lines
            .iter()
            .zip(columns)
            .map(|(lines, c)| (lines.get(line).map(String::as_str).unwrap_or(""), c.justify))
            .collect();
        out.push_str(&row_line(&cells, &widths));
    }

    out.push_str(&rule(&widths, '='));

    for row in rows {
        let cells: Vec<(&str, Justify)> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (row.get(i).map(String::as_str).unwrap_or(""), c.justify))
            .collect();
        out.push_str(&row_line(&cells, &widths));
    }

    out.push_str(&rule(&widths, '-'));
    out
}

fn total_width(widths: &[usize]) -> usize {
    1 + widths.iter().map(|w| w + 3).sum::<usize>()
}

fn fit_widths(columns: &[Column], rows: &[Vec<String>], max_width: Option<usize>) -> Vec<usize> {
    let mut widths = Vec::with_capacity(columns.len());
    let mut minimums = Vec::with_capacity(columns.len());
    for (i, c) in columns.iter().enumerate() {
        let cell_max = rows
            .iter()
            .filter_map(|r| r.get(i))
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0);
        let longest_word = c
            .header
            .split_whitespace()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(0);
        widths.push(cell_max.max(c.header.chars().count()));
        minimums.push(cell_max.max(longest_word));
    }

    let Some(limit) = max_width else {
        return widths;
    };
    while total_width(&widths) > limit {
        let mut pick: Option<usize> = None;
        for i in 0..widths.len() {
            if widths[i] <= minimums[i] {
                continue;
            }
            match pick {
                Some(p) if widths[p] >= widths[i] => {}
                _ => pick = Some(i),
            }
        }
        match pick {
            Some(i) => widths[i] -= 1,
            None => break,
        }
    }
    widths
}

fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn align(text: &str, width: usize, justify: Justify) -> String {
    let len = text.chars().count();
    let excess = width.saturating_sub(len);
    let (left, right) = match justify {
        Justify::Left => (0, excess),
        Justify::Center => (excess / 2, excess - excess / 2),
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for &w in widths {
        line.extend(std::iter::repeat_n(fill, w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn row_line(cells: &[(&str, Justify)], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (&(text, justify), &w) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(&align(text, w, justify));
        line.push_str(" |");
    }
    line.push('\n');
    line
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/table.rs"]
mod tests;
