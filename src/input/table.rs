use std::path::Path;

use crate::input::{InputError, open_maybe_gz};

/// Whitespace-delimited numeric text with `#` comments. Every row has `n_cols` tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub n_cols: usize,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn read_text_table(path: &Path) -> Result<TextTable, InputError> {
    let mut reader = open_maybe_gz(path)?;
    let mut buf = String::new();
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut n_cols: Option<usize> = None;
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_line(&mut buf)
            .map_err(|e| InputError::io(path, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = match buf.find('#') {
            Some(pos) => &buf[..pos],
            None => buf.as_str(),
        };
        let cols: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if cols.is_empty() {
            continue;
        }
        match n_cols {
            None => n_cols = Some(cols.len()),
            Some(expected) if expected != cols.len() => {
                return Err(InputError::malformed(
                    path,
                    format!(
                        "line {} has {} columns, expected {}",
                        line_no,
                        cols.len(),
                        expected
                    ),
                ));
            }
            Some(_) => {}
        }
        rows.push(cols);
    }

    Ok(TextTable {
        n_cols: n_cols.unwrap_or(0),
        rows,
    })
}

/// Fails unless the table is empty or has exactly `expected` columns.
pub fn expect_columns(table: &TextTable, expected: usize, path: &Path) -> Result<(), InputError> {
    if !table.is_empty() && table.n_cols != expected {
        return Err(InputError::malformed(
            path,
            format!("expected {} columns per row, found {}", expected, table.n_cols),
        ));
    }
    Ok(())
}

pub fn parse_f64(token: &str, path: &Path, row: usize) -> Result<f64, InputError> {
    token.parse::<f64>().map_err(|_| {
        InputError::malformed(path, format!("row {}: invalid number '{}'", row + 1, token))
    })
}

pub fn parse_index(token: &str, path: &Path, row: usize) -> Result<u32, InputError> {
    token.parse::<u32>().map_err(|_| {
        InputError::malformed(
            path,
            format!("row {}: invalid frame index '{}'", row + 1, token),
        )
    })
}

/// Float index cast toward zero, as in the prediction files.
pub fn truncate_index(value: f64, path: &Path, row: usize) -> Result<u32, InputError> {
    if !value.is_finite() || value < 0.0 || value >= u32::MAX as f64 + 1.0 {
        return Err(InputError::malformed(
            path,
            format!("row {}: frame index {} out of range", row + 1, value),
        ));
    }
    Ok(value.trunc() as u32)
}
