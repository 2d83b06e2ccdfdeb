use std::path::Path;

use crate::input::InputError;
use crate::input::table::{parse_f64, read_text_table};
use crate::scans::PointCloud;

/// Plain-text scan: one point per line, first three columns are x y z.
pub fn read_xyz(path: &Path) -> Result<PointCloud, InputError> {
    let table = read_text_table(path)?;
    if !table.is_empty() && table.n_cols < 3 {
        return Err(InputError::malformed(
            path,
            format!("expected at least 3 columns, found {}", table.n_cols),
        ));
    }
    let mut cloud = Vec::with_capacity(table.len());
    for (row, cols) in table.rows.iter().enumerate() {
        cloud.push([
            parse_f64(&cols[0], path, row)? as f32,
            parse_f64(&cols[1], path, row)? as f32,
            parse_f64(&cols[2], path, row)? as f32,
        ]);
    }
    Ok(cloud)
}
