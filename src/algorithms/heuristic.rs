use crate::grid::Position;

/// Straight-line distance between two cells.
pub fn euclidean(a: Position, b: Position) -> f64 {
    let d_row = a.row.abs_diff(b.row) as f64;
    let d_col = a.col.abs_diff(b.col) as f64;
    (d_row * d_row + d_col * d_col).sqrt()
}
