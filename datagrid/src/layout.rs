//! Layout reconciler: horizontal geometry shared by header and body.
//!
//! The body container must be exactly [`total_render_width`] wide so the
//! fixed header lines up with the scrolling body.

use crate::column::Column;
use crate::resize::ColumnWidths;

/// Sum of column widths plus the scrollbar width.
pub fn total_render_width(widths: impl IntoIterator<Item = u16>, scrollbar_width: u16) -> u32 {
    widths.into_iter().map(u32::from).sum::<u32>() + u32::from(scrollbar_width)
}

/// Current widths of `columns` in order.
pub fn current_widths(columns: &[&Column], widths: &ColumnWidths) -> Vec<u16> {
    columns.iter().map(|c| widths.width_of(c)).collect()
}

/// x-position where each column starts.
pub fn column_positions(widths: &[u16]) -> Vec<u32> {
    let mut positions = Vec::with_capacity(widths.len());
    let mut x = 0u32;
    for width in widths {
        positions.push(x);
        x += u32::from(*width);
    }
    positions
}

/// Index of the column under `x`, or `None` past the last column.
pub fn column_at_x(widths: &[u16], x: u32) -> Option<usize> {
    let positions = column_positions(widths);
    let index = positions.partition_point(|&start| start <= x).checked_sub(1)?;
    let end = positions[index] + u32::from(widths[index]);
    (x < end).then_some(index)
}
