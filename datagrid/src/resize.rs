//! Resize engine: per-column widths under live drags.
//!
//! Widths are independent. Resizing one column never changes another.

use std::collections::HashMap;

use crate::column::Column;

/// Clamp `current + delta` to at least `min_width`.
pub fn resized_width(current: u16, delta: i32, min_width: u16) -> u16 {
    let target = (current as i32 + delta).clamp(0, u16::MAX as i32) as u16;
    target.max(min_width)
}

/// Per-column width overrides keyed by column identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    overrides: HashMap<String, u16>,
}

impl ColumnWidths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current width of a column: the override, or its registered width.
    pub fn width_of(&self, column: &Column) -> u16 {
        self.overrides
            .get(&column.id)
            .copied()
            .unwrap_or(column.width)
            .max(column.min_width)
    }

    /// Apply a delta to a column. Returns the new width.
    pub fn resize(&mut self, column: &Column, delta: i32) -> u16 {
        let width = resized_width(self.width_of(column), delta, column.min_width);
        self.overrides.insert(column.id.clone(), width);
        width
    }

    /// Set an absolute width, clamped to the column minimum.
    pub fn set(&mut self, column: &Column, width: u16) -> u16 {
        let width = width.max(column.min_width);
        self.overrides.insert(column.id.clone(), width);
        width
    }

    /// Drop the override for a column. Returns `true` if one existed.
    pub fn reset(&mut self, column_id: &str) -> bool {
        self.overrides.remove(column_id).is_some()
    }

    /// Drop overrides for identities not in `keep`.
    pub fn retain_ids(&mut self, keep: &[Column]) {
        self.overrides
            .retain(|id, _| keep.iter().any(|column| &column.id == id));
    }

    /// The override for a column id, if any.
    pub fn get(&self, column_id: &str) -> Option<u16> {
        self.overrides.get(column_id).copied()
    }
}

/// A resize drag in progress.
///
/// Deltas are measured from where the drag started, so repeated updates do
/// not accumulate rounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub column_id: String,
    pub start_width: u16,
    pub min_width: u16,
}

impl ResizeSession {
    /// Start resizing a column from its current width.
    pub fn begin(column: &Column, widths: &ColumnWidths) -> Self {
        Self {
            column_id: column.id.clone(),
            start_width: widths.width_of(column),
            min_width: column.min_width,
        }
    }

    /// The width for a total drag distance from the start point.
    pub fn width_for(&self, delta: i32) -> u16 {
        resized_width(self.start_width, delta, self.min_width)
    }
}
