//! Reorder engine: live column drag sessions.
//!
//! A drag goes idle -> dragging -> idle. Starting a drag snapshots the
//! column order; every update splices a copy of that snapshot, never the
//! live order, so intermediate commits do not compound. The row-index
//! column is never a drag source and never leaves position 0.

use crate::column::{Column, ROW_INDEX_ID};

/// Order snapshot captured when a column drag starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Column order at drag start.
    pub snapshot: Vec<String>,
    /// Identity of the column being dragged.
    pub source_id: String,
}

impl DragSession {
    /// Start dragging `source_id`.
    ///
    /// Returns `None` for the row-index column or an unknown identity.
    pub fn start(order: &[String], source_id: &str) -> Option<Self> {
        if source_id == ROW_INDEX_ID || !order.iter().any(|id| id == source_id) {
            return None;
        }
        Some(Self {
            snapshot: order.to_vec(),
            source_id: source_id.to_string(),
        })
    }

    /// Compute the order for a drag update.
    ///
    /// `source` indexes the snapshot and must hold the dragged identity.
    /// `destination` is `None` while the pointer is outside a drop target;
    /// that yields no new order.
    pub fn update(&self, source: usize, destination: Option<usize>) -> Option<Vec<String>> {
        if self.snapshot.get(source) != Some(&self.source_id) {
            return None;
        }
        splice(&self.snapshot, source, destination?)
    }
}

/// Move the identity at `source` to `destination` in a copy of `order`.
///
/// Other identities keep their relative order. When the row-index column
/// leads the order it cannot be moved and nothing can be dropped before it.
pub fn splice(order: &[String], source: usize, destination: usize) -> Option<Vec<String>> {
    if source >= order.len() {
        return None;
    }
    let pinned = order.first().is_some_and(|id| id == ROW_INDEX_ID);
    if pinned && source == 0 {
        return None;
    }
    let floor = usize::from(pinned);
    let destination = destination.clamp(floor, order.len() - 1);

    let mut next = order.to_vec();
    let moved = next.remove(source);
    next.insert(destination, moved);
    Some(next)
}

/// Carry a column order across a schema change.
///
/// Known identities keep their relative order, new ones append in schema
/// order, removed ones drop out, and the row-index column leads.
pub fn reconcile_order(previous: &[String], columns: &[Column]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(columns.len());
    if columns.iter().any(|c| c.id == ROW_INDEX_ID) {
        order.push(ROW_INDEX_ID.to_string());
    }
    for id in previous {
        if id != ROW_INDEX_ID && columns.iter().any(|c| &c.id == id) && !order.contains(id) {
            order.push(id.clone());
        }
    }
    for column in columns {
        if !order.contains(&column.id) {
            order.push(column.id.clone());
        }
    }
    order
}
