//! Virtualization window: which rows get materialized.
//!
//! Small row sets render in full. Larger ones render only the rows that
//! intersect the viewport (plus overscan), each assigned a recycled slot.
//! Every computation is a pure function of the row count, the scroll
//! offset and the viewport, so repeated scroll events are idempotent.

use std::ops::Range;

/// Rendering path for the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Every row is rendered.
    Direct,
    /// Only rows intersecting the viewport are rendered.
    Windowed,
}

/// Pick the rendering path. Counts above `threshold` are windowed.
pub fn choose_strategy(row_count: usize, threshold: usize) -> RenderStrategy {
    if row_count > threshold {
        RenderStrategy::Windowed
    } else {
        RenderStrategy::Direct
    }
}

/// Fixed-size viewport geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_height: u16,
    pub height: u16,
    pub overscan: usize,
}

impl Viewport {
    /// Rows that fit in the viewport, rounding partial rows up.
    pub fn visible_rows(&self) -> usize {
        if self.row_height == 0 {
            return 0;
        }
        self.height.div_ceil(self.row_height) as usize
    }

    /// Number of recycled slots. Enough for every row a window can hold.
    pub fn slot_count(&self) -> usize {
        self.visible_rows() + 1 + 2 * self.overscan
    }

    /// Total height of `row_count` rows.
    pub fn content_height(&self, row_count: usize) -> u32 {
        row_top(row_count, self.row_height)
    }

    /// Largest scroll offset that still fills the viewport.
    pub fn max_scroll_offset(&self, row_count: usize) -> u32 {
        self.content_height(row_count)
            .saturating_sub(u32::from(self.height))
    }

    /// Clamp a scroll offset to the valid range.
    pub fn clamp_offset(&self, offset: u32, row_count: usize) -> u32 {
        offset.min(self.max_scroll_offset(row_count))
    }
}

/// Offset of a row's top edge. Saturates instead of overflowing.
pub fn row_top(index: usize, row_height: u16) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(u32::from(row_height))
}

/// Row indices intersecting the viewport at `scroll_offset`, with overscan.
///
/// The end follows the viewport's bottom edge, so a partly visible last
/// row is included.
pub fn visible_range(row_count: usize, scroll_offset: u32, viewport: &Viewport) -> Range<usize> {
    if row_count == 0 || viewport.row_height == 0 {
        return 0..0;
    }
    let row_height = u32::from(viewport.row_height);
    let offset = viewport.clamp_offset(scroll_offset, row_count);
    let first = (offset / row_height) as usize;
    let last = offset
        .saturating_add(u32::from(viewport.height))
        .div_ceil(row_height) as usize;
    let start = first.saturating_sub(viewport.overscan);
    let end = last.saturating_add(viewport.overscan).min(row_count);
    start..end
}

/// One materialized row of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowItem {
    /// Position in the produced row sequence.
    pub index: usize,
    /// Recycled slot. Stable while the row stays in the window.
    pub slot: usize,
    /// Offset of the row's top edge within the content.
    pub top: u32,
}

/// The materialized slice for one scroll position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub items: Vec<WindowItem>,
    /// Clamped scroll offset the window was computed for.
    pub scroll_offset: u32,
    /// Height of all rows, for the scroll extent.
    pub content_height: u32,
    /// Fixed viewport height.
    pub height: u16,
}

/// Compute the window for a scroll position.
pub fn compute_window(row_count: usize, scroll_offset: u32, viewport: &Viewport) -> Window {
    let slots = viewport.slot_count();
    let items = visible_range(row_count, scroll_offset, viewport)
        .map(|index| WindowItem {
            index,
            slot: index % slots,
            top: row_top(index, viewport.row_height),
        })
        .collect();
    Window {
        items,
        scroll_offset: viewport.clamp_offset(scroll_offset, row_count),
        content_height: viewport.content_height(row_count),
        height: viewport.height,
    }
}

/// Background band of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stripe {
    /// Flat data, even position.
    Even,
    /// Flat data, odd position.
    Odd,
    /// Nested data, row with children.
    Parent,
    /// Nested data, row without children.
    Leaf,
}

/// Striping alternates by position for flat data and follows
/// parent/leaf for nested data.
pub fn stripe(position: usize, has_children: bool, nested: bool) -> Stripe {
    match (nested, has_children) {
        (true, true) => Stripe::Parent,
        (true, false) => Stripe::Leaf,
        (false, _) if position % 2 == 0 => Stripe::Even,
        (false, _) => Stripe::Odd,
    }
}
