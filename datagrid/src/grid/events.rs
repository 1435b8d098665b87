//! Gesture handling for the Grid.

use crate::layout::column_at_x;

use super::state::Grid;

/// Whether a gesture changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    fn from_bool(consumed: bool) -> Self {
        if consumed {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}

/// A user gesture forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    /// Click on a header cell.
    HeaderClick { column_id: String },
    /// Click on the header at an x-offset from its left edge.
    HeaderClickAt { x: u32 },
    /// A column was picked up.
    DragStart { column_id: String },
    /// The dragged column moved. `destination` is `None` outside a drop target.
    DragUpdate {
        source: usize,
        destination: Option<usize>,
    },
    /// The column was dropped or the drag was cancelled.
    DragEnd,
    /// A resize handle was grabbed.
    ResizeStart { column_id: String },
    /// The resize handle moved `delta` from where it was grabbed.
    ResizeUpdate { delta: i32 },
    ResizeEnd,
    /// The search text changed.
    Search(String),
    /// The body scrolled to an offset.
    Scroll { offset: u32 },
    /// A group row's expander was clicked.
    ToggleGroup { path: Vec<usize> },
}

impl Grid {
    /// Handle header click for sorting.
    pub fn on_header_click(&self, column_id: &str) -> EventResult {
        EventResult::from_bool(self.toggle_sort(column_id).is_some())
    }

    /// Handle a header click by x-position.
    pub fn on_header_click_at(&self, x: u32) -> EventResult {
        let Some(index) = column_at_x(&self.column_widths(), x) else {
            return EventResult::Ignored;
        };
        match self.column_order().get(index) {
            Some(column_id) => self.on_header_click(column_id),
            None => EventResult::Ignored,
        }
    }

    /// Dispatch a gesture.
    pub fn handle(&self, event: GridEvent) -> EventResult {
        match event {
            GridEvent::HeaderClick { column_id } => self.on_header_click(&column_id),
            GridEvent::HeaderClickAt { x } => self.on_header_click_at(x),
            GridEvent::DragStart { column_id } => EventResult::from_bool(self.drag_start(&column_id)),
            GridEvent::DragUpdate {
                source,
                destination,
            } => EventResult::from_bool(self.drag_update(source, destination)),
            GridEvent::DragEnd => {
                let active = self.is_dragging();
                self.drag_end();
                EventResult::from_bool(active)
            }
            GridEvent::ResizeStart { column_id } => {
                EventResult::from_bool(self.begin_resize(&column_id))
            }
            GridEvent::ResizeUpdate { delta } => {
                EventResult::from_bool(self.update_resize(delta).is_some())
            }
            GridEvent::ResizeEnd => {
                let active = self.is_resizing();
                self.end_resize();
                EventResult::from_bool(active)
            }
            GridEvent::Search(query) => {
                self.set_query(query);
                EventResult::Consumed
            }
            GridEvent::Scroll { offset } => {
                self.set_scroll_offset(offset);
                EventResult::Consumed
            }
            GridEvent::ToggleGroup { path } => EventResult::from_bool(self.toggle_expanded(&path)),
        }
    }
}
