//! Headless render model for a presentation layer.

use crate::column::CellContent;
use crate::sort::SortDirection;
use crate::window::{RenderStrategy, Stripe, choose_strategy, compute_window, stripe};

use super::state::{Grid, GridInner, ProducedRow, row_at};

/// Empty-state text when there are no rows to show.
pub const NO_RECORDS_MESSAGE: &str = "No matching records found";

/// Empty-state text when the upstream fetch failed.
pub const LOAD_ERROR_MESSAGE: &str = "Unable to load data. Please try again later.";

/// Footer text: `"1 result"`, `"2 results"`.
pub fn results_label(count: usize) -> String {
    if count > 1 {
        format!("{} results", count)
    } else {
        format!("{} result", count)
    }
}

/// What the grid shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum GridView {
    /// The caller is still loading; render nothing.
    Loading,
    /// No rows. Header and footer are suppressed.
    Empty { message: &'static str },
    /// Header, body and footer.
    Populated(Populated),
}

/// A populated grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Populated {
    pub header: Vec<HeaderCell>,
    pub body: Body,
    pub footer: String,
    /// Width of the header and body containers.
    pub total_width: u32,
    pub query: String,
    pub nested: bool,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub width: u16,
    /// Set on the active sort column.
    pub sort: Option<SortDirection>,
    pub sortable: bool,
    pub draggable: bool,
    pub resizable: bool,
}

/// Body rows for one of the two rendering paths.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Direct(Vec<RenderedRow>),
    Windowed(WindowedBody),
}

impl Body {
    pub fn strategy(&self) -> RenderStrategy {
        match self {
            Body::Direct(_) => RenderStrategy::Direct,
            Body::Windowed(_) => RenderStrategy::Windowed,
        }
    }

    /// Materialized rows, in order.
    pub fn rows(&self) -> Vec<&RenderedRow> {
        match self {
            Body::Direct(rows) => rows.iter().collect(),
            Body::Windowed(body) => body.rows.iter().map(|r| &r.row).collect(),
        }
    }
}

/// The windowed slice of the body.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedBody {
    pub rows: Vec<WindowedRow>,
    pub scroll_offset: u32,
    pub content_height: u32,
    /// Fixed viewport height.
    pub height: u16,
    /// Equal to the total render width.
    pub width: u32,
}

/// A rendered row placed in a recycled slot.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedRow {
    pub slot: usize,
    pub top: u32,
    pub row: RenderedRow,
}

/// One rendered body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Position in the produced row sequence.
    pub position: usize,
    pub path: Vec<usize>,
    pub depth: usize,
    pub stripe: Stripe,
    pub has_children: bool,
    pub expanded: bool,
    /// One cell per column, in display order.
    pub cells: Vec<CellContent>,
}

impl GridInner {
    fn render_row(&self, position: usize, produced: &ProducedRow) -> RenderedRow {
        let cells = match row_at(&self.data.rows, &produced.path) {
            Some(row) => self
                .ordered_columns()
                .into_iter()
                .map(|c| c.render(row, position))
                .collect(),
            None => Vec::new(),
        };
        RenderedRow {
            position,
            path: produced.path.clone(),
            depth: produced.depth,
            stripe: stripe(position, produced.has_children, self.data.nested),
            has_children: produced.has_children,
            expanded: produced.expanded,
            cells,
        }
    }

    fn header(&self) -> Vec<HeaderCell> {
        self.ordered_columns()
            .into_iter()
            .map(|c| HeaderCell {
                column_id: c.id.clone(),
                label: c.label.clone(),
                width: self.widths.width_of(c),
                sort: self
                    .sort
                    .as_ref()
                    .filter(|s| s.column_id == c.id)
                    .map(|s| s.direction),
                sortable: c.sortable && !c.synthetic,
                draggable: c.is_draggable(),
                resizable: true,
            })
            .collect()
    }

    pub(super) fn view(&self, scrollbar_width: u16) -> GridView {
        if self.loading {
            return GridView::Loading;
        }
        if self.produced.is_empty() {
            let message = if self.error {
                LOAD_ERROR_MESSAGE
            } else {
                NO_RECORDS_MESSAGE
            };
            return GridView::Empty { message };
        }

        let total_width = self.total_width(scrollbar_width);
        let count = self.produced.len();
        let body = match choose_strategy(count, self.config.window_threshold) {
            RenderStrategy::Direct => Body::Direct(
                self.produced
                    .iter()
                    .enumerate()
                    .map(|(position, p)| self.render_row(position, p))
                    .collect(),
            ),
            RenderStrategy::Windowed => {
                let window = compute_window(count, self.scroll_offset, &self.viewport());
                let rows = window
                    .items
                    .iter()
                    .map(|item| WindowedRow {
                        slot: item.slot,
                        top: item.top,
                        row: self.render_row(item.index, &self.produced[item.index]),
                    })
                    .collect();
                Body::Windowed(WindowedBody {
                    rows,
                    scroll_offset: window.scroll_offset,
                    content_height: window.content_height,
                    height: window.height,
                    width: total_width,
                })
            }
        };

        GridView::Populated(Populated {
            header: self.header(),
            body,
            footer: results_label(count),
            total_width,
            query: self.query.clone(),
            nested: self.data.nested,
        })
    }
}

impl Grid {
    /// Derive the render model.
    ///
    /// `scrollbar_width` is the platform scrollbar metric, usually from
    /// [`crate::metrics::scrollbar_width`].
    pub fn view(&self, scrollbar_width: u16) -> GridView {
        self.inner
            .read()
            .map(|g| g.view(scrollbar_width))
            .unwrap_or(GridView::Loading)
    }

    /// Footer text for the current row count.
    pub fn footer(&self) -> String {
        results_label(self.row_count())
    }
}
