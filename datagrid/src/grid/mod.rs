//! Grid controller - composes the engines into one stateful grid.
//!
//! The Grid provides:
//! - Column registration with an injected row-index column
//! - Single-column, type-aware sorting toggled by header clicks
//! - Free-text filtering over every data column
//! - Live column resizing and drag reordering
//! - Group expansion for nested data
//! - Direct or windowed body rendering depending on row count
//!
//! # Example
//!
//! ```
//! use datagrid::column::ColumnDef;
//! use datagrid::grid::{Grid, GridEvent, GridProps, GridView};
//! use datagrid::value::Row;
//!
//! let rows = vec![
//!     Row::new().set("name", "Ada").set("joined", "2021-03-04"),
//!     Row::new().set("name", "Grace").set("joined", "2019-11-30"),
//! ];
//! let columns = vec![
//!     ColumnDef::new("name", "Name"),
//!     ColumnDef::new("joined", "Joined").date(),
//! ];
//! let grid = Grid::new(GridProps::new(rows, columns));
//!
//! grid.handle(GridEvent::HeaderClick { column_id: "joined".into() });
//! grid.handle(GridEvent::Search("a".into()));
//!
//! match grid.view(17) {
//!     GridView::Populated(view) => assert_eq!(view.footer, "2 results"),
//!     other => panic!("unexpected view: {:?}", other),
//! }
//! ```

mod events;
mod state;
mod view;

pub use events::{EventResult, GridEvent};
pub use state::{Grid, GridId, GridProps, ProducedRow, row_at};
pub use view::{
    Body, GridView, HeaderCell, LOAD_ERROR_MESSAGE, NO_RECORDS_MESSAGE, Populated, RenderedRow,
    WindowedBody, WindowedRow, results_label,
};
