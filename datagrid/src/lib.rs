//! Grid state and rendering engine for large tabular datasets.
//!
//! Sortable, resizable, reorderable and filterable columns over flat or
//! nested rows, with windowed rendering once a result set grows past a
//! threshold. The engine is headless: it produces a render model and a
//! presentation layer paints it.

pub mod column;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod reorder;
pub mod resize;
pub mod sort;
pub mod value;
pub mod window;

pub mod prelude {
    pub use crate::column::{Accessor, CellContent, Column, ColumnDef, ColumnKind, LinkTemplate};
    pub use crate::config::GridConfig;
    pub use crate::error::GridError;
    pub use crate::grid::{Body, EventResult, Grid, GridEvent, GridProps, GridView};
    pub use crate::metrics::{ScrollbarProbe, scrollbar_width};
    pub use crate::sort::{SortDirection, SortSpec};
    pub use crate::value::{Dataset, Row, Value};
    pub use crate::window::{RenderStrategy, Stripe};
}
