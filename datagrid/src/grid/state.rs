//! Grid controller state.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::column::{Column, ColumnDef, register_columns};
use crate::config::GridConfig;
use crate::filter::filter_indices;
use crate::layout::{current_widths, total_render_width};
use crate::reorder::{DragSession, reconcile_order};
use crate::resize::{ColumnWidths, ResizeSession};
use crate::sort::{SortDirection, SortSpec, sort_indices};
use crate::value::{Dataset, Row};
use crate::window::{RenderStrategy, Viewport, choose_strategy, row_top};

/// Unique identifier for a Grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for GridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

/// Everything the caller passes in.
#[derive(Debug, Clone, Default)]
pub struct GridProps {
    pub data: Dataset,
    pub columns: Vec<ColumnDef>,
    /// While set, nothing renders.
    pub loading: bool,
    /// Upstream fetch failed. Only changes the empty-state message.
    pub error: bool,
}

impl GridProps {
    pub fn new(data: impl Into<Dataset>, columns: Vec<ColumnDef>) -> Self {
        Self {
            data: data.into(),
            columns,
            loading: false,
            error: false,
        }
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }
}

/// A row of the produced (filtered, sorted, expanded) sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedRow {
    /// Indices into the caller's data: top-level index, then child indices.
    pub path: Vec<usize>,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// Resolve a row path against the caller's data.
pub fn row_at<'a>(rows: &'a [Row], path: &[usize]) -> Option<&'a Row> {
    let (first, rest) = path.split_first()?;
    let mut row = rows.get(*first)?;
    for index in rest {
        row = row.sub_rows.get(*index)?;
    }
    Some(row)
}

/// Internal state for the Grid.
#[derive(Debug)]
pub(super) struct GridInner {
    pub config: GridConfig,
    pub data: Dataset,
    pub loading: bool,
    pub error: bool,
    /// Registered columns in schema order (row-index first).
    pub columns: Vec<Column>,
    /// Display order by column identity. Always a permutation of `columns`.
    pub order: Vec<String>,
    pub sort: Option<SortSpec>,
    pub query: String,
    pub widths: ColumnWidths,
    pub drag: Option<DragSession>,
    pub resize: Option<ResizeSession>,
    /// Paths of collapsed groups. Groups are expanded unless listed.
    pub collapsed: HashSet<Vec<usize>>,
    /// Vertical scroll offset of the windowed body.
    pub scroll_offset: u32,
    /// Cached output of the row pipeline.
    pub produced: Vec<ProducedRow>,
}

impl GridInner {
    fn new(props: GridProps, config: GridConfig) -> Self {
        let columns = register_columns(&props.columns, &config);
        let order: Vec<String> = columns.iter().map(|c| c.id.clone()).collect();
        let sort = columns
            .iter()
            .find(|c| !c.synthetic && c.sortable)
            .map(|c| SortSpec::ascending(c.id.clone()));

        let mut inner = Self {
            config,
            data: props.data,
            loading: props.loading,
            error: props.error,
            columns,
            order,
            sort,
            query: String::new(),
            widths: ColumnWidths::new(),
            drag: None,
            resize: None,
            collapsed: HashSet::new(),
            scroll_offset: 0,
            produced: Vec::new(),
        };
        inner.refresh_rows();
        inner
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Columns in display order.
    pub fn ordered_columns(&self) -> Vec<&Column> {
        self.order.iter().filter_map(|id| self.column(id)).collect()
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            row_height: self.config.row_height,
            height: self.config.viewport_height,
            overscan: self.config.overscan,
        }
    }

    /// Current widths in display order.
    pub fn display_widths(&self) -> Vec<u16> {
        current_widths(&self.ordered_columns(), &self.widths)
    }

    pub fn total_width(&self, scrollbar_width: u16) -> u32 {
        total_render_width(self.display_widths(), scrollbar_width)
    }

    /// Recompute the produced rows and re-clamp the scroll offset.
    pub fn refresh_rows(&mut self) {
        let rows = &self.data.rows;
        let sort_column = self
            .sort
            .as_ref()
            .and_then(|s| self.column(&s.column_id).map(|c| (c, s.direction)));

        let mut top = filter_indices(rows, &self.columns, &self.query);
        if let Some((column, direction)) = sort_column {
            sort_indices(rows, &mut top, column, direction, &self.config.date_format);
        }

        let mut produced = Vec::with_capacity(top.len());
        for index in top {
            self.push_row(rows, vec![index], 0, sort_column, &mut produced);
        }
        let threshold = self.config.window_threshold;
        let before = choose_strategy(self.produced.len(), threshold);
        let after = choose_strategy(produced.len(), threshold);
        if before != after {
            log::debug!("render strategy {:?} -> {:?} at {} rows", before, after, produced.len());
        }
        self.produced = produced;

        let viewport = self.viewport();
        self.scroll_offset = viewport.clamp_offset(self.scroll_offset, self.produced.len());
    }

    fn push_row(
        &self,
        level: &[Row],
        path: Vec<usize>,
        depth: usize,
        sort_column: Option<(&Column, SortDirection)>,
        out: &mut Vec<ProducedRow>,
    ) {
        let Some(&index) = path.last() else { return };
        let Some(row) = level.get(index) else { return };
        let expanded = row.is_group() && !self.collapsed.contains(&path);
        out.push(ProducedRow {
            path: path.clone(),
            depth,
            has_children: row.is_group(),
            expanded,
        });
        if !expanded {
            return;
        }

        let mut children: Vec<usize> = (0..row.sub_rows.len()).collect();
        if let Some((column, direction)) = sort_column {
            sort_indices(
                &row.sub_rows,
                &mut children,
                column,
                direction,
                &self.config.date_format,
            );
        }
        for child in children {
            let mut child_path = path.clone();
            child_path.push(child);
            self.push_row(&row.sub_rows, child_path, depth + 1, sort_column, out);
        }
    }

    fn group_paths(rows: &[Row], prefix: &[usize], out: &mut Vec<Vec<usize>>) {
        for (index, row) in rows.iter().enumerate() {
            if row.is_group() {
                let mut path = prefix.to_vec();
                path.push(index);
                Self::group_paths(&row.sub_rows, &path, out);
                out.push(path);
            }
        }
    }
}

/// The grid controller.
///
/// Owns grid state (column order, sort, filter query, width overrides, drag
/// session, expansion, scroll) and derives rows and columns for a
/// presentation layer. Cloning yields another handle to the same grid.
///
/// # Example
///
/// ```
/// use datagrid::column::ColumnDef;
/// use datagrid::grid::{Grid, GridProps};
/// use datagrid::value::Row;
///
/// let rows = vec![
///     Row::new().set("name", "item10"),
///     Row::new().set("name", "item2"),
/// ];
/// let grid = Grid::new(GridProps::new(rows, vec![ColumnDef::new("name", "Name")]));
///
/// // Mounted sorted ascending on the first data column.
/// assert_eq!(grid.cell_text(0, "name").as_deref(), Some("item2"));
/// ```
#[derive(Debug)]
pub struct Grid {
    id: GridId,
    pub(super) inner: Arc<RwLock<GridInner>>,
    pub(super) dirty: Arc<AtomicBool>,
}

impl Grid {
    /// Mount a grid with the default configuration.
    pub fn new(props: GridProps) -> Self {
        Self::with_config(props, GridConfig::default())
    }

    /// Mount a grid with a configuration.
    pub fn with_config(props: GridProps, config: GridConfig) -> Self {
        let inner = GridInner::new(props, config);
        let id = GridId::new();
        log::debug!(
            "{}: mounted with {} columns, {} rows",
            id,
            inner.columns.len(),
            inner.produced.len()
        );
        Self {
            id,
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> GridId {
        self.id
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Props
    // -------------------------------------------------------------------------

    /// Replace the caller props, keeping grid state.
    ///
    /// Columns are registered afresh. The order keeps known identities,
    /// appends new ones and drops removed ones. A sort or width override on
    /// a removed column is dropped.
    pub fn set_props(&self, props: GridProps) {
        if let Ok(mut guard) = self.inner.write() {
            let columns = register_columns(&props.columns, &guard.config);
            guard.order = reconcile_order(&guard.order, &columns);
            let sort_removed = guard
                .sort
                .as_ref()
                .is_some_and(|s| !columns.iter().any(|c| c.id == s.column_id && c.sortable));
            if sort_removed {
                guard.sort = None;
            }
            guard.widths.retain_ids(&columns);
            guard.columns = columns;
            guard.drag = None;
            guard.resize = None;
            if guard.data != props.data {
                guard.collapsed.clear();
            }
            guard.data = props.data;
            guard.loading = props.loading;
            guard.error = props.error;
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    /// Replace only the data.
    pub fn set_data(&self, data: Dataset) {
        if let Ok(mut guard) = self.inner.write() {
            guard.data = data;
            guard.collapsed.clear();
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    /// Set the loading flag.
    pub fn set_loading(&self, loading: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.loading = loading;
            self.mark_dirty();
        }
    }

    /// Set the upstream error flag.
    pub fn set_error(&self, error: bool) {
        if let Ok(mut guard) = self.inner.write() {
            guard.error = error;
            self.mark_dirty();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().map(|g| g.loading).unwrap_or(false)
    }

    pub fn config(&self) -> GridConfig {
        self.inner
            .read()
            .map(|g| g.config.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Columns in display order.
    pub fn columns(&self) -> Vec<Column> {
        self.inner
            .read()
            .map(|g| g.ordered_columns().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Column identities in display order.
    pub fn column_order(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|g| g.order.clone())
            .unwrap_or_default()
    }

    /// Get the number of columns, row-index included.
    pub fn column_count(&self) -> usize {
        self.inner.read().map(|g| g.order.len()).unwrap_or(0)
    }

    /// Current width of a column.
    pub fn width_of(&self, column_id: &str) -> Option<u16> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.column(column_id).map(|c| g.widths.width_of(c)))
    }

    /// Current column widths in display order.
    pub fn column_widths(&self) -> Vec<u16> {
        self.inner
            .read()
            .map(|g| g.display_widths())
            .unwrap_or_default()
    }

    /// Sum of column widths plus the scrollbar width.
    pub fn total_render_width(&self, scrollbar_width: u16) -> u32 {
        self.inner
            .read()
            .map(|g| g.total_width(scrollbar_width))
            .unwrap_or(u32::from(scrollbar_width))
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Number of produced rows (filtered, with expanded children).
    pub fn row_count(&self) -> usize {
        self.inner.read().map(|g| g.produced.len()).unwrap_or(0)
    }

    /// Number of top-level rows the caller passed in.
    pub fn input_len(&self) -> usize {
        self.inner.read().map(|g| g.data.len()).unwrap_or(0)
    }

    /// Check if no rows are produced.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// The produced row sequence.
    pub fn produced_rows(&self) -> Vec<ProducedRow> {
        self.inner
            .read()
            .map(|g| g.produced.clone())
            .unwrap_or_default()
    }

    /// Get a produced row's data by position.
    pub fn row(&self, position: usize) -> Option<Row> {
        self.inner.read().ok().and_then(|g| {
            g.produced
                .get(position)
                .and_then(|p| row_at(&g.data.rows, &p.path).cloned())
        })
    }

    /// Rendered text of one cell.
    pub fn cell_text(&self, position: usize, column_id: &str) -> Option<String> {
        self.inner.read().ok().and_then(|g| {
            let produced = g.produced.get(position)?;
            let row = row_at(&g.data.rows, &produced.path)?;
            let column = g.column(column_id)?;
            Some(column.render(row, position).text().to_string())
        })
    }

    /// Rendering path for the current row count.
    pub fn strategy(&self) -> RenderStrategy {
        self.inner
            .read()
            .map(|g| choose_strategy(g.produced.len(), g.config.window_threshold))
            .unwrap_or(RenderStrategy::Direct)
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    /// Toggle a group open or closed. Returns `false` if the path is not a group.
    pub fn toggle_expanded(&self, path: &[usize]) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && row_at(&guard.data.rows, path).is_some_and(Row::is_group)
        {
            let key = path.to_vec();
            if !guard.collapsed.remove(&key) {
                guard.collapsed.insert(key);
            }
            guard.refresh_rows();
            self.mark_dirty();
            return true;
        }
        false
    }

    /// Expand every group.
    pub fn expand_all(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.collapsed.clear();
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    /// Collapse every group.
    pub fn collapse_all(&self) {
        if let Ok(mut guard) = self.inner.write() {
            let mut paths = Vec::new();
            GridInner::group_paths(&guard.data.rows, &[], &mut paths);
            guard.collapsed = paths.into_iter().collect();
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Get current sort state.
    pub fn sort(&self) -> Option<SortSpec> {
        self.inner.read().ok().and_then(|g| g.sort.clone())
    }

    /// Set the sort. Ignored for unknown or non-sortable columns.
    pub fn set_sort(&self, spec: SortSpec) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && guard
                .column(&spec.column_id)
                .is_some_and(|c| c.sortable && !c.synthetic)
        {
            log::debug!("{}: sort {:?}", self.id, spec);
            guard.sort = Some(spec);
            guard.refresh_rows();
            self.mark_dirty();
            return true;
        }
        false
    }

    /// Toggle sort for a column.
    ///
    /// If the column is already sorted, toggles the direction.
    /// If sorting a different column, replaces the sort with ascending.
    /// Returns the new sort state, or `None` for a column that cannot sort.
    pub fn toggle_sort(&self, column_id: &str) -> Option<SortSpec> {
        if let Ok(mut guard) = self.inner.write()
            && guard
                .column(column_id)
                .is_some_and(|c| c.sortable && !c.synthetic)
        {
            let next = match &guard.sort {
                Some(current) if current.column_id == column_id => SortSpec {
                    column_id: column_id.to_string(),
                    direction: current.direction.toggled(),
                },
                _ => SortSpec::ascending(column_id),
            };
            log::debug!("{}: sort {:?}", self.id, next);
            guard.sort = Some(next.clone());
            guard.refresh_rows();
            self.mark_dirty();
            return Some(next);
        }
        None
    }

    /// Clear sort state. Rows return to input order.
    pub fn clear_sort(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort = None;
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Filtering
    // -------------------------------------------------------------------------

    /// Current filter query.
    pub fn query(&self) -> String {
        self.inner
            .read()
            .map(|g| g.query.clone())
            .unwrap_or_default()
    }

    /// Set the filter query.
    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        if let Ok(mut guard) = self.inner.write()
            && guard.query != query
        {
            guard.query = query;
            guard.refresh_rows();
            self.mark_dirty();
        }
    }

    // -------------------------------------------------------------------------
    // Resizing
    // -------------------------------------------------------------------------

    /// Resize a column by `delta`, clamped to its minimum. Returns the new width.
    pub fn resize(&self, column_id: &str, delta: i32) -> Option<u16> {
        if let Ok(mut guard) = self.inner.write() {
            let column = guard.column(column_id)?.clone();
            let width = guard.widths.resize(&column, delta);
            self.mark_dirty();
            return Some(width);
        }
        None
    }

    /// Restore a column's registered width.
    pub fn reset_width(&self, column_id: &str) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && guard.widths.reset(column_id)
        {
            self.mark_dirty();
            return true;
        }
        false
    }

    /// Start a resize drag on a column.
    pub fn begin_resize(&self, column_id: &str) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && let Some(column) = guard.column(column_id)
        {
            let session = ResizeSession::begin(column, &guard.widths);
            log::trace!("{}: resize start {:?}", self.id, session);
            guard.resize = Some(session);
            return true;
        }
        false
    }

    /// Update the resize drag with the distance moved since it started.
    ///
    /// No-op without an active session.
    pub fn update_resize(&self, delta: i32) -> Option<u16> {
        if let Ok(mut guard) = self.inner.write() {
            let session = guard.resize.clone()?;
            let column = guard.column(&session.column_id)?.clone();
            let width = guard.widths.set(&column, session.width_for(delta));
            self.mark_dirty();
            return Some(width);
        }
        None
    }

    /// Finish the resize drag.
    pub fn end_resize(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.resize = None;
        }
    }

    /// Check if a resize drag is active.
    pub fn is_resizing(&self) -> bool {
        self.inner.read().map(|g| g.resize.is_some()).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Reordering
    // -------------------------------------------------------------------------

    /// Start dragging a column. Returns `false` for the row-index column.
    pub fn drag_start(&self, column_id: &str) -> bool {
        if let Ok(mut guard) = self.inner.write()
            && let Some(session) = DragSession::start(&guard.order, column_id)
        {
            log::debug!("{}: drag start {}", self.id, column_id);
            guard.drag = Some(session);
            return true;
        }
        false
    }

    /// Apply a drag update, committing the new order live.
    ///
    /// No-op without an active session or without a destination.
    pub fn drag_update(&self, source: usize, destination: Option<usize>) -> bool {
        if let Ok(mut guard) = self.inner.write() {
            let Some(session) = &guard.drag else {
                log::trace!("{}: drag update without session", self.id);
                return false;
            };
            let Some(order) = session.update(source, destination) else {
                return false;
            };
            if order != guard.order {
                guard.order = order;
                self.mark_dirty();
            }
            return true;
        }
        false
    }

    /// End the drag. The last committed order stays.
    pub fn drag_end(&self) {
        if let Ok(mut guard) = self.inner.write()
            && guard.drag.take().is_some()
        {
            log::debug!("{}: drag end, order {:?}", self.id, guard.order);
        }
    }

    /// Check if a column drag is active.
    pub fn is_dragging(&self) -> bool {
        self.inner.read().map(|g| g.drag.is_some()).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Get the vertical scroll offset.
    pub fn scroll_offset(&self) -> u32 {
        self.inner.read().map(|g| g.scroll_offset).unwrap_or(0)
    }

    /// Set the vertical scroll offset, clamped to the content.
    pub fn set_scroll_offset(&self, offset: u32) {
        if let Ok(mut guard) = self.inner.write() {
            let clamped = guard.viewport().clamp_offset(offset, guard.produced.len());
            if clamped != guard.scroll_offset {
                guard.scroll_offset = clamped;
                self.mark_dirty();
            }
        }
    }

    /// Change the viewport height and re-clamp the scroll offset.
    pub fn set_viewport_height(&self, height: u16) {
        if let Ok(mut guard) = self.inner.write()
            && guard.config.viewport_height != height
        {
            guard.config.viewport_height = height;
            let count = guard.produced.len();
            guard.scroll_offset = guard.viewport().clamp_offset(guard.scroll_offset, count);
            self.mark_dirty();
        }
    }

    /// Scroll by a signed amount.
    pub fn scroll_by(&self, delta: i32) {
        let target = (i64::from(self.scroll_offset()) + i64::from(delta)).max(0);
        self.set_scroll_offset(u32::try_from(target).unwrap_or(u32::MAX));
    }

    /// Scroll so the row at `position` is inside the viewport.
    pub fn scroll_to_row(&self, position: usize) {
        if let Ok(mut guard) = self.inner.write() {
            if position >= guard.produced.len() {
                return;
            }
            let row_height = guard.config.row_height;
            let viewport = u32::from(guard.config.viewport_height);
            let top = row_top(position, row_height);
            let bottom = top.saturating_add(u32::from(row_height));

            if top < guard.scroll_offset {
                guard.scroll_offset = top;
                self.mark_dirty();
            } else if bottom > guard.scroll_offset.saturating_add(viewport) {
                guard.scroll_offset = bottom.saturating_sub(viewport);
                self.mark_dirty();
            }
        }
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the grid has changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridProps::default())
    }
}
