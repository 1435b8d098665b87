//! Front-end state and key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use datagrid::grid::{Grid, GridEvent};
use datagrid::layout::column_positions;

/// Front-end state around a grid.
pub struct App {
    grid: Grid,
    /// Focused column, as a display-order index.
    cursor: usize,
    /// Leftmost visible x, in cells.
    h_offset: u32,
    searching: bool,
    scrollbar_width: u16,
    quit: bool,
}

impl App {
    pub fn new(grid: Grid, scrollbar_width: u16) -> Self {
        // Start on the first data column when there is one.
        let cursor = usize::from(grid.column_count() > 1);
        Self {
            grid,
            cursor,
            h_offset: 0,
            searching: false,
            scrollbar_width,
            quit: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn h_offset(&self) -> u32 {
        self.h_offset
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn scrollbar_width(&self) -> u16 {
        self.scrollbar_width
    }

    pub fn set_scrollbar_width(&mut self, width: u16) {
        self.scrollbar_width = width;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn focused_id(&self) -> Option<String> {
        self.grid.column_order().get(self.cursor).cloned()
    }

    // -------------------------------------------------------------------------
    // Keys
    // -------------------------------------------------------------------------

    /// Apply a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        if self.searching {
            self.handle_search_key(key);
            return;
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Esc => {
                self.grid.handle(GridEvent::Search(String::new()));
            }
            KeyCode::Left if shift => self.move_column(-1),
            KeyCode::Right if shift => self.move_column(1),
            KeyCode::Char('<') => self.move_column(-1),
            KeyCode::Char('>') => self.move_column(1),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                let last = self.grid.column_count().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(column_id) = self.focused_id() {
                    self.grid.handle(GridEvent::HeaderClick { column_id });
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.resize_focused(1),
            KeyCode::Char('-') => self.resize_focused(-1),
            KeyCode::Char('r') => {
                if let Some(id) = self.focused_id() {
                    self.grid.reset_width(&id);
                }
            }
            KeyCode::Up => self.grid.scroll_by(-self.row_step()),
            KeyCode::Down => self.grid.scroll_by(self.row_step()),
            KeyCode::PageUp => self.grid.scroll_by(-self.page_step()),
            KeyCode::PageDown => self.grid.scroll_by(self.page_step()),
            KeyCode::Home => self.grid.set_scroll_offset(0),
            KeyCode::End => self.grid.set_scroll_offset(u32::MAX),
            KeyCode::Char(' ') => self.toggle_top_group(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.searching = false,
            KeyCode::Backspace => {
                let mut query = self.grid.query();
                query.pop();
                self.grid.handle(GridEvent::Search(query));
            }
            KeyCode::Char(c) => {
                let mut query = self.grid.query();
                query.push(c);
                self.grid.handle(GridEvent::Search(query));
            }
            _ => {}
        }
    }

    fn row_step(&self) -> i32 {
        i32::from(self.grid.config().row_height)
    }

    fn page_step(&self) -> i32 {
        i32::from(self.grid.config().viewport_height)
    }

    /// One full resize session of `delta` cells on the focused column.
    fn resize_focused(&mut self, delta: i32) {
        let Some(column_id) = self.focused_id() else { return };
        self.grid.handle(GridEvent::ResizeStart { column_id });
        self.grid.handle(GridEvent::ResizeUpdate { delta });
        self.grid.handle(GridEvent::ResizeEnd);
    }

    /// Drag the focused column one slot; the cursor follows it.
    fn move_column(&mut self, step: isize) {
        let Some(column_id) = self.focused_id() else { return };
        let Some(destination) = self.cursor.checked_add_signed(step) else {
            return;
        };
        if destination >= self.grid.column_count() {
            return;
        }
        let started = self
            .grid
            .handle(GridEvent::DragStart {
                column_id: column_id.clone(),
            })
            .is_consumed();
        if !started {
            return;
        }
        self.grid.handle(GridEvent::DragUpdate {
            source: self.cursor,
            destination: Some(destination),
        });
        self.grid.handle(GridEvent::DragEnd);

        if let Some(index) = self.grid.column_order().iter().position(|id| *id == column_id) {
            self.cursor = index;
        }
    }

    /// Toggle the group that owns the row at the top of the viewport.
    fn toggle_top_group(&mut self) {
        let row_height = u32::from(self.grid.config().row_height.max(1));
        let top = (self.grid.scroll_offset() / row_height) as usize;
        let Some(row) = self.grid.produced_rows().into_iter().nth(top) else {
            return;
        };
        let path = if row.has_children {
            row.path
        } else if row.depth > 0 {
            row.path[..row.path.len() - 1].to_vec()
        } else {
            return;
        };
        self.grid.handle(GridEvent::ToggleGroup { path });
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    /// Terminal resized: recompute the viewport.
    pub fn resize_viewport(&mut self, rows: u16) {
        self.grid
            .set_viewport_height(crate::config::viewport_rows(rows));
    }

    /// Scroll horizontally so the focused column is on screen.
    pub fn ensure_cursor_visible(&mut self, screen_width: u16) {
        let visible = u32::from(screen_width.saturating_sub(self.scrollbar_width));
        let widths: Vec<u16> = self
            .grid
            .column_order()
            .iter()
            .map(|id| self.grid.width_of(id).unwrap_or(0))
            .collect();
        if widths.is_empty() {
            return;
        }
        self.cursor = self.cursor.min(widths.len() - 1);
        let start = column_positions(&widths)[self.cursor];
        let end = start + u32::from(widths[self.cursor]);

        if start < self.h_offset {
            self.h_offset = start;
        } else if end > self.h_offset + visible {
            self.h_offset = end.saturating_sub(visible).min(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datagrid::column::{ColumnDef, ROW_INDEX_ID};
    use datagrid::grid::GridProps;
    use datagrid::sort::SortSpec;
    use datagrid::value::Row;

    use crate::config::cell_defaults;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(rows: usize) -> App {
        let data: Vec<Row> = (0..rows)
            .map(|i| Row::new().set("name", format!("n{:02}", i)).set("city", "Oslo"))
            .collect();
        let columns = vec![ColumnDef::new("name", "Name"), ColumnDef::new("city", "City")];
        let grid = Grid::with_config(GridProps::new(data, columns), cell_defaults(13));
        App::new(grid, 1)
    }

    #[test]
    fn test_starts_on_first_data_column() {
        let app = app(3);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_enter_toggles_sort() {
        let mut app = app(3);
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.grid().sort(), Some(SortSpec::descending("name")));
        app.handle_key(press(KeyCode::Right));
        app.handle_key(press(KeyCode::Enter));
        assert_eq!(app.grid().sort(), Some(SortSpec::ascending("city")));
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut app = app(12);
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.is_searching());
        app.handle_key(press(KeyCode::Char('n')));
        app.handle_key(press(KeyCode::Char('0')));
        assert_eq!(app.grid().query(), "n0");
        assert_eq!(app.grid().row_count(), 10);
        app.handle_key(press(KeyCode::Backspace));
        assert_eq!(app.grid().query(), "n");
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.is_searching());

        // 'q' only quits outside search mode.
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.grid().query(), "");
        assert!(!app.should_quit());
    }

    #[test]
    fn test_resize_keys() {
        let mut app = app(3);
        app.handle_key(press(KeyCode::Char('+')));
        assert_eq!(app.grid().width_of("name"), Some(17));
        for _ in 0..20 {
            app.handle_key(press(KeyCode::Char('-')));
        }
        assert_eq!(app.grid().width_of("name"), Some(4));
        app.handle_key(press(KeyCode::Char('r')));
        assert_eq!(app.grid().width_of("name"), Some(16));
    }

    #[test]
    fn test_move_column_follows_cursor() {
        let mut app = app(3);
        app.handle_key(press(KeyCode::Char('>')));
        assert_eq!(app.grid().column_order(), vec![ROW_INDEX_ID, "city", "name"]);
        assert_eq!(app.cursor(), 2);

        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT));
        assert_eq!(app.grid().column_order(), vec![ROW_INDEX_ID, "name", "city"]);
        assert_eq!(app.cursor(), 1);

        // Cannot displace the row-index column.
        app.handle_key(press(KeyCode::Char('<')));
        assert_eq!(app.grid().column_order(), vec![ROW_INDEX_ID, "name", "city"]);
        assert_eq!(app.cursor(), 1);
    }

    #[test]
    fn test_scroll_keys() {
        // 13 terminal rows leave a 10 row viewport over 30 rows.
        let mut app = app(30);
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.grid().scroll_offset(), 1);
        app.handle_key(press(KeyCode::PageDown));
        assert_eq!(app.grid().scroll_offset(), 11);
        app.handle_key(press(KeyCode::End));
        assert_eq!(app.grid().scroll_offset(), 20);
        app.handle_key(press(KeyCode::Home));
        assert_eq!(app.grid().scroll_offset(), 0);
    }

    #[test]
    fn test_space_toggles_top_group() {
        let data = vec![
            Row::new()
                .set("name", "a")
                .child(Row::new().set("name", "a1"))
                .child(Row::new().set("name", "a2")),
        ];
        let grid = Grid::with_config(
            GridProps::new(data, vec![ColumnDef::new("name", "Name")]),
            cell_defaults(13),
        );
        let mut app = App::new(grid, 1);
        assert_eq!(app.grid().row_count(), 3);
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.grid().row_count(), 1);
        app.handle_key(press(KeyCode::Char(' ')));
        assert_eq!(app.grid().row_count(), 3);
    }

    #[test]
    fn test_quit_keys() {
        let mut first = app(1);
        first.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(first.should_quit());

        let mut second = app(1);
        second.handle_key(press(KeyCode::Char('q')));
        assert!(second.should_quit());
    }

    #[test]
    fn test_horizontal_follow() {
        let mut app = app(1);
        // Widths 5, 16, 16; 20 visible cells after the scrollbar.
        app.handle_key(press(KeyCode::Right));
        app.ensure_cursor_visible(21);
        assert_eq!(app.h_offset(), 17);
        app.handle_key(press(KeyCode::Left));
        app.handle_key(press(KeyCode::Left));
        app.ensure_cursor_visible(21);
        assert_eq!(app.h_offset(), 0);
    }
}
